use crate::chart::{
    CellValue, ChartAdapter, ChartKind, ChartOptions, ChartSpec, Column, ColumnType, DataTable,
    TIME_PATTERN,
};
use crate::codec::seconds_to_time_of_day;
use crate::error::{DashboardError, DashboardResult};
use crate::presence::PresenceIntervalRow;

/// Timeline of the typical arrival/departure range per weekday.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalTimelineChart;

impl ChartAdapter for IntervalTimelineChart {
    type Row = PresenceIntervalRow;

    fn kind(&self) -> ChartKind {
        ChartKind::Timeline
    }

    fn build(&self, rows: &[PresenceIntervalRow]) -> DashboardResult<ChartSpec> {
        let mut data = DataTable::new(vec![
            Column::labeled("Weekday", ColumnType::String),
            Column::with_id("Start", ColumnType::Datetime),
            Column::with_id("End", ColumnType::Datetime),
        ]);

        for row in rows {
            let start = seconds_to_time_of_day(row.start_seconds)?;
            let end = seconds_to_time_of_day(row.end_seconds)?;
            if start > end {
                return Err(DashboardError::DataContractViolation(format!(
                    "{}: start {start} is after end {end}",
                    row.weekday
                )));
            }
            data.add_row(vec![
                CellValue::Text(row.weekday.clone()),
                CellValue::Time(start),
                CellValue::Time(end),
            ])?;
        }
        data.format_column(1, TIME_PATTERN);
        data.format_column(2, TIME_PATTERN);

        Ok(ChartSpec {
            kind: self.kind(),
            data,
            options: ChartOptions::weekday_axis(),
        })
    }
}

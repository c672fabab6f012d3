use crate::chart::{
    CellValue, ChartAdapter, ChartKind, ChartOptions, ChartSpec, Column, ColumnType, DataTable,
    TIME_PATTERN,
};
use crate::codec::seconds_to_time_of_day;
use crate::error::DashboardResult;
use crate::presence::WeekdayMeanRow;

/// Column chart of the mean presence duration per weekday.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanWeekdayChart;

impl ChartAdapter for MeanWeekdayChart {
    type Row = WeekdayMeanRow;

    fn kind(&self) -> ChartKind {
        ChartKind::ColumnChart
    }

    fn build(&self, rows: &[WeekdayMeanRow]) -> DashboardResult<ChartSpec> {
        let mut data = DataTable::new(vec![
            Column::labeled("Weekday", ColumnType::String),
            Column::labeled("Mean time (h:m:s)", ColumnType::Datetime),
        ]);

        // Server order is canonical weekday order; never re-sorted.
        for row in rows {
            let mean = seconds_to_time_of_day(row.mean_duration_seconds)?;
            data.add_row(vec![
                CellValue::Text(row.weekday.clone()),
                CellValue::Time(mean),
            ])?;
        }
        data.format_column(1, TIME_PATTERN);

        Ok(ChartSpec {
            kind: self.kind(),
            data,
            options: ChartOptions::weekday_axis(),
        })
    }
}

//! Chart adapters: decoded presence rows in, chart-ready specs out.

pub mod interval_timeline;
pub mod mean_weekday;
pub mod table;

use serde::Serialize;

use crate::error::DashboardResult;
use crate::presence::{PresenceIntervalRow, WeekdayMeanRow};

pub use interval_timeline::IntervalTimelineChart;
pub use mean_weekday::MeanWeekdayChart;
pub use table::{Cell, CellValue, Column, ColumnType, DataTable, Row};

/// Display pattern for every time column (`HH:mm:ss` in the chart library).
pub const TIME_PATTERN: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    ColumnChart,
    Timeline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisOptions {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub h_axis: AxisOptions,
}

impl ChartOptions {
    fn weekday_axis() -> Self {
        Self {
            h_axis: AxisOptions {
                title: "Weekday".to_string(),
            },
        }
    }
}

/// Everything the charting library needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub data: DataTable,
    pub options: ChartOptions,
}

/// Turns one dataset shape into a chart.
pub trait ChartAdapter {
    type Row;

    fn kind(&self) -> ChartKind;

    /// Decode `rows` and build the chart.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::DataContractViolation` if any row cannot be
    /// rendered faithfully.
    fn build(&self, rows: &[Self::Row]) -> DashboardResult<ChartSpec>;
}

/// The chart container on the page.
pub trait ChartSurface: Send {
    fn draw(&mut self, chart: &ChartSpec);

    fn hide(&mut self);
}

/// How selector option values identify a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorMode {
    /// Value is the user identifier
    ById,
    /// Value is the index into the ordered user list
    Positional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartVariant {
    MeanWeekday,
    IntervalTimeline,
}

impl ChartVariant {
    /// Parse a variant from its endpoint name.
    #[must_use]
    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mean_time_weekday" | "mean_weekday" => Some(Self::MeanWeekday),
            "presence_start_end" | "interval_timeline" => Some(Self::IntervalTimeline),
            _ => None,
        }
    }

    /// Name of the backend endpoint serving this variant's data.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::MeanWeekday => "mean_time_weekday",
            Self::IntervalTimeline => "presence_start_end",
        }
    }

    #[must_use]
    pub fn selector_mode(self) -> SelectorMode {
        match self {
            Self::MeanWeekday => SelectorMode::ById,
            Self::IntervalTimeline => SelectorMode::Positional,
        }
    }
}

/// Rows fetched for one user, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    MeanWeekday(Vec<WeekdayMeanRow>),
    IntervalTimeline(Vec<PresenceIntervalRow>),
}

impl Dataset {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::MeanWeekday(rows) => rows.len(),
            Self::IntervalTimeline(rows) => rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the chart with the adapter matching this dataset's shape.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's `DataContractViolation`.
    pub fn build_chart(&self) -> DashboardResult<ChartSpec> {
        match self {
            Self::MeanWeekday(rows) => MeanWeekdayChart.build(rows),
            Self::IntervalTimeline(rows) => IntervalTimelineChart.build(rows),
        }
    }
}

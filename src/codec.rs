//! Time-of-day decoding for chart time axes.
//!
//! The presence API reports times as seconds since midnight (interval
//! boundaries) or as daily durations in seconds (weekday means). The chart's
//! `datetime` column wants calendar values, so each one is placed on a fixed
//! reference date and only its time-of-day component carries information.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Serialize, Serializer};

use crate::error::{DashboardError, DashboardResult};

pub const SECONDS_PER_DAY: u32 = 86_400;
const MILLIS_PER_DAY: u32 = SECONDS_PER_DAY * 1000;

/// A time-of-day anchored at the reference date (1970-01-01).
///
/// Ordering and equality compare the time-of-day only. The one value whose
/// calendar date differs is the end-of-day boundary (`86400` seconds), which
/// sits on the following midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartTimeValue {
    millis: u32,
}

/// Decode a seconds-since-midnight value for a chart time column.
///
/// Fractional milliseconds are truncated.
///
/// # Errors
///
/// Returns `DashboardError::DataContractViolation` if `seconds` is not finite
/// or falls outside `[0, 86400]`.
pub fn seconds_to_time_of_day(seconds: f64) -> DashboardResult<ChartTimeValue> {
    if !seconds.is_finite() || !(0.0..=f64::from(SECONDS_PER_DAY)).contains(&seconds) {
        return Err(DashboardError::DataContractViolation(format!(
            "{seconds} seconds is not a time of day"
        )));
    }

    // Bounded above by MILLIS_PER_DAY, so the cast cannot overflow.
    let millis = (seconds * 1000.0).trunc() as u32;
    Ok(ChartTimeValue {
        millis: millis.min(MILLIS_PER_DAY),
    })
}

impl ChartTimeValue {
    /// Whole seconds since midnight.
    #[must_use]
    pub fn seconds_of_day(&self) -> u32 {
        self.millis / 1000
    }

    #[must_use]
    pub fn millis_of_day(&self) -> u32 {
        self.millis
    }

    #[must_use]
    pub fn is_end_of_day(&self) -> bool {
        self.millis == MILLIS_PER_DAY
    }

    /// Wall-clock time; the end-of-day boundary reads as midnight.
    #[must_use]
    pub fn time_of_day(&self) -> NaiveTime {
        self.to_datetime().time()
    }

    fn to_datetime(self) -> NaiveDateTime {
        NaiveDateTime::default() + TimeDelta::milliseconds(i64::from(self.millis))
    }

    /// Render with a strftime pattern, e.g. `%H:%M:%S`.
    #[must_use]
    pub fn format(&self, pattern: &str) -> String {
        if self.is_end_of_day() {
            // 24:00:00 keeps the boundary distinct from the day's first instant
            return pattern
                .replace("%H", "24")
                .replace("%M", "00")
                .replace("%S", "00");
        }
        self.to_datetime().format(pattern).to_string()
    }
}

impl fmt::Display for ChartTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format("%H:%M:%S"))
    }
}

/// Serializes as the chart library's JSON date literal,
/// `Date(year, monthIndex, day, hours, minutes, seconds, millis)`. End of day
/// is the next midnight, `Date(1970, 0, 2, 0, 0, 0, 0)`.
impl Serialize for ChartTimeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let dt = self.to_datetime();
        serializer.serialize_str(&format!(
            "Date({}, {}, {}, {}, {}, {}, {})",
            dt.year(),
            dt.month0(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
            dt.nanosecond() / 1_000_000
        ))
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a user in the presence backend.
///
/// The backend emits ids as JSON numbers, but ids originating from the users
/// XML feed arrive as numeric strings. Both are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawUserId", into = "u64")]
pub struct UserId(pub u64);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawUserId {
    Number(u64),
    Text(String),
}

impl TryFrom<RawUserId> for UserId {
    type Error = String;

    fn try_from(raw: RawUserId) -> Result<Self, Self::Error> {
        match raw {
            RawUserId::Number(id) => Ok(Self(id)),
            RawUserId::Text(text) => text
                .parse()
                .map_err(|_| format!("user id {text:?} is not numeric")),
        }
    }
}

impl From<UserId> for u64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Response item from `/api/v2/users`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiUser {
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
}

/// One weekday of `/api/v1/mean_time_weekday/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawMeanRow")]
pub struct WeekdayMeanRow {
    pub weekday: String,
    pub mean_duration_seconds: f64,
}

/// Raw `[weekday, mean_seconds]` pair
#[derive(Debug, Deserialize)]
struct RawMeanRow(String, f64);

impl From<RawMeanRow> for WeekdayMeanRow {
    fn from(raw: RawMeanRow) -> Self {
        Self {
            weekday: raw.0,
            mean_duration_seconds: raw.1,
        }
    }
}

/// One weekday of `/api/v1/presence_start_end/{id}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawIntervalRow")]
pub struct PresenceIntervalRow {
    pub weekday: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

/// Raw `[weekday, start_seconds, end_seconds]` triple
#[derive(Debug, Deserialize)]
struct RawIntervalRow(String, f64, f64);

impl From<RawIntervalRow> for PresenceIntervalRow {
    fn from(raw: RawIntervalRow) -> Self {
        Self {
            weekday: raw.0,
            start_seconds: raw.1,
            end_seconds: raw.2,
        }
    }
}

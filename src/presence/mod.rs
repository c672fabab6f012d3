pub mod client;
pub mod models;

pub use client::{PresenceApi, PresenceClient};
pub use models::{ApiUser, PresenceIntervalRow, UserId, WeekdayMeanRow};

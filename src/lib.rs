//! Presence dashboard - chart data pipeline for the presence analyzer
//!
//! Loads the user list and per-user presence data from the presence API,
//! decodes it into chart tables and keeps a single chart in sync with the
//! user selector.

pub mod chart;
pub mod codec;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod error;
pub mod presence;
pub mod selection;
pub mod services;

//! In-memory presence backend and chart surface shared by integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use presence_dashboard::chart::{ChartSpec, ChartSurface};
use presence_dashboard::error::{DashboardError, DashboardResult};
use presence_dashboard::presence::{
    ApiUser, PresenceApi, PresenceIntervalRow, UserId, WeekdayMeanRow,
};

#[derive(Default)]
pub struct FakePresenceApi {
    users: Vec<ApiUser>,
    users_fail: bool,
    users_delay: Duration,
    mean: HashMap<UserId, Vec<WeekdayMeanRow>>,
    intervals: HashMap<UserId, Vec<PresenceIntervalRow>>,
    delays: HashMap<UserId, Duration>,
    failing: HashSet<UserId>,
    dataset_calls: AtomicUsize,
    requested: Mutex<Vec<UserId>>,
}

impl FakePresenceApi {
    /// Two users, 10 and 141, in that backend order.
    pub fn with_staff() -> Self {
        Self::default()
            .user(10, "Maciej Z.")
            .user(141, "Adam P.")
    }

    pub fn user(mut self, id: u64, name: &str) -> Self {
        self.users.push(ApiUser {
            user_id: UserId(id),
            name: name.to_string(),
            avatar: format!("https://intranet.example/api/images/users/{id}"),
        });
        self
    }

    pub fn failing_users(mut self) -> Self {
        self.users_fail = true;
        self
    }

    pub fn users_delay(mut self, delay: Duration) -> Self {
        self.users_delay = delay;
        self
    }

    pub fn mean(mut self, id: u64, rows: &[(&str, f64)]) -> Self {
        self.mean.insert(
            UserId(id),
            rows.iter()
                .map(|(weekday, seconds)| WeekdayMeanRow {
                    weekday: (*weekday).to_string(),
                    mean_duration_seconds: *seconds,
                })
                .collect(),
        );
        self
    }

    pub fn intervals(mut self, id: u64, rows: &[(&str, f64, f64)]) -> Self {
        self.intervals.insert(
            UserId(id),
            rows.iter()
                .map(|(weekday, start, end)| PresenceIntervalRow {
                    weekday: (*weekday).to_string(),
                    start_seconds: *start,
                    end_seconds: *end,
                })
                .collect(),
        );
        self
    }

    pub fn delay(mut self, id: u64, delay: Duration) -> Self {
        self.delays.insert(UserId(id), delay);
        self
    }

    pub fn failing_dataset(mut self, id: u64) -> Self {
        self.failing.insert(UserId(id));
        self
    }

    pub fn dataset_calls(&self) -> usize {
        self.dataset_calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<UserId> {
        self.requested.lock().unwrap().clone()
    }

    async fn dataset<T: Clone>(
        &self,
        user_id: UserId,
        source: &HashMap<UserId, Vec<T>>,
    ) -> DashboardResult<Vec<T>> {
        self.dataset_calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(user_id);

        if let Some(delay) = self.delays.get(&user_id) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.contains(&user_id) {
            return Err(DashboardError::DatasetFetchFailure(
                "HTTP 500 Internal Server Error".to_string(),
            ));
        }
        Ok(source.get(&user_id).cloned().unwrap_or_default())
    }
}

impl PresenceApi for FakePresenceApi {
    async fn users(&self) -> DashboardResult<Vec<ApiUser>> {
        tokio::time::sleep(self.users_delay).await;
        if self.users_fail {
            return Err(DashboardError::DirectoryLoadFailure(
                "HTTP 502 Bad Gateway".to_string(),
            ));
        }
        Ok(self.users.clone())
    }

    async fn mean_time_weekday(&self, user_id: UserId) -> DashboardResult<Vec<WeekdayMeanRow>> {
        self.dataset(user_id, &self.mean).await
    }

    async fn presence_start_end(
        &self,
        user_id: UserId,
    ) -> DashboardResult<Vec<PresenceIntervalRow>> {
        self.dataset(user_id, &self.intervals).await
    }
}

/// Records what the dashboard asked the chart container to do.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub drawn: Vec<ChartSpec>,
    pub visible: bool,
}

impl ChartSurface for RecordingSurface {
    fn draw(&mut self, chart: &ChartSpec) {
        self.drawn.push(chart.clone());
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }
}

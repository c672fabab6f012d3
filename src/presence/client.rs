use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{DashboardError, DashboardResult};
use crate::presence::models::{ApiUser, PresenceIntervalRow, UserId, WeekdayMeanRow};

/// Backend operations the dashboard depends on.
pub trait PresenceApi: Send + Sync {
    /// `GET /api/v2/users`
    fn users(&self) -> impl Future<Output = DashboardResult<Vec<ApiUser>>> + Send;

    /// `GET /api/v1/mean_time_weekday/{user_id}`
    fn mean_time_weekday(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = DashboardResult<Vec<WeekdayMeanRow>>> + Send;

    /// `GET /api/v1/presence_start_end/{user_id}`
    fn presence_start_end(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = DashboardResult<Vec<PresenceIntervalRow>>> + Send;
}

pub struct PresenceClient {
    http_client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl PresenceClient {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::DirectoryLoadFailure` if the HTTP client cannot be
    /// constructed, since nothing can be loaded without it.
    pub fn new(config: &Config) -> DashboardResult<Self> {
        let request_timeout = config.request_timeout();
        let http_client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                DashboardError::DirectoryLoadFailure(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            http_client,
            base_url: config.api_base_url.clone(),
            request_timeout,
        })
    }

    /// Issue a GET for `path` and decode the JSON body. Deadline hits become
    /// `DashboardError::Timeout`; every other failure goes through `fail` so
    /// each endpoint keeps its own error kind.
    async fn get_json<T>(
        &self,
        path: &str,
        fail: fn(String) -> DashboardError,
    ) -> DashboardResult<T>
    where
        T: DeserializeOwned,
    {
        let transport = |context: &str, e: reqwest::Error| {
            if e.is_timeout() {
                DashboardError::Timeout(self.request_timeout)
            } else {
                fail(format!("{context}: {e}"))
            }
        };

        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport("Request failed", e))?;

        if !response.status().is_success() {
            return Err(fail(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| transport("Failed to get response text", e))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse presence API response"
            );
            fail(format!("Failed to parse response: {e}"))
        })
    }
}

impl PresenceApi for PresenceClient {
    async fn users(&self) -> DashboardResult<Vec<ApiUser>> {
        self.get_json("/api/v2/users", DashboardError::DirectoryLoadFailure)
            .await
    }

    async fn mean_time_weekday(&self, user_id: UserId) -> DashboardResult<Vec<WeekdayMeanRow>> {
        self.get_json(
            &format!("/api/v1/mean_time_weekday/{user_id}"),
            DashboardError::DatasetFetchFailure,
        )
        .await
    }

    async fn presence_start_end(
        &self,
        user_id: UserId,
    ) -> DashboardResult<Vec<PresenceIntervalRow>> {
        self.get_json(
            &format!("/api/v1/presence_start_end/{user_id}"),
            DashboardError::DatasetFetchFailure,
        )
        .await
    }
}

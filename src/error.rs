use std::future::Future;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Failed to load users: {0}")]
    DirectoryLoadFailure(String),

    #[error("Failed to fetch presence data: {0}")]
    DatasetFetchFailure(String),

    #[error("Data contract violation: {0}")]
    DataContractViolation(String),

    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Unknown selection: {0}")]
    UnknownSelection(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// Bound a backend call by `limit`, turning an elapsed deadline into
/// `DashboardError::Timeout`.
///
/// # Errors
///
/// Returns `DashboardError::Timeout` if `fut` does not complete in time, or
/// whatever error `fut` itself resolves to.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> DashboardResult<T>
where
    F: Future<Output = DashboardResult<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DashboardError::Timeout(limit))?
}

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presence_dashboard::chart::{ChartSpec, ChartSurface};
use presence_dashboard::config::Config;
use presence_dashboard::dashboard::{DashboardController, SelectionOutcome};
use presence_dashboard::presence::PresenceClient;

/// Prints each drawn chart as DataTable JSON.
struct StdoutSurface;

impl ChartSurface for StdoutSurface {
    fn draw(&mut self, chart: &ChartSpec) {
        match serde_json::to_string_pretty(chart) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "Failed to serialize chart"),
        }
    }

    fn hide(&mut self) {}
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,presence_dashboard=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration (fail-fast)
    let config = Config::from_env()?;
    tracing::info!(
        deployment = ?config.deployment,
        api = %config.api_base_url,
        variant = ?config.chart_variant,
        timeout_secs = config.request_timeout_seconds,
        "Configuration loaded"
    );

    let client = PresenceClient::new(&config)?;
    let dashboard = DashboardController::new(Arc::new(client), StdoutSurface, &config);

    dashboard.start().await?;

    if let Some(options) = dashboard.view().selector {
        for option in &options {
            tracing::info!(value = %option.value, label = %option.label, "Selector option");
        }
    }

    for selection in std::env::args().skip(1) {
        match dashboard.on_selection_change(&selection).await {
            SelectionOutcome::Rendered => {}
            SelectionOutcome::Idle => tracing::info!("Selection cleared"),
            SelectionOutcome::Superseded => {
                tracing::debug!(selection = %selection, "Superseded by a newer selection");
            }
            SelectionOutcome::Failed(e) => {
                tracing::error!(selection = %selection, error = %e, "Chart could not be shown");
            }
        }
    }

    Ok(())
}

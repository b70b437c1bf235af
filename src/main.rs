//! Alertseed bootstrap
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - ALERTSEED_HOST: Cluster hostname (required)
//! - ALERTSEED_PORT: Cluster port (default: 9200)
//! - ALERTSEED_USERNAME: Basic-auth username (required)
//! - ALERTSEED_PASSWORD: Basic-auth password (required)
//! - ALERTSEED_WEBHOOK_URL: Slack webhook URL (required)
//! - ALERTSEED_INDICES: Comma-separated log indices (required, e.g. "app-logs-*,sys-logs-*")
//! - ALERTSEED_INSECURE: Accept invalid TLS certificates (default: false)
//! - RUST_LOG: Log level (default: info)
//!
//! Issues up to three reconcile calls (one destination, two monitors) and
//! exits. Failures are logged per resource and do not stop later resources.

use alertseed::client::AlertingClient;
use alertseed::config::Config;
use alertseed::destinations::DestinationAdapter;
use alertseed::monitors::{MonitorAdapter, MonitorSettings};
use alertseed::reconcile::reconcile;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DESTINATION_NAME: &str = "slack_destination";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alertseed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Alertseed configuration:");
    tracing::info!("  Cluster: {}", config.base_url());
    tracing::info!("  Indices: {}", config.indices.join(", "));
    if config.insecure {
        tracing::warn!("  TLS certificate verification DISABLED");
    }

    let client = AlertingClient::new(
        config.base_url(),
        config.username.clone(),
        config.password.clone(),
        config.insecure,
    );

    // Destination first: the monitors reference its identifier. A failure
    // here is logged and the monitors proceed with an empty identifier so
    // the remaining resources are still reconciled.
    let destination_adapter = DestinationAdapter::new(&client, config.webhook_url.clone());
    let destination_id = match reconcile(&destination_adapter, DESTINATION_NAME).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(name = DESTINATION_NAME, error = %e, "Destination reconciliation failed");
            String::new()
        }
    };

    let settings = MonitorSettings::default();
    let monitors = [("error_monitor", "error", 1u64), ("fatal_monitor", "fatal", 0u64)];

    for (name, level, threshold) in monitors {
        let adapter = MonitorAdapter::new(
            &client,
            config.indices.clone(),
            level,
            threshold,
            destination_id.clone(),
            settings.clone(),
        );
        if let Err(e) = reconcile(&adapter, name).await {
            tracing::error!(name = name, error = %e, "Monitor reconciliation failed");
        }
    }

    Ok(())
}

//! Alertseed: Idempotent Alerting Bootstrap
//!
//! Provisions alerting on an OpenSearch-compatible cluster: a Slack webhook
//! notification destination plus query-level monitors that watch log indices
//! for error-level lines. Every resource is reconciled by name: existing
//! resources are reused, missing ones are created, nothing is ever updated
//! or deleted.
//!
//! # Example
//!
//! ```no_run
//! use alertseed::client::AlertingClient;
//! use alertseed::destinations::DestinationAdapter;
//! use alertseed::reconcile::reconcile;
//!
//! # async fn run() -> Result<(), alertseed::reconcile::ReconcileError> {
//! let client = AlertingClient::new("https://search.internal:9200", "admin", "secret", false);
//! let adapter = DestinationAdapter::new(&client, "https://hooks.slack.com/services/T0/B0/x");
//! let destination_id = reconcile(&adapter, "slack_destination").await?;
//! println!("destination: {destination_id}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod destinations;
pub mod monitors;
pub mod reconcile;

// Re-export commonly used types
pub use client::{AlertingClient, ApiError};
pub use config::{Config, ConfigError};
pub use reconcile::{reconcile, ReconcileError, ResourceAdapter};

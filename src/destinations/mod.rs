//! Slack webhook destination adapter

use serde::Serialize;

use crate::client::{AlertingClient, ApiError, DestinationInfo};
use crate::reconcile::ResourceAdapter;

/// Destination creation payload
#[derive(Debug, Clone, Serialize)]
pub struct DestinationSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub channel_kind: ChannelKind,
    pub slack: SlackChannel,
}

/// Supported destination channel kinds
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelKind {
    Slack,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlackChannel {
    pub url: String,
}

impl DestinationSpec {
    /// Build a Slack webhook destination
    pub fn slack(name: impl Into<String>, webhook_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            channel_kind: ChannelKind::Slack,
            slack: SlackChannel {
                url: webhook_url.into(),
            },
        }
    }
}

/// First destination whose name matches exactly
pub fn find_by_name<'a>(destinations: &'a [DestinationInfo], name: &str) -> Option<&'a str> {
    destinations
        .iter()
        .find(|d| d.name == name)
        .map(|d| d.id.as_str())
}

/// Reconciliation adapter for webhook destinations
pub struct DestinationAdapter<'a> {
    client: &'a AlertingClient,
    webhook_url: String,
}

impl<'a> DestinationAdapter<'a> {
    pub fn new(client: &'a AlertingClient, webhook_url: impl Into<String>) -> Self {
        Self {
            client,
            webhook_url: webhook_url.into(),
        }
    }
}

impl ResourceAdapter for DestinationAdapter<'_> {
    fn kind(&self) -> &'static str {
        "destination"
    }

    /// Linear scan of the full destination list for an exact name match
    async fn lookup(&self, name: &str) -> Result<Option<String>, ApiError> {
        let destinations = self.client.list_destinations().await?;
        Ok(find_by_name(&destinations, name).map(String::from))
    }

    async fn create(&self, name: &str) -> Result<String, ApiError> {
        let spec = DestinationSpec::slack(name, self.webhook_url.as_str());
        self.client.create_destination(&spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(id: &str, name: &str) -> DestinationInfo {
        DestinationInfo {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_spec_wire_shape() {
        let spec = DestinationSpec::slack("slack_destination", "https://hooks.slack.com/services/T0/B0/x");
        let v = serde_json::to_value(&spec).unwrap();
        assert_eq!(v["name"], "slack_destination");
        assert_eq!(v["type"], "slack");
        assert_eq!(v["slack"]["url"], "https://hooks.slack.com/services/T0/B0/x");
    }

    #[test]
    fn test_find_by_name_exact_match() {
        let destinations = vec![
            info("d-1", "pagerduty"),
            info("d-2", "slack_destination"),
            info("d-3", "slack_destination_staging"),
        ];
        assert_eq!(find_by_name(&destinations, "slack_destination"), Some("d-2"));
    }

    #[test]
    fn test_find_by_name_absent() {
        let destinations = vec![info("d-1", "pagerduty")];
        assert_eq!(find_by_name(&destinations, "slack_destination"), None);
        assert_eq!(find_by_name(&[], "slack_destination"), None);
    }

    #[test]
    fn test_find_by_name_returns_first_match() {
        let destinations = vec![info("d-1", "dup"), info("d-2", "dup")];
        assert_eq!(find_by_name(&destinations, "dup"), Some("d-1"));
    }
}

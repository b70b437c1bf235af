//! HTTP client for the alerting plugin REST API
//!
//! Pure client: list/create destinations and search/create monitors against
//! the `_plugins/_alerting` endpoints. The wire protocol is owned by the
//! remote cluster.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::destinations::DestinationSpec;
use crate::monitors::MonitorSpec;

/// Client for the cluster's alerting plugin endpoints
#[derive(Debug, Clone)]
pub struct AlertingClient {
    http_client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

/// A destination as returned by the list endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DestinationInfo {
    pub id: String,
    pub name: String,
}

/// A monitor hit as returned by the search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorHit {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct DestinationListResponse {
    destinations: Vec<DestinationInfo>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    hits: Vec<MonitorHit>,
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(rename = "_id")]
    id: String,
}

impl AlertingClient {
    /// Create a client with basic-auth credentials and a 30s request timeout
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        insecure: bool,
    ) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .danger_accept_invalid_certs(insecure)
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Fetch all notification destinations
    pub async fn list_destinations(&self) -> Result<Vec<DestinationInfo>, ApiError> {
        let url = format!("{}/_plugins/_alerting/destinations", self.base_url);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let result: DestinationListResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        Ok(result.destinations)
    }

    /// Create a destination; returns the assigned identifier
    pub async fn create_destination(&self, spec: &DestinationSpec) -> Result<String, ApiError> {
        let url = format!("{}/_plugins/_alerting/destinations", self.base_url);
        self.post_for_id(&url, spec).await
    }

    /// Search monitors with the given query body; returns the raw hits
    pub async fn search_monitors(&self, body: &Value) -> Result<Vec<MonitorHit>, ApiError> {
        let url = format!("{}/_plugins/_alerting/monitors/_search", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        Ok(result.hits.hits)
    }

    /// Create a monitor; returns the assigned identifier
    pub async fn create_monitor(&self, spec: &MonitorSpec) -> Result<String, ApiError> {
        let url = format!("{}/_plugins/_alerting/monitors", self.base_url);
        self.post_for_id(&url, spec).await
    }

    async fn post_for_id<T: serde::Serialize>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<String, ApiError> {
        let response = self
            .http_client
            .post(url)
            .basic_auth(&self.username, Some(&self.password))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = Self::check_status(response).await?;

        let result: CreateResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;

        tracing::debug!(url = %url, id = %result.id, "Resource created");

        Ok(result.id)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Remote { status, body });
        }
        Ok(response)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Remote error (status {status}): {body}")]
    Remote { status: u16, body: String },

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_hit_deserializes_underscore_id() {
        let raw = serde_json::json!({"_id": "m-123", "_score": 1.0, "_source": {}});
        let hit: MonitorHit = serde_json::from_value(raw).unwrap();
        assert_eq!(hit.id, "m-123");
    }

    #[test]
    fn test_destination_list_response() {
        let raw = serde_json::json!({
            "totalDestinations": 1,
            "destinations": [{"id": "d-1", "name": "slack_destination", "type": "slack"}]
        });
        let parsed: DestinationListResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.destinations.len(), 1);
        assert_eq!(parsed.destinations[0].id, "d-1");
    }
}

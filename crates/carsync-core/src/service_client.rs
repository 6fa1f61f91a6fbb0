//! HTTP client for the vehicle telemetry REST API.
//!
//! Two endpoints are used:
//!
//! - `GET  {base}/api/car/{plate}` returns a [`VehicleSnapshot`]
//! - `POST {base}/api/car/{plate}/command` with body `{"command": "..."}`
//!
//! Error responses may carry a JSON body of the form `{"error": "..."}`; its
//! message is used as the failure reason when present.
//!
//! # Example
//!
//! ```no_run
//! use carsync_core::{HttpRemoteClient, RemoteClient};
//!
//! # async fn example() -> carsync_core::Result<()> {
//! let client = HttpRemoteClient::new("http://localhost:3001")?;
//! let snapshot = client.get_snapshot("ABC-123").await?;
//! println!("Cabin: {:.1}°C", snapshot.indoor_temp);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use carsync_types::{CommandRequest, VehicleCommand, VehicleSnapshot};

use crate::error::{Error, Result};
use crate::traits::RemoteClient;

/// Per-request timeout used by [`HttpRemoteClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`RemoteClient`] backed by the telemetry service's REST API.
#[derive(Debug, Clone)]
pub struct HttpRemoteClient {
    client: Client,
    base_url: String,
    base: Url,
    timeout: Duration,
}

impl HttpRemoteClient {
    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Service root, e.g. `http://localhost:3001`
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::invalid_config(format!("failed to build HTTP client: {e}")))?;

        Self::build(base_url, client, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom reqwest Client.
    ///
    /// The reported timeout duration is [`DEFAULT_TIMEOUT`]; the effective
    /// timeout is whatever `client` was built with.
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        Self::build(base_url, client, DEFAULT_TIMEOUT)
    }

    fn build(base_url: &str, client: Client, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::invalid_config(format!(
                "URL must start with http:// or https://, got: {}",
                base_url
            )));
        }

        let base = Url::parse(&base_url)
            .map_err(|e| Error::invalid_config(format!("invalid service URL {base_url}: {e}")))?;

        Ok(Self {
            client,
            base_url,
            base,
            timeout,
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of `/api/car/{plate}` plus any trailing segments.
    ///
    /// The plate is percent-encoded as a single path segment.
    fn car_url(&self, plate: &str, trailing: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::invalid_config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "car", plate])
            .extend(trailing);
        Ok(url)
    }

    fn transport_error(&self, operation: &str, plate: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::timeout(operation, self.timeout)
        } else {
            Error::request_failed(plate, err.to_string())
        }
    }
}

#[async_trait]
impl RemoteClient for HttpRemoteClient {
    async fn get_snapshot(&self, plate: &str) -> Result<VehicleSnapshot> {
        let url = self.car_url(plate, &[])?;
        debug!(%url, "GET snapshot");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error("get_snapshot", plate, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::not_found(plate));
        }
        if !status.is_success() {
            let message = error_message(response, status).await;
            return Err(Error::request_failed(plate, message));
        }

        response
            .json::<VehicleSnapshot>()
            .await
            .map_err(|e| Error::request_failed(plate, format!("invalid response body: {e}")))
    }

    async fn send_command(&self, plate: &str, command: VehicleCommand) -> Result<()> {
        let url = self.car_url(plate, &["command"])?;
        debug!(%url, %command, "POST command");

        let response = self
            .client
            .post(url)
            .json(&CommandRequest { command })
            .send()
            .await
            .map_err(|e| Error::command_failed(plate, command, e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let message = error_message(response, status).await;
            Err(Error::command_failed(plate, command, message))
        }
    }
}

/// The `error` field of a JSON error body, or the status line.
async fn error_message(response: reqwest::Response, status: StatusCode) -> String {
    response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| status.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = HttpRemoteClient::new("http://localhost:3001");
        assert!(client.is_ok());

        let client = client.unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_client_normalizes_url() {
        let client = HttpRemoteClient::new("http://localhost:3001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
    }

    #[test]
    fn test_client_invalid_url() {
        let result = HttpRemoteClient::new("localhost:3001");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = HttpRemoteClient::new("ftp://localhost");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_snapshot_url() {
        let client = HttpRemoteClient::new("http://localhost:3001").unwrap();
        let url = client.car_url("ABC-123", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/car/ABC-123");
    }

    #[test]
    fn test_command_url_keeps_base_path() {
        let client = HttpRemoteClient::new("https://fleet.example.com/telemetry/").unwrap();
        let url = client.car_url("ABC-123", &["command"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://fleet.example.com/telemetry/api/car/ABC-123/command"
        );
    }

    #[test]
    fn test_plate_is_a_single_escaped_segment() {
        let client = HttpRemoteClient::new("http://localhost:3001").unwrap();
        let url = client.car_url("AB/12 3", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3001/api/car/AB%2F12%203");
    }
}

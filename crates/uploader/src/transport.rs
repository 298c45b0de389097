//! Remote endpoints used during finalization.
//!
//! The [`Transport`] trait is the seam between the finalize sequence and
//! the network. [`HttpTransport`] talks to the real service with reqwest.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gazelog_common::config::UploadConfig;
use gazelog_common::error::{GazeError, GazeResult};

/// One-time upload location handed out by the destination service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadDestination {
    pub upload_url: String,
}

#[derive(Debug, Serialize)]
struct DestinationRequest<'a> {
    file_name: &'a str,
}

/// Network operations needed to ship an archive.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Public IP of this machine, used in the archive name.
    async fn external_ip(&self) -> GazeResult<String>;

    /// Ask the destination service for an upload URL for `archive_name`.
    async fn request_destination(&self, archive_name: &str) -> GazeResult<UploadDestination>;

    /// PUT the archive bytes to `url`.
    async fn upload(&self, url: &str, body: Vec<u8>) -> GazeResult<()>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    destination_url: String,
    external_ip_url: String,
}

impl HttpTransport {
    pub fn new(config: &UploadConfig) -> GazeResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gazelog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GazeError::upload(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            destination_url: config.destination_url.clone(),
            external_ip_url: config.external_ip_url.clone(),
        })
    }

    pub fn destination_url(&self) -> &str {
        &self.destination_url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn external_ip(&self) -> GazeResult<String> {
        let response = self
            .client
            .get(&self.external_ip_url)
            .send()
            .await
            .map_err(|e| GazeError::destination(format!("IP lookup failed: {e}")))?;
        if !response.status().is_success() {
            return Err(GazeError::destination(format!(
                "IP lookup returned {}",
                response.status()
            )));
        }
        let text = response
            .text()
            .await
            .map_err(|e| GazeError::destination(format!("IP lookup body unreadable: {e}")))?;
        let ip = text.trim();
        if ip.is_empty() {
            return Err(GazeError::destination("IP lookup returned an empty body"));
        }
        Ok(ip.to_string())
    }

    async fn request_destination(&self, archive_name: &str) -> GazeResult<UploadDestination> {
        tracing::debug!(url = %self.destination_url, archive_name, "Requesting upload URL");
        let response = self
            .client
            .post(&self.destination_url)
            .json(&DestinationRequest {
                file_name: archive_name,
            })
            .send()
            .await
            .map_err(|e| GazeError::destination(format!("Request failed: {e}")))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(GazeError::destination(format!(
                "Service returned {status}: {body}"
            )));
        }

        response
            .json::<UploadDestination>()
            .await
            .map_err(|e| GazeError::destination(format!("Malformed response: {e}")))
    }

    async fn upload(&self, url: &str, body: Vec<u8>) -> GazeResult<()> {
        let bytes = body.len();
        let response = self
            .client
            .put(url)
            .body(body)
            .send()
            .await
            .map_err(|e| GazeError::upload(format!("PUT failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GazeError::upload(format!("Upload returned {status}: {body}")));
        }
        tracing::info!(bytes, %status, "Archive uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_request_body() {
        let body = serde_json::to_string(&DestinationRequest {
            file_name: "iris_data_1.2.3.4_2026-01-01_00-00-00.zip",
        })
        .unwrap();
        assert_eq!(
            body,
            r#"{"file_name":"iris_data_1.2.3.4_2026-01-01_00-00-00.zip"}"#
        );
    }

    #[test]
    fn test_destination_response_parse() {
        let dest: UploadDestination =
            serde_json::from_str(r#"{"upload_url":"https://bucket/put?sig=1","extra":true}"#)
                .unwrap();
        assert_eq!(dest.upload_url, "https://bucket/put?sig=1");
    }

    #[test]
    fn test_http_transport_uses_config_endpoints() {
        let config = UploadConfig::default();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.destination_url(), config.destination_url);
    }
}

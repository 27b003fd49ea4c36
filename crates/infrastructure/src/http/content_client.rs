use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

use domain::DomainError;
use domain::player::{ContentSource, TvContent};
use domain::tv::TvId;

/// Pulls content from the admin server's TV endpoints.
///
/// Network failures, timeouts and 5xx responses are `Transient`; a 404
/// means the TV is unknown to the server.
pub struct HttpContentSource {
    client: Client,
    base_url: String,
}

impl HttpContentSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            DomainError::InvalidConfiguration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn check(&self, response: Response, tv_id: &TvId) -> Result<Response, DomainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(DomainError::not_found("TV", tv_id)),
            s if s.is_server_error() || s == StatusCode::TOO_MANY_REQUESTS => Err(
                DomainError::Transient(format!("Server responded {}: {}", s, body)),
            ),
            s => Err(DomainError::Validation(format!(
                "Server rejected request ({}): {}",
                s, body
            ))),
        }
    }
}

fn transport_error(e: reqwest::Error) -> DomainError {
    DomainError::Transient(format!("Request failed: {}", e))
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_content(&self, tv_id: &TvId) -> Result<TvContent, DomainError> {
        let url = format!("{}/content/{}", self.base_url, tv_id);
        debug!(tv_id = %tv_id, url = %url, "Fetching content");

        let response = self.client.get(&url).send().await.map_err(transport_error)?;
        let response = self.check(response, tv_id).await?;
        response.json::<TvContent>().await.map_err(|e| {
            DomainError::Transient(format!("Malformed content payload: {}", e))
        })
    }

    async fn send_heartbeat(&self, tv_id: &TvId) -> Result<(), DomainError> {
        let url = format!("{}/heartbeat/{}", self.base_url, tv_id);
        let response = self.client.post(&url).send().await.map_err(transport_error)?;
        self.check(response, tv_id).await?;
        debug!(tv_id = %tv_id, "Heartbeat sent");
        Ok(())
    }
}

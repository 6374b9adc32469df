use axum::body::Bytes;
use reqwest::{Client, StatusCode, Url, header::CONTENT_TYPE};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Webhook responded with status {status}")]
    Rejected { status: StatusCode },

    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Forwards submissions to the upstream collector. One POST per call, no retry.
#[derive(Clone)]
pub struct WebhookClient {
    http_client: Client,
}

impl WebhookClient {
    pub fn new() -> Self {
        Self {
            http_client: Client::new(),
        }
    }

    /// Sends `body` exactly as received; it is never re-serialized.
    pub async fn forward(&self, url: &str, body: Bytes) -> Result<(), WebhookError> {
        debug!(host = %webhook_host(url), "Forwarding submission to webhook");

        let response = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();

        if status.is_success() {
            info!(status = status.as_u16(), "Webhook accepted submission");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Webhook rejected submission");
            Err(WebhookError::Rejected { status })
        }
    }
}

impl Default for WebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

// Webhook URLs tend to carry secrets in the path or query.
fn webhook_host(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| "invalid-url".to_string())
}

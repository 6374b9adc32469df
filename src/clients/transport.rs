use std::future::Future;

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub const SUBMIT_PATH: &str = "/api/forms/submit";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Submission endpoint responded with status {0}")]
    Status(StatusCode),

    #[error("Submission request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Outbound side of a form controller: delivers one envelope to the intake endpoint.
pub trait SubmissionTransport {
    fn post(&self, envelope: &Value) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Clone)]
pub struct HttpTransport {
    http_client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            http_client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SUBMIT_PATH),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.site_url())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl SubmissionTransport for HttpTransport {
    async fn post(&self, envelope: &Value) -> Result<(), TransportError> {
        debug!(endpoint = %self.endpoint, "Posting form submission");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(envelope)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::Status(status))
        }
    }
}

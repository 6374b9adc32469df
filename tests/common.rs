use std::sync::{Arc, Mutex};

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{Value, json};
use studio_intake::{
    api::serve,
    clients::transport::{SubmissionTransport, TransportError},
    config::Config,
};
use tokio::net::TcpListener;
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::{method, path}};

pub const WEBHOOK_PATH: &str = "/hooks/intake";

/// Starts the intake server on an ephemeral port and returns its base URL.
pub async fn spawn_server(config: Config) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        let _ = serve(listener, config).await;
    });

    Ok(format!("http://{}", addr))
}

pub fn config_for(webhook: Option<String>) -> Config {
    Config {
        form_webhook_url: webhook,
        ..Default::default()
    }
}

/// A webhook receiver answering every POST with `status`.
pub async fn webhook_responding(status: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    server
}

pub fn webhook_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), WEBHOOK_PATH)
}

pub async fn received_bodies(server: &MockServer) -> Result<Vec<Value>> {
    let requests = server.received_requests().await.unwrap_or_default();
    requests
        .iter()
        .map(|request| Ok(request.body_json::<Value>()?))
        .collect()
}

/// Bodies exactly as the webhook received them on the wire.
pub async fn received_raw_bodies(server: &MockServer) -> Vec<Vec<u8>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .map(|request| request.body)
        .collect()
}

pub fn contact_envelope() -> Value {
    json!({
        "type": "general_contact",
        "submittedAt": "2024-01-01T00:00:00.000Z",
        "name": "Jane Doe",
        "email": "jane@example.com",
        "subject": "general",
        "message": "Hello"
    })
}

/// In-memory transport that records envelopes instead of sending them.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    pub sent: Arc<Mutex<Vec<Value>>>,
    pub fail_with: Option<StatusCode>,
}

impl RecordingTransport {
    pub fn failing(status: StatusCode) -> Self {
        Self {
            fail_with: Some(status),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Value> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl SubmissionTransport for RecordingTransport {
    async fn post(&self, envelope: &Value) -> Result<(), TransportError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(envelope.clone());
        }

        match self.fail_with {
            Some(status) => Err(TransportError::Status(status)),
            None => Ok(()),
        }
    }
}

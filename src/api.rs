use std::sync::Arc;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::{
    clients::{
        health::HealthChecker,
        transport::SUBMIT_PATH,
        webhook::{WebhookClient, WebhookError},
    },
    config::Config,
    error::ApiError,
    models::{envelope::SubmissionEnvelope, response::SubmitResponse},
};

pub struct AppState {
    config: Config,
    webhook_client: WebhookClient,
    health_checker: HealthChecker,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            health_checker: HealthChecker::new(config.clone()),
            webhook_client: WebhookClient::new(),
            config,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(SUBMIT_PATH, post(submit_form))
        .route("/health", get(health_check))
        .route("/book", get(book))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(listener: TcpListener, config: Config) -> std::io::Result<()> {
    let app = router(Arc::new(AppState::new(config)));
    axum::serve(listener, app).await
}

pub async fn run_api_server(config: Config) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr).await?;

    if config.webhook_url().is_none() {
        warn!("FORM_WEBHOOK_URL is not set; every submission will fail with a configuration error");
    }

    info!(address = %addr, "Form intake server started");

    serve(listener, config).await?;

    Ok(())
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SubmitResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    async move {
        forward_submission(&state, body)
            .await
            .inspect_err(ApiError::log)
    }
    .instrument(info_span!("submission", %request_id))
    .await
}

async fn forward_submission(state: &AppState, body: Bytes) -> Result<Json<SubmitResponse>, ApiError> {
    let envelope = SubmissionEnvelope::parse(&body)?;

    info!(
        submission_type = envelope.kind.as_deref().unwrap_or("unknown"),
        submitted_at = envelope.submitted_at.as_deref().unwrap_or("unknown"),
        field_count = envelope.fields.len(),
        "Form submission received"
    );

    if let (Some(kind), None) = (envelope.kind.as_deref(), envelope.submission_type()) {
        debug!(kind, "Unrecognized submission type, forwarding as-is");
    }

    let url = state.config.webhook_url().ok_or(ApiError::MissingWebhook)?;

    state
        .webhook_client
        .forward(url, body)
        .await
        .map_err(|e| match e {
            WebhookError::Rejected { status } => ApiError::UpstreamRejected(status),
            WebhookError::Transport(e) => ApiError::Internal(e.into()),
        })?;

    info!("Form submission forwarded");

    Ok(Json(SubmitResponse::success()))
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.health_checker.check_all()))
}

async fn book(State(state): State<Arc<AppState>>) -> Response {
    match state.config.booking_url() {
        Some(url) => Redirect::temporary(url).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

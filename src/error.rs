use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::{envelope::EnvelopeError, response::ErrorResponse};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid form data: {0}")]
    InvalidFormData(#[from] EnvelopeError),

    #[error("Form webhook URL is not configured")]
    MissingWebhook,

    #[error("Upstream webhook responded with status {0}")]
    UpstreamRejected(reqwest::StatusCode),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidFormData(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingWebhook => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamRejected(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Records the failure. Call while the request span is still entered.
    pub fn log(&self) {
        match self {
            ApiError::InvalidFormData(e) => warn!(error = %e, "Rejected malformed submission"),
            ApiError::MissingWebhook => error!("FORM_WEBHOOK_URL is not set, rejecting submission"),
            ApiError::UpstreamRejected(status) => {
                warn!(status = status.as_u16(), "Upstream webhook rejected submission")
            }
            ApiError::Internal(e) => {
                error!(error = ?e, "Unhandled error while processing submission")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match &self {
            ApiError::InvalidFormData(e) => {
                ErrorResponse::new("Invalid form data").with_details(Value::String(e.to_string()))
            }
            ApiError::MissingWebhook => ErrorResponse::new("Configuration error"),
            ApiError::UpstreamRejected(_) => ErrorResponse::new("Upstream webhook failed"),
            ApiError::Internal(_) => ErrorResponse::new("Internal server error"),
        };

        (self.status(), Json(body)).into_response()
    }
}

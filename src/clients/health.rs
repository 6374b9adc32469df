use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use crate::{
    config::Config,
    models::health::{HealthCheckResponse, HealthStatus, ServiceHealth},
};

pub struct HealthChecker {
    config: Config,
}

impl HealthChecker {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn check_all(&self) -> HealthCheckResponse {
        let mut checks = HashMap::new();
        checks.insert("webhook".to_string(), self.check_webhook());

        let status = if checks
            .values()
            .any(|health| health.status == HealthStatus::Degraded)
        {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        HealthCheckResponse {
            status,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            checks,
        }
    }

    // Configuration only; the upstream is never called from a health check.
    fn check_webhook(&self) -> ServiceHealth {
        match self.config.webhook_url() {
            Some(_) => {
                debug!("Webhook URL configured");
                ServiceHealth::healthy()
            }
            None => ServiceHealth::degraded("FORM_WEBHOOK_URL is not configured".to_string()),
        }
    }
}

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    clients::transport::{SubmissionTransport, TransportError},
    models::{envelope::SubmissionEnvelope, forms::FormSchema, validation::FieldErrors},
};

/// How long the confirmation view stays up before the form resets.
pub const CONFIRMATION_DELAY: Duration = Duration::from_millis(2500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Submitting,
    Submitted,
    /// Delivery failed. The form stays editable and can be submitted again.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormHost {
    Page,
    Modal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Reset,
    CloseModal,
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Form has invalid fields: {0}")]
    Validation(FieldErrors),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Failed to encode submission: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Local state for a single form instance: the draft values, field errors and
/// where the submission lifecycle currently stands.
pub struct FormController<F, T> {
    transport: T,
    host: FormHost,
    values: F,
    state: FormState,
    field_errors: FieldErrors,
    last_submission: Option<Value>,
    confirmation_delay: Duration,
}

impl<F, T> FormController<F, T>
where
    F: FormSchema + Default,
    T: SubmissionTransport,
{
    pub fn new(transport: T, host: FormHost) -> Self {
        Self {
            transport,
            host,
            values: F::default(),
            state: FormState::Idle,
            field_errors: FieldErrors::default(),
            last_submission: None,
            confirmation_delay: CONFIRMATION_DELAY,
        }
    }

    pub fn with_confirmation_delay(mut self, delay: Duration) -> Self {
        self.confirmation_delay = delay;
        self
    }

    pub fn values(&self) -> &F {
        &self.values
    }

    pub fn set_values(&mut self, values: F) {
        self.values = values;
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn is_submitted(&self) -> bool {
        self.state == FormState::Submitted
    }

    pub fn submit_enabled(&self) -> bool {
        matches!(self.state, FormState::Idle | FormState::Failed(_))
    }

    pub fn submit_label(&self) -> &'static str {
        match self.state {
            FormState::Submitting => "Sending...",
            FormState::Failed(_) => "Try Again",
            _ => "Submit",
        }
    }

    /// The envelope most recently delivered, kept until the form resets.
    pub fn last_submission(&self) -> Option<&Value> {
        self.last_submission.as_ref()
    }

    /// Validates the current values and, if they pass, delivers exactly one
    /// envelope through the transport.
    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        if !self.submit_enabled() {
            return Err(SubmitError::Busy);
        }

        if let Err(errors) = self.values.validate_fields() {
            debug!(kind = %F::KIND, fields = %errors, "Form validation failed");
            self.field_errors = errors.clone();
            self.state = FormState::Idle;
            return Err(SubmitError::Validation(errors));
        }

        self.field_errors = FieldErrors::default();

        let envelope = SubmissionEnvelope::new(F::KIND, self.values.to_fields()?).to_value();

        self.state = FormState::Submitting;

        match self.transport.post(&envelope).await {
            Ok(()) => {
                info!(kind = %F::KIND, "Form submitted");
                self.state = FormState::Submitted;
                self.last_submission = Some(envelope);
                Ok(())
            }
            Err(e) => {
                warn!(kind = %F::KIND, error = %e, "Form submission failed");
                self.state = FormState::Failed(e.to_string());
                Err(SubmitError::Transport(e))
            }
        }
    }

    /// Holds the confirmation view for the configured delay, then clears the
    /// form. Returns `None` when there is no confirmation showing.
    pub async fn finish_confirmation(&mut self) -> Option<ConfirmationOutcome> {
        if !self.is_submitted() {
            return None;
        }

        sleep(self.confirmation_delay).await;
        self.reset();

        Some(match self.host {
            FormHost::Page => ConfirmationOutcome::Reset,
            FormHost::Modal => ConfirmationOutcome::CloseModal,
        })
    }

    pub fn reset(&mut self) {
        self.values = F::default();
        self.state = FormState::Idle;
        self.field_errors = FieldErrors::default();
        self.last_submission = None;
    }
}

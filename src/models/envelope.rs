use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Which form produced a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionType {
    BridalInquiry,
    CourseInquiry,
    GeneralContact,
    EducationInquiry,
}

impl SubmissionType {
    pub fn as_str(&self) -> &str {
        match self {
            SubmissionType::BridalInquiry => "bridal_inquiry",
            SubmissionType::CourseInquiry => "course_inquiry",
            SubmissionType::GeneralContact => "general_contact",
            SubmissionType::EducationInquiry => "education_inquiry",
        }
    }
}

impl Display for SubmissionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// The JSON object a form posts to the intake endpoint.
///
/// Only `type` and `submittedAt` are known to the server; every other key is
/// carried in `fields` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionEnvelope {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(rename = "submittedAt", default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvelopeError {
    #[error("Body is not valid JSON: {0}")]
    Malformed(String),

    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Field '{0}' must be a string")]
    NotAString(&'static str),
}

impl SubmissionEnvelope {
    pub fn new(kind: SubmissionType, fields: Map<String, Value>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            submitted_at: Some(timestamp_now()),
            fields,
        }
    }

    /// Shape check for an incoming body. The body itself is what gets
    /// forwarded upstream; the envelope is only read for logging.
    pub fn parse(body: &[u8]) -> Result<Self, EnvelopeError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

        let object = value.as_object().ok_or(EnvelopeError::NotAnObject)?;

        for key in ["type", "submittedAt"] {
            match object.get(key) {
                None | Some(Value::String(_)) => {}
                Some(_) => return Err(EnvelopeError::NotAString(key)),
            }
        }

        serde_json::from_value::<Self>(value).map_err(|e| EnvelopeError::Malformed(e.to_string()))
    }

    pub fn submission_type(&self) -> Option<SubmissionType> {
        self.kind
            .as_deref()
            .and_then(|kind| serde_json::from_value(Value::String(kind.to_string())).ok())
    }

    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        if let Some(kind) = &self.kind {
            object.insert("type".to_string(), Value::String(kind.clone()));
        }
        if let Some(submitted_at) = &self.submitted_at {
            object.insert("submittedAt".to_string(), Value::String(submitted_at.clone()));
        }
        Value::Object(object)
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-01-01T00:00:00.000Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_keeps_unknown_keys() {
        let body = br#"{"type":"general_contact","submittedAt":"2024-01-01T00:00:00.000Z","name":"Jane","extra":{"a":1}}"#;
        let envelope = SubmissionEnvelope::parse(body).unwrap();
        let value: Value = serde_json::from_slice(body).unwrap();

        assert_eq!(envelope.kind.as_deref(), Some("general_contact"));
        assert_eq!(envelope.submission_type(), Some(SubmissionType::GeneralContact));
        assert_eq!(envelope.fields.get("extra"), Some(&json!({"a": 1})));
        assert_eq!(envelope.to_value(), value);
    }

    #[test]
    fn parse_accepts_missing_type_and_timestamp() {
        let envelope = SubmissionEnvelope::parse(br#"{"name":"Jane"}"#).unwrap();
        assert!(envelope.kind.is_none());
        assert!(envelope.submitted_at.is_none());
    }

    #[test]
    fn unknown_type_tag_is_still_accepted() {
        let envelope = SubmissionEnvelope::parse(br#"{"type":"gift_card"}"#).unwrap();
        assert_eq!(envelope.kind.as_deref(), Some("gift_card"));
        assert_eq!(envelope.submission_type(), None);
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert!(matches!(
            SubmissionEnvelope::parse(b"not json"),
            Err(EnvelopeError::Malformed(_))
        ));
        assert_eq!(
            SubmissionEnvelope::parse(b"[1,2]"),
            Err(EnvelopeError::NotAnObject)
        );
        assert_eq!(
            SubmissionEnvelope::parse(br#"{"type":5}"#),
            Err(EnvelopeError::NotAString("type"))
        );
        assert_eq!(
            SubmissionEnvelope::parse(br#"{"submittedAt":null}"#),
            Err(EnvelopeError::NotAString("submittedAt"))
        );
    }

    #[test]
    fn timestamp_is_millisecond_utc() {
        let ts = timestamp_now();
        assert!(ts.ends_with('Z'));
        assert_eq!(ts.len(), "2024-01-01T00:00:00.000Z".len());
    }
}

use serde::{Deserialize, Serialize, ser::Error as _};
use serde_json::{Map, Value};
use validator::Validate;

use crate::models::{
    envelope::SubmissionType,
    validation::{
        FieldErrors, validate_course, validate_experience_level, validate_iso_date,
        validate_phone, validate_subject,
    },
};

/// A form variant: a declared schema plus the tag its submissions carry.
pub trait FormSchema: Validate + Serialize {
    const KIND: SubmissionType;

    fn validate_fields(&self) -> Result<(), FieldErrors> {
        self.validate().map_err(FieldErrors::from)
    }

    /// Field payload of the envelope, keyed by wire name.
    fn to_fields(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            _ => Err(serde_json::Error::custom("form must serialize to a JSON object")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BridalInquiry {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(custom(function = "validate_iso_date"))]
    pub wedding_date: String,

    #[validate(length(min = 2, max = 200))]
    pub venue: String,

    #[validate(range(min = 1, max = 30))]
    pub party_size: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub details: Option<String>,
}

impl FormSchema for BridalInquiry {
    const KIND: SubmissionType = SubmissionType::BridalInquiry;
}

/// Private lesson and course inquiries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourseInquiry {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(custom(function = "validate_course"))]
    pub course: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validate_iso_date"))]
    pub preferred_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500))]
    pub experience: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub message: Option<String>,
}

impl FormSchema for CourseInquiry {
    const KIND: SubmissionType = SubmissionType::CourseInquiry;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeneralContact {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "validate_subject"))]
    pub subject: String,

    #[validate(length(min = 10, max = 2000))]
    pub message: String,
}

impl FormSchema for GeneralContact {
    const KIND: SubmissionType = SubmissionType::GeneralContact;
}

/// Application to the education program.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EducationInquiry {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(custom(function = "validate_phone"))]
    pub phone: String,

    #[validate(length(min = 2, max = 100))]
    pub program: String,

    #[validate(custom(function = "validate_experience_level"))]
    pub experience_level: String,

    #[validate(length(min = 20, max = 2000))]
    pub goals: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub portfolio_url: Option<String>,
}

impl FormSchema for EducationInquiry {
    const KIND: SubmissionType = SubmissionType::EducationInquiry;
}

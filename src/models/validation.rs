use std::{borrow::Cow, collections::BTreeMap};

use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// Field-scoped validation messages keyed by the wire (camelCase) field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(to_camel_case(field))
            .or_default()
            .push(message.into());
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut result = FieldErrors::default();
        for (field, errors) in errors.field_errors() {
            for error in errors.iter() {
                result.add(&field.to_string(), describe(error));
            }
        }
        result
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    let param = |name: &str| error.params.get(name).map(|v| v.to_string());

    match error.code.as_ref() {
        "email" => "Please enter a valid email address".to_string(),
        "url" => "Please enter a valid URL".to_string(),
        "required" => "This field is required".to_string(),
        "length" => {
            let len = error
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map(|s| s.chars().count());
            let min = error.params.get("min").and_then(|v| v.as_u64());

            match (len, min, param("max")) {
                (Some(len), Some(min), _) if (len as u64) < min => {
                    format!("Must be at least {} characters", min)
                }
                (_, _, Some(max)) => format!("Must be at most {} characters", max),
                (_, Some(min), None) => format!("Must be at least {} characters", min),
                _ => "Invalid length".to_string(),
            }
        }
        "range" => match (param("min"), param("max")) {
            (Some(min), Some(max)) => format!("Must be between {} and {}", min, max),
            _ => "Out of range".to_string(),
        },
        code => format!("Invalid value ({})", code),
    }
}

fn to_camel_case(field: &str) -> String {
    let mut result = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(c.to_uppercase());
            upper_next = false;
        } else {
            result.push(c);
        }
    }
    result
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Phone numbers: at least 10 digits, formatting characters allowed.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.chars().filter(char::is_ascii_digit).count();

    if digits < 10 {
        return Err(invalid("phone", "Please enter a valid phone number"));
    }

    if digits > 15 {
        return Err(invalid("phone", "Phone number is too long"));
    }

    let valid_chars = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | '.' | ' '));

    if !valid_chars {
        return Err(invalid("phone", "Phone number contains invalid characters"));
    }

    Ok(())
}

/// Date pickers serialize either a calendar date or a full ISO timestamp.
pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid("date", "Please select a date"));
    }

    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(value).is_ok()
    {
        Ok(())
    } else {
        Err(invalid("date", "Please select a valid date"))
    }
}

pub fn validate_course(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &["self_makeup", "bridal_makeup_course", "hair_styling", "pro_artistry"],
        "Please select a course",
    )
}

pub fn validate_subject(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &["general", "bridal", "lessons", "education", "shop", "other"],
        "Please select a subject",
    )
}

pub fn validate_experience_level(value: &str) -> Result<(), ValidationError> {
    one_of(
        value,
        &["beginner", "intermediate", "professional"],
        "Please select your experience level",
    )
}

fn one_of(
    value: &str,
    options: &[&str],
    message: &'static str,
) -> Result<(), ValidationError> {
    if options.contains(&value) {
        Ok(())
    } else {
        Err(invalid("choice", message))
    }
}

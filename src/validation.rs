//! Input checks for the HTTP layer. The planner assumes these already passed.

use axum::extract::{rejection::JsonRejection, FromRequest};
use uuid::Uuid;

use crate::error::{AppError, FieldErrors};

pub const MIN_DESTINATION_LEN: usize = 4;

/// Collects per-field messages and turns them into one
/// [`AppError::Validation`].
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn min_chars(&mut self, field: &str, value: &str, min: usize) {
        if value.chars().count() < min {
            self.add(
                field,
                format!("must contain at least {min} character(s)"),
            );
        }
    }

    pub fn email(&mut self, field: &str, value: &str) {
        if !is_valid_email(value) {
            self.add(field, "invalid email");
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.errors))
        }
    }
}

/// JSON body extractor whose rejections are reported like every other
/// validation failure.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Field used when a body problem cannot be pinned to one field.
pub const BODY_FIELD: &str = "body";

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let (field, message) = match &rejection {
            JsonRejection::JsonDataError(err) => deserialize_error_field(&err.body_text()),
            _ => (BODY_FIELD.to_string(), rejection.body_text()),
        };
        let mut validator = Validator::new();
        validator.add(field, message);
        AppError::Validation(validator.errors)
    }
}

/// Splits a body deserialization message into the offending field and the
/// reason. Messages look like `<prefix>: starts_at: input contains ...` or
/// `<prefix>: missing field `owner_name` at line 1 column 9`.
fn deserialize_error_field(text: &str) -> (String, String) {
    let detail = text
        .split_once("target type: ")
        .map_or(text, |(_, detail)| detail)
        .to_string();

    if let Some(rest) = detail.strip_prefix("missing field `") {
        if let Some((field, _)) = rest.split_once('`') {
            return (field.to_string(), detail.clone());
        }
    }
    match detail.split_once(": ") {
        Some((path, reason)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            (path.to_string(), reason.to_string())
        }
        _ => (BODY_FIELD.to_string(), detail),
    }
}

/// Parses a path id, reporting failures under `field`.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| {
        let mut validator = Validator::new();
        validator.add(field, "invalid uuid");
        AppError::Validation(validator.errors)
    })
}

/// Structural check: one `@`, non-empty local part, dotted domain, and a
/// conservative character set on both sides.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return false;
    }

    let local_ok = local
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));
    let domain_ok = domain
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-'));
    local_ok && domain_ok
}

//! Field validation for book and author payloads
//!
//! Each check appends to a list of violations instead of failing fast, so a
//! rejected request reports every problem at once.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Minimum number of characters in an author surname
pub const MIN_SURNAME_CHARS: usize = 3;

/// One failed constraint on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub rule: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, rule: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Book fields as they stand right before persistence
#[derive(Debug, Default)]
pub struct BookDraft<'a> {
    pub title: Option<&'a str>,
    pub image: Option<&'a str>,
    pub author_count: usize,
    pub published_at: Option<&'a str>,
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

pub fn validate_book(draft: &BookDraft<'_>) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if is_blank(draft.title) {
        violations.push(FieldViolation::new(
            "title",
            "not_blank",
            "This value should not be blank.",
        ));
    }

    if is_blank(draft.image) {
        violations.push(FieldViolation::new(
            "image",
            "not_blank",
            "This value should not be blank.",
        ));
    }

    if draft.author_count == 0 {
        violations.push(FieldViolation::new(
            "authors",
            "count",
            "At least one author must be specified",
        ));
    }

    match draft.published_at {
        Some(value) if !value.trim().is_empty() => {
            if parse_published_at(value).is_none() {
                violations.push(FieldViolation::new(
                    "published_at",
                    "datetime",
                    "This value is not a valid datetime.",
                ));
            }
        }
        _ => violations.push(FieldViolation::new(
            "published_at",
            "not_blank",
            "This value should not be blank.",
        )),
    }

    violations
}

/// Check the name fields of an author that is about to be created.
///
/// `prefix` is the path of the reference inside the payload, e.g. `authors[1]`.
pub fn validate_author(prefix: &str, name: &str, surname: &str) -> Vec<FieldViolation> {
    let mut violations = Vec::new();

    if name.trim().is_empty() {
        violations.push(FieldViolation::new(
            format!("{}.name", prefix),
            "not_blank",
            "This value should not be blank.",
        ));
    }

    if surname.trim().is_empty() {
        violations.push(FieldViolation::new(
            format!("{}.surname", prefix),
            "not_blank",
            "This value should not be blank.",
        ));
    } else if surname.chars().count() < MIN_SURNAME_CHARS {
        violations.push(FieldViolation::new(
            format!("{}.surname", prefix),
            "length",
            "Surname must be at least 3 characters",
        ));
    }

    violations
}

/// Parse a publication timestamp into UTC.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) or a bare date.
pub fn parse_published_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

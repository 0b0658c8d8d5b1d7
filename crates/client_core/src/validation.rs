//! Field validation shared by every form front end.
//!
//! Rules are applied in order: a required field must be non-blank after
//! trimming, then a URL field with content must parse as an absolute URL.

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldConstraint {
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldConstraint {
    pub const REQUIRED_URL: Self = Self {
        required: true,
        kind: FieldKind::Url,
    };
    pub const REQUIRED_TEXT: Self = Self {
        required: true,
        kind: FieldKind::Text,
    };
    pub const OPTIONAL_URL: Self = Self {
        required: false,
        kind: FieldKind::Url,
    };
    pub const OPTIONAL_TEXT: Self = Self {
        required: false,
        kind: FieldKind::Text,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("This field is required.")]
    Required,
    #[error("Please enter a valid URL.")]
    InvalidUrl,
}

pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

pub fn validate_field(raw: &str, constraint: FieldConstraint) -> Result<(), ValidationError> {
    let value = raw.trim();
    if constraint.required && value.is_empty() {
        return Err(ValidationError::Required);
    }
    if constraint.kind == FieldKind::Url && !value.is_empty() && !is_valid_url(value) {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(())
}

/// A text input together with its constraint and last validation verdict.
///
/// `revalidate` is what an edit handler calls; the stored error is what the
/// field annotation renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub value: String,
    constraint: FieldConstraint,
    error: Option<ValidationError>,
}

impl FormField {
    pub fn new(constraint: FieldConstraint) -> Self {
        Self {
            value: String::new(),
            constraint,
            error: None,
        }
    }

    pub fn with_value(constraint: FieldConstraint, value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            constraint,
            error: None,
        }
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.revalidate();
    }

    pub fn revalidate(&mut self) -> bool {
        self.error = validate_field(&self.value, self.constraint).err();
        self.error.is_none()
    }

    pub fn error(&self) -> Option<ValidationError> {
        self.error
    }

    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_parseability_matches_standard_parser() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("mailto:someone@example.com"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn required_check_runs_before_url_check() {
        assert_eq!(
            validate_field("   ", FieldConstraint::REQUIRED_URL),
            Err(ValidationError::Required)
        );
        assert_eq!(
            validate_field("not a url", FieldConstraint::REQUIRED_URL),
            Err(ValidationError::InvalidUrl)
        );
        assert_eq!(
            validate_field("  https://s.co/1  ", FieldConstraint::REQUIRED_URL),
            Ok(())
        );
    }

    #[test]
    fn optional_url_accepts_blank_but_rejects_garbage() {
        assert_eq!(validate_field("", FieldConstraint::OPTIONAL_URL), Ok(()));
        assert_eq!(
            validate_field("nope", FieldConstraint::OPTIONAL_URL),
            Err(ValidationError::InvalidUrl)
        );
        assert_eq!(validate_field("", FieldConstraint::OPTIONAL_TEXT), Ok(()));
    }

    #[test]
    fn field_tracks_latest_verdict_on_each_edit() {
        let mut field = FormField::new(FieldConstraint::REQUIRED_TEXT);
        assert!(!field.revalidate());
        assert_eq!(field.error(), Some(ValidationError::Required));
        field.set("students");
        assert_eq!(field.error(), None);
        assert_eq!(
            ValidationError::Required.to_string(),
            "This field is required."
        );
    }
}

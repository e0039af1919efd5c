//! Field-level validation errors.

use core::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Email;

/// A problem with one input field.
///
/// `field` is a dotted path into the request (`customer.email`,
/// `items[2].qty`), `message` completes the sentence after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(field, "is required")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Validation errors collected over a whole request, in the order found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Whether any error concerns `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Human-readable messages, one per error.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// `Ok(value)` when no error was collected.
    ///
    /// # Errors
    ///
    /// Returns `self` if it holds at least one error.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Trim an optional input, treating blank strings as missing.
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Trimmed value of a required field, recording an error when it is blank.
pub(crate) fn required(
    value: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = non_blank(value);
    if value.is_none() {
        errors.push(ValidationError::required(field));
    }
    value
}

/// A required field that must also parse as an [`Email`].
pub(crate) fn required_email(
    value: Option<&str>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<Email> {
    let raw = required(value, field, errors)?;
    match Email::parse(&raw) {
        Ok(email) => Some(email),
        Err(_) => {
            errors.push(ValidationError::new(field, "must be a valid email address"));
            None
        }
    }
}

/// Decode an optional request field, reading a value of the wrong type as
/// absent so validation can report it against the field name.
///
/// Use with `#[serde(default, deserialize_with = "...")]`.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_field_and_message() {
        let error = ValidationError::required("customer.email");
        assert_eq!(error.to_string(), "customer.email is required");
    }

    #[test]
    fn test_errors_collect_in_order() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::required("customer.name"));
        errors.push(ValidationError::new("total", "must be a positive number"));

        assert!(errors.has_field("total"));
        assert!(!errors.has_field("items"));
        assert_eq!(
            errors.to_string(),
            "customer.name is required, total must be a positive number"
        );
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ValidationErrors::new().into_result(7), Ok(7));
    }

    #[test]
    fn test_required_email_reports_each_problem_once() {
        let mut errors = ValidationErrors::new();
        assert!(required_email(Some(" "), "customer.email", &mut errors).is_none());
        assert!(required_email(Some("awa"), "contact.email", &mut errors).is_none());
        assert_eq!(
            errors.messages(),
            vec![
                "customer.email is required",
                "contact.email must be a valid email address"
            ]
        );
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  x ")), Some("x".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }
}

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::contact::models::{ContactForm, NewSubmission};

pub const NAME_REQUIRED: &str = "Please enter your name.";
pub const EMAIL_REQUIRED: &str = "Please enter your email.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const MESSAGE_REQUIRED: &str = "Please enter your message.";

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.-]+@[\w.-]+\.\w+$").expect("email pattern is a valid regex")
});

/// Syntactic address check: `local@domain.tld`, no DNS or MX lookup.
pub fn is_valid_email(text: &str) -> bool {
    EMAIL_PATTERN.is_match(text)
}

/// Per-field error messages for one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormFieldErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormFieldErrors {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }

    pub fn len(&self) -> usize {
        [&self.name, &self.email, &self.message]
            .iter()
            .filter(|e| e.is_some())
            .count()
    }
}

/// Validates every field and returns either a trimmed submission or the
/// full set of field errors. All three fields are always checked.
pub fn validate_submission(form: &ContactForm) -> Result<NewSubmission, FormFieldErrors> {
    let mut errors = FormFieldErrors::default();

    let name = form.name.trim();
    let email = form.email.trim();
    let message = form.message.trim();

    if name.is_empty() {
        errors.name = Some(NAME_REQUIRED.to_string());
    }

    if email.is_empty() {
        errors.email = Some(EMAIL_REQUIRED.to_string());
    } else if !is_valid_email(email) {
        errors.email = Some(EMAIL_INVALID.to_string());
    }

    if message.is_empty() {
        errors.message = Some(MESSAGE_REQUIRED.to_string());
    }

    if errors.is_empty() {
        Ok(NewSubmission::new(
            name.to_string(),
            email.to_string(),
            message.to_string(),
        ))
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, message: &str) -> ContactForm {
        ContactForm {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_addresses() {
        for addr in [
            "alice@example.com",
            "a.b-c@mail.example.org",
            "first_last@sub.domain.io",
            "x@y.z",
            "1@2.3",
        ] {
            assert!(is_valid_email(addr), "{addr} should be valid");
        }
    }

    #[test]
    fn test_invalid_addresses() {
        for addr in [
            "no-at-sign",
            "a@b",
            "@b.com",
            "",
            "alice@example.",
            "alice smith@example.com",
            "alice@example.com ",
            "alice+tag@example.com",
        ] {
            assert!(!is_valid_email(addr), "{addr:?} should be invalid");
        }
    }

    #[test]
    fn test_missing_name_yields_only_name_error() {
        let errors = validate_submission(&form("", "a@b.com", "hi")).unwrap_err();
        assert_eq!(errors.name.as_deref(), Some(NAME_REQUIRED));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_bad_email_yields_only_email_error() {
        let errors = validate_submission(&form("Alice", "not-an-email", "hi")).unwrap_err();
        assert_eq!(errors.email.as_deref(), Some(EMAIL_INVALID));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_blank_email_reports_required_not_invalid() {
        let errors = validate_submission(&form("Alice", "   ", "hi")).unwrap_err();
        assert_eq!(errors.email.as_deref(), Some(EMAIL_REQUIRED));
    }

    #[test]
    fn test_all_fields_blank_reports_all_errors() {
        let errors = validate_submission(&form(" ", "", "\n\t")).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.message.as_deref(), Some(MESSAGE_REQUIRED));
    }

    #[test]
    fn test_valid_submission_is_trimmed() {
        let submission =
            validate_submission(&form("  Alice ", " alice@example.com ", " Hello there \n"))
                .unwrap();
        assert_eq!(submission.name(), "Alice");
        assert_eq!(submission.email(), "alice@example.com");
        assert_eq!(submission.message(), "Hello there");
    }
}

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::{ContactError, ContactMessage};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// A contact form submission, as received over HTTP.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl ContactPayload {
    /// Creates a new `ContactPayload` with all fields set.
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            message: Some(message.to_string()),
        }
    }

    /// Validates the submission into a `ContactMessage`.
    pub fn validate(&self) -> Result<ContactMessage, ContactError> {
        let (Some(name), Some(email), Some(message)) = (
            non_blank(&self.name),
            non_blank(&self.email),
            non_blank(&self.message),
        ) else {
            return Err(ContactError::Validation(
                "All fields are required".to_string(),
            ));
        };
        if !EMAIL_PATTERN.is_match(email) {
            return Err(ContactError::Validation("Invalid email".to_string()));
        }

        Ok(ContactMessage::new(name, email, message))
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_complete_submission() {
        let payload = ContactPayload::new(" Ada ", "ada@example.com", "Hello\nthere");

        let message = payload.validate().unwrap();

        assert_eq!("Ada", message.name());
        assert_eq!("ada@example.com", message.email());
        assert_eq!("Hello\nthere", message.message());
    }

    #[test]
    fn validate_rejects_missing_fields() {
        let payload = ContactPayload {
            name: Some("Ada".to_string()),
            email: None,
            message: Some("Hello".to_string()),
        };

        assert_eq!(
            Err(ContactError::Validation(
                "All fields are required".to_string()
            )),
            payload.validate()
        );
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let payload = ContactPayload::new("Ada", "ada@example.com", "   ");

        payload.validate().expect_err("Blank message should be rejected");
    }

    #[test]
    fn validate_rejects_malformed_email() {
        for email in ["not-an-email", "ada@example", "ada @example.com", "@example.com"] {
            let payload = ContactPayload::new("Ada", email, "Hello");

            assert_eq!(
                Err(ContactError::Validation("Invalid email".to_string())),
                payload.validate(),
                "{email} should be rejected"
            );
        }
    }
}

//! Contact form submissions.
//!
//! The inbound body is only trusted as far as "some JSON". Fields are pulled
//! out one by one and promoted into a [`ContactSubmission`]; anything that
//! does not pass comes back as a [`ValidationError`].

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Substituted for optional fields the visitor left empty
pub const NOT_PROVIDED: &str = "Non renseigné";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: name, email, message")]
    MissingFields,
    #[error("Invalid email format")]
    InvalidEmail,
}

/// An address of the shape `local@domain.tld`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if email_regex().is_match(raw) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::InvalidEmail)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after the last '@', safe to log
    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or_default()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated contact form submission. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: EmailAddress,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub message: String,
}

impl ContactSubmission {
    /// Validate a raw JSON body, first failure wins.
    ///
    /// A field is present when it is a non-empty string. Non-string values
    /// are treated as absent, and so is every field of a body that is not an
    /// object.
    ///
    /// # Arguments
    /// * `body` - The parsed request body, not yet trusted
    ///
    /// # Returns
    /// * `Ok(ContactSubmission)` if `name`, `email` and `message` are present
    ///   and the email is well formed
    /// * `Err(ValidationError::MissingFields)` if any required field is absent
    /// * `Err(ValidationError::InvalidEmail)` if the email fails the format check
    pub fn from_json(body: &Value) -> Result<Self, ValidationError> {
        let (name, email, message) = match (
            text_field(body, "name"),
            text_field(body, "email"),
            text_field(body, "message"),
        ) {
            (Some(name), Some(email), Some(message)) => (name, email, message),
            _ => return Err(ValidationError::MissingFields),
        };

        let email = EmailAddress::parse(email)?;

        Ok(Self {
            name: name.to_string(),
            email,
            company: text_field(body, "company").map(str::to_string),
            phone: text_field(body, "phone").map(str::to_string),
            message: message.to_string(),
        })
    }

    pub fn company_or_placeholder(&self) -> &str {
        self.company.as_deref().unwrap_or(NOT_PROVIDED)
    }

    pub fn phone_or_placeholder(&self) -> &str {
        self.phone.as_deref().unwrap_or(NOT_PROVIDED)
    }
}

fn text_field<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

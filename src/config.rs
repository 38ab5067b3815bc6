use anyhow::{Context, Result};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONTACT_EMAIL: &str = "contact@elysene.engineering";
pub const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com";
pub const DEFAULT_CALENDAR_LINK: &str = "https://cal.com";
pub const DEFAULT_SITE_URL: &str = "https://elysene.engineering";

#[derive(Debug, Clone)]
pub struct Config {
    // Brevo (checked per submission, not at startup)
    pub brevo_api_key: Option<String>,
    pub brevo_template_id: Option<String>,
    pub brevo_api_url: String,
    pub brevo_timeout_secs: u64,

    // Public site settings
    pub contact_email: String,
    pub calendar_link: String,
    pub site_url: String,

    // Server
    pub port: u16,
}

/// Missing or unusable provider settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BREVO_API_KEY not set")]
    MissingApiKey,
    #[error("BREVO_TEMPLATE_ID not set")]
    MissingTemplateId,
    #[error("BREVO_TEMPLATE_ID is not a positive integer: {0}")]
    InvalidTemplateId(String),
}

/// Provider settings resolved for a single send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrevoSettings<'a> {
    pub api_key: &'a str,
    pub template_id: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            brevo_api_key: non_empty_var("BREVO_API_KEY"),
            brevo_template_id: non_empty_var("BREVO_TEMPLATE_ID"),
            brevo_api_url: std::env::var("BREVO_API_URL")
                .unwrap_or_else(|_| DEFAULT_BREVO_API_URL.to_string()),
            brevo_timeout_secs: match std::env::var("BREVO_TIMEOUT_SECS") {
                Ok(v) => v
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .with_context(|| {
                        format!("BREVO_TIMEOUT_SECS must be a positive number, got '{}'", v)
                    })?,
                Err(_) => 10,
            },

            contact_email: non_empty_var("CONTACT_EMAIL")
                .unwrap_or_else(|| DEFAULT_CONTACT_EMAIL.to_string()),
            calendar_link: non_empty_var("CALENDAR_LINK")
                .unwrap_or_else(|| DEFAULT_CALENDAR_LINK.to_string()),
            site_url: non_empty_var("SITE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),

            port: match std::env::var("PORT") {
                Ok(v) => v
                    .parse()
                    .with_context(|| format!("PORT must be a valid port number, got '{}'", v))?,
                Err(_) => 8080,
            },
        })
    }

    /// Resolve the provider credentials needed to send an email.
    ///
    /// Called once per submission, so a deployment missing its secrets keeps
    /// serving every other route.
    ///
    /// # Returns
    /// * `Ok(BrevoSettings)` with the API key and the numeric template id
    /// * `Err(ConfigError::MissingApiKey)` if `BREVO_API_KEY` is unset
    /// * `Err(ConfigError::MissingTemplateId)` if `BREVO_TEMPLATE_ID` is unset
    /// * `Err(ConfigError::InvalidTemplateId)` if the template id is not a positive integer
    pub fn brevo_settings(&self) -> Result<BrevoSettings<'_>, ConfigError> {
        let api_key = self
            .brevo_api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)?;
        let raw_template_id = self
            .brevo_template_id
            .as_deref()
            .ok_or(ConfigError::MissingTemplateId)?;

        let template_id = raw_template_id
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| ConfigError::InvalidTemplateId(raw_template_id.to_string()))?;

        Ok(BrevoSettings {
            api_key,
            template_id,
        })
    }

    pub fn brevo_timeout(&self) -> Duration {
        Duration::from_secs(self.brevo_timeout_secs)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
pub(crate) fn test_config(brevo_api_url: &str) -> Config {
    Config {
        brevo_api_key: Some("test-brevo-key".to_string()),
        brevo_template_id: Some("7".to_string()),
        brevo_api_url: brevo_api_url.to_string(),
        brevo_timeout_secs: 5,
        contact_email: DEFAULT_CONTACT_EMAIL.to_string(),
        calendar_link: DEFAULT_CALENDAR_LINK.to_string(),
        site_url: DEFAULT_SITE_URL.to_string(),
        port: 8080,
    }
}

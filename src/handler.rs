//! `POST /api/send`: validate a contact submission and relay it through Brevo.
//!
//! Every failure is resolved here. Callers only ever see a status code and a
//! short message; provider bodies and error chains go to the log.

use crate::brevo::{BrevoClient, BrevoError, TransactionalEmail};
use crate::config::{Config, ConfigError};
use crate::contact::{ContactSubmission, ValidationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

pub const SUCCESS_MESSAGE: &str = "Email sent successfully";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Missing Brevo configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Brevo API error ({status})")]
    Upstream { status: u16, details: Value },

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<BrevoError> for SubmissionError {
    fn from(err: BrevoError) -> Self {
        match err {
            BrevoError::Rejected { status, details } => Self::Upstream { status, details },
            // Timeouts and connection failures are not the provider's answer
            BrevoError::Transport(e) => {
                Self::Unexpected(anyhow::Error::new(e).context("Brevo request failed"))
            }
        }
    }
}

#[derive(Serialize)]
struct SuccessBody {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            Self::Invalid(e) => {
                debug!("Rejected contact submission: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string(), None)
            }
            Self::Configuration(e) => {
                error!("Missing Brevo configuration: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error".to_string(),
                    None,
                )
            }
            Self::Upstream { status, details } => {
                error!("Brevo API error: status={}, error={}", status, details);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to send email".to_string(),
                    Some(details),
                )
            }
            Self::Unexpected(e) => {
                error!("Error in send API: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { error, details })).into_response()
    }
}

/// Validates submissions and relays them as templated emails
#[derive(Debug, Clone)]
pub struct ContactService {
    config: Arc<Config>,
    brevo: BrevoClient,
}

impl ContactService {
    pub fn new(config: Arc<Config>, brevo: BrevoClient) -> Self {
        Self { config, brevo }
    }

    /// Handle one raw request body and produce the caller-facing response.
    pub async fn handle_submission(&self, body: &[u8]) -> Response {
        match self.submit(body).await {
            Ok(()) => (
                StatusCode::OK,
                Json(SuccessBody {
                    success: true,
                    message: SUCCESS_MESSAGE,
                }),
            )
                .into_response(),
            Err(e) => e.into_response(),
        }
    }

    /// Validation sequence, then exactly one outbound send.
    ///
    /// A JSON body that is not an object carries no fields and fails the
    /// presence check; only `null` is treated as an unusable body.
    pub async fn submit(&self, body: &[u8]) -> Result<(), SubmissionError> {
        let raw: Value = serde_json::from_slice(body)
            .map_err(|e| anyhow::Error::new(e).context("Request body is not valid JSON"))?;
        if raw.is_null() {
            return Err(anyhow::anyhow!("Request body is null").into());
        }

        let submission = ContactSubmission::from_json(&raw)?;
        let settings = self.config.brevo_settings()?;

        let email = TransactionalEmail::for_submission(
            &submission,
            settings.template_id,
            &self.config.contact_email,
        );

        info!(
            "Relaying contact submission from @{}",
            submission.email.domain()
        );
        self.brevo.send(&settings, &email).await?;

        Ok(())
    }
}

use crate::config::{BrevoSettings, Config};
use crate::contact::ContactSubmission;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

const ADMIN_NAME: &str = "Ely Admin";

/// Brevo transactional email request (`POST /v3/smtp/email`)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionalEmail {
    pub template_id: u64,
    pub to: Vec<Recipient>,
    pub bcc: Vec<Recipient>,
    pub reply_to: Recipient,
    pub params: TemplateParams,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Recipient {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TemplateParams {
    pub name: String,
    pub company: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    message_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum BrevoError {
    /// Brevo answered with a non-2xx status
    #[error("Brevo API error ({status}): {details}")]
    Rejected { status: u16, details: Value },

    #[error("Failed to send request to Brevo API: {0}")]
    Transport(#[from] reqwest::Error),
}

impl TransactionalEmail {
    /// Build the templated email for a submission.
    ///
    /// The visitor receives the message (autoresponse template), the admin
    /// mailbox is blind-copied, and replies go back to the visitor.
    pub fn for_submission(
        submission: &ContactSubmission,
        template_id: u64,
        admin_email: &str,
    ) -> Self {
        let visitor = Recipient {
            email: submission.email.as_str().to_string(),
            name: submission.name.clone(),
        };

        Self {
            template_id,
            to: vec![visitor.clone()],
            bcc: vec![Recipient {
                email: admin_email.to_string(),
                name: ADMIN_NAME.to_string(),
            }],
            reply_to: visitor,
            params: TemplateParams {
                name: submission.name.clone(),
                company: submission.company_or_placeholder().to_string(),
                phone: submission.phone_or_placeholder().to_string(),
                message: submission.message.clone(),
            },
        }
    }
}

/// Client for Brevo's transactional email API
#[derive(Debug, Clone)]
pub struct BrevoClient {
    http: reqwest::Client,
    base_url: String,
}

impl BrevoClient {
    pub fn new(config: &Config) -> Result<Self, BrevoError> {
        let http = reqwest::Client::builder()
            .timeout(config.brevo_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.brevo_api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Send one templated email. No retries.
    ///
    /// # Arguments
    /// * `settings` - API key and template id resolved for this send
    /// * `email` - The templated payload built from a submission
    ///
    /// # Returns
    /// * `Ok(Some(message_id))` when Brevo accepts and returns a message id
    /// * `Ok(None)` when Brevo accepts with an empty or unexpected body
    /// * `Err(BrevoError::Rejected)` on any non-2xx status, with the error body
    ///   parsed best-effort (`{}` when it is not JSON)
    /// * `Err(BrevoError::Transport)` on connection failure or timeout
    pub async fn send(
        &self,
        settings: &BrevoSettings<'_>,
        email: &TransactionalEmail,
    ) -> Result<Option<String>, BrevoError> {
        let url = format!("{}/v3/smtp/email", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("accept", "application/json")
            .header("api-key", settings.api_key)
            .header("content-type", "application/json")
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            return Err(BrevoError::Rejected {
                status: status.as_u16(),
                details: redact(parse_details(&body), settings.api_key),
            });
        }

        let message_id = serde_json::from_str::<SendResponse>(&body)
            .ok()
            .and_then(|r| r.message_id);

        match &message_id {
            Some(id) => info!("Brevo accepted email (messageId: {})", id),
            None => debug!("Brevo accepted email without a messageId"),
        }

        Ok(message_id)
    }
}

/// Parse a provider error body, falling back to `{}` when it is not JSON
fn parse_details(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Default::default()))
}

/// Replace any echo of the API key in provider output
fn redact(details: Value, api_key: &str) -> Value {
    match details {
        Value::String(s) if !api_key.is_empty() && s.contains(api_key) => {
            Value::String(s.replace(api_key, "[redacted]"))
        }
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| redact(v, api_key)).collect())
        }
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, redact(v, api_key)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Helper Functions ====================

    fn create_submission(body: Value) -> ContactSubmission {
        ContactSubmission::from_json(&body).expect("Test submission should be valid")
    }

    fn jane() -> ContactSubmission {
        create_submission(json!({
            "name": "Jane",
            "email": "jane@x.com",
            "message": "Hi"
        }))
    }

    fn settings() -> BrevoSettings<'static> {
        BrevoSettings {
            api_key: "test-brevo-key",
            template_id: 7,
        }
    }

    // ==================== Payload Tests ====================

    #[test]
    fn test_payload_serialization() {
        let submission = create_submission(json!({
            "name": "Jane",
            "email": "jane@x.com",
            "company": "Acme",
            "phone": "0102030405",
            "message": "Hi"
        }));

        let email = TransactionalEmail::for_submission(&submission, 7, "admin@example.com");
        let value = serde_json::to_value(&email).expect("Should serialize");

        assert_eq!(
            value,
            json!({
                "templateId": 7,
                "to": [{ "email": "jane@x.com", "name": "Jane" }],
                "bcc": [{ "email": "admin@example.com", "name": "Ely Admin" }],
                "replyTo": { "email": "jane@x.com", "name": "Jane" },
                "params": {
                    "NAME": "Jane",
                    "COMPANY": "Acme",
                    "PHONE": "0102030405",
                    "MESSAGE": "Hi"
                }
            })
        );
    }

    #[test]
    fn test_payload_uses_placeholder_for_absent_fields() {
        let email = TransactionalEmail::for_submission(&jane(), 7, "admin@example.com");

        assert_eq!(email.params.company, "Non renseigné");
        assert_eq!(email.params.phone, "Non renseigné");
        assert!(!email.params.company.is_empty());
    }

    // ==================== Error Body Tests ====================

    #[test]
    fn test_parse_details_json() {
        let details = parse_details(r#"{"code":"unauthorized","message":"Key not found"}"#);
        assert_eq!(details["code"], "unauthorized");
    }

    #[test]
    fn test_parse_details_not_json() {
        assert_eq!(parse_details("<html>Bad Gateway</html>"), json!({}));
        assert_eq!(parse_details(""), json!({}));
    }

    #[test]
    fn test_redact_nested_key() {
        let details = json!({
            "message": "invalid key test-brevo-key",
            "errors": [{ "key": "test-brevo-key" }],
            "count": 1
        });

        let redacted = redact(details, "test-brevo-key");

        assert!(!redacted.to_string().contains("test-brevo-key"));
        assert_eq!(redacted["message"], "invalid key [redacted]");
        assert_eq!(redacted["count"], 1);
    }

    // ==================== send Tests ====================

    #[tokio::test]
    async fn test_send_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/smtp/email"))
            .and(header("api-key", "test-brevo-key"))
            .and(header("accept", "application/json"))
            .and(body_partial_json(json!({
                "templateId": 7,
                "params": { "COMPANY": "Non renseigné" }
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({ "messageId": "<abc@smtp-relay>" })),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = BrevoClient::new(&test_config(&mock_server.uri())).unwrap();
        let email = TransactionalEmail::for_submission(&jane(), 7, "admin@example.com");

        let message_id = client.send(&settings(), &email).await.expect("Should send");

        assert_eq!(message_id.as_deref(), Some("<abc@smtp-relay>"));
    }

    #[tokio::test]
    async fn test_send_success_with_empty_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/smtp/email"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let client = BrevoClient::new(&test_config(&mock_server.uri())).unwrap();
        let email = TransactionalEmail::for_submission(&jane(), 7, "admin@example.com");

        let message_id = client.send(&settings(), &email).await.expect("Should send");

        assert!(message_id.is_none());
    }

    #[tokio::test]
    async fn test_send_rejected() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/smtp/email"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "unauthorized",
                "message": "Key not found"
            })))
            .mount(&mock_server)
            .await;

        let client = BrevoClient::new(&test_config(&mock_server.uri())).unwrap();
        let email = TransactionalEmail::for_submission(&jane(), 7, "admin@example.com");

        let err = client.send(&settings(), &email).await.expect_err("Should fail");

        match err {
            BrevoError::Rejected { status, details } => {
                assert_eq!(status, 401);
                assert_eq!(details["code"], "unauthorized");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_rejected_with_non_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v3/smtp/email"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let client = BrevoClient::new(&test_config(&mock_server.uri())).unwrap();
        let email = TransactionalEmail::for_submission(&jane(), 7, "admin@example.com");

        let err = client.send(&settings(), &email).await.expect_err("Should fail");

        assert!(matches!(
            err,
            BrevoError::Rejected { status: 502, ref details } if *details == json!({})
        ));
    }

    #[tokio::test]
    async fn test_send_transport_error() {
        // Nothing listens on port 1
        let client = BrevoClient::new(&test_config("http://127.0.0.1:1")).unwrap();
        let email = TransactionalEmail::for_submission(&jane(), 7, "admin@example.com");

        let err = client.send(&settings(), &email).await.expect_err("Should fail");

        assert!(matches!(err, BrevoError::Transport(_)));
    }
}

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::confirmation::ConfirmationEmail;
use crate::upstream::{UpstreamError, WaitlistProvider};

pub const DEFAULT_API_URL: &str = "https://api.brevo.com/v3";

#[derive(Debug, Clone)]
pub struct BrevoConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub list_id: u64,
    pub sender_name: String,
    pub sender_email: String,
    pub timeout: Duration,
}

// POST /contacts
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateContact<'a> {
    email: &'a str,
    list_ids: [u64; 1],
    // duplicates must fail instead of updating the existing contact
    update_enabled: bool,
}

#[derive(Serialize)]
struct Mailbox<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    email: &'a str,
}

// POST /smtp/email
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmail<'a> {
    sender: Mailbox<'a>,
    to: [Mailbox<'a>; 1],
    subject: &'a str,
    html_content: &'a str,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn is_duplicate(&self) -> bool {
        if self.code.as_deref() == Some("duplicate_parameter") {
            return true;
        }
        self.message.as_deref().is_some_and(|m| {
            let m = m.to_lowercase();
            m.contains("contact already exist") || m.contains("already exists")
        })
    }
}

pub struct BrevoClient {
    client: reqwest::Client,
    config: BrevoConfig,
}

impl BrevoClient {
    pub fn new(config: BrevoConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<(), UpstreamError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(UpstreamError::MissingCredentials)?;

        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);
        let res = self
            .client
            .post(&url)
            .header("api-key", api_key)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = res.status();
        debug!(%url, status = status.as_u16(), "Brevo responded");
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(UpstreamError::Unauthorized);
        }

        let body: ErrorBody = res.json().await.unwrap_or_default();
        if body.is_duplicate() {
            return Err(UpstreamError::DuplicateContact);
        }
        Err(UpstreamError::Api {
            status: status.as_u16(),
            message: body.message.unwrap_or_default(),
        })
    }
}

#[async_trait]
impl WaitlistProvider for BrevoClient {
    async fn create_contact(&self, email: &str) -> Result<(), UpstreamError> {
        let body = CreateContact {
            email,
            list_ids: [self.config.list_id],
            update_enabled: false,
        };
        self.post("/contacts", &body).await
    }

    async fn send_confirmation(&self, email: &str) -> Result<(), UpstreamError> {
        // rendered per send so the footer year follows the calendar
        let confirmation = ConfirmationEmail::render(&self.config.sender_name);
        let body = SendEmail {
            sender: Mailbox {
                name: Some(&self.config.sender_name),
                email: &self.config.sender_email,
            },
            to: [Mailbox { name: None, email }],
            subject: &confirmation.subject,
            html_content: &confirmation.html,
        };
        self.post("/smtp/email", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use chrono::Datelike;
    use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer, api_key: Option<&str>) -> BrevoClient {
        BrevoClient::new(BrevoConfig {
            api_url: server.uri(),
            api_key: api_key.map(str::to_string),
            list_id: 4,
            sender_name: "Deepfold".to_string(),
            sender_email: "hello@deepfold.com".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn create_contact_posts_to_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .and(header("api-key", "secret"))
            .and(body_partial_json(json!({
                "email": "user@example.com",
                "listIds": [4],
                "updateEnabled": false
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 17 })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, Some("secret"))
            .create_contact("user@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn duplicate_contact_is_recognised() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/contacts"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "duplicate_parameter",
                "message": "Contact already exist"
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("secret"))
            .create_contact("user@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::DuplicateContact));
    }

    #[tokio::test]
    async fn duplicate_detected_from_message_alone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "invalid_parameter",
                "message": "Unable to create contact, email is already exists"
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("secret"))
            .create_contact("user@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::DuplicateContact));
    }

    #[tokio::test]
    async fn unauthorized_maps_to_its_own_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": "unauthorized",
                "message": "Key not found"
            })))
            .mount(&server)
            .await;

        let err = client(&server, Some("wrong"))
            .create_contact("user@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Unauthorized));
    }

    #[tokio::test]
    async fn other_failures_keep_status_and_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client(&server, Some("secret"))
            .create_contact("user@example.com")
            .await
            .unwrap_err();
        match err {
            UpstreamError::Api { status, message } => {
                assert_eq!(status, 503);
                assert!(message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_key_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let err = client(&server, None)
            .create_contact("user@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::MissingCredentials));
    }

    #[tokio::test]
    async fn confirmation_is_sent_from_configured_sender() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/smtp/email"))
            .and(header("api-key", "secret"))
            .and(body_partial_json(json!({
                "sender": { "name": "Deepfold", "email": "hello@deepfold.com" },
                "to": [{ "email": "user@example.com" }],
                "subject": "Welcome to Deepfold Waitlist!"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "messageId": "<abc@smtp>" })))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, Some("secret"))
            .send_confirmation("user@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn confirmation_footer_carries_current_year() {
        let server = MockServer::start().await;
        let year = chrono::Utc::now().year();
        Mock::given(method("POST"))
            .and(path("/smtp/email"))
            .and(body_string_contains(format!("&copy; {year} Deepfold")))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        client(&server, Some("secret"))
            .send_confirmation("user@example.com")
            .await
            .unwrap();
    }
}

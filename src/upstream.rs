use async_trait::async_trait;
use thiserror::Error;

// Failures reported by the contact / email provider
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("contact already exists")]
    DuplicateContact,

    #[error("no API key configured for the contact service")]
    MissingCredentials,

    #[error("contact service rejected the API key")]
    Unauthorized,

    #[error("contact service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request to contact service failed: {0}")]
    Transport(#[from] reqwest::Error),
}

// store the contact, then confirm by email
#[async_trait]
pub trait WaitlistProvider: Send + Sync {
    async fn create_contact(&self, email: &str) -> Result<(), UpstreamError>;

    async fn send_confirmation(&self, email: &str) -> Result<(), UpstreamError>;
}

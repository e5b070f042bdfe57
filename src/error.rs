use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::models::ApiResponse;
use crate::upstream::UpstreamError;

// Display text is the `message` sent to the client
#[derive(Debug, Error)]
pub enum WaitlistError {
    #[error("Email address is required")]
    EmailRequired,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Too many requests. Please try again in a minute.")]
    RateLimited,

    #[error("This email is already on the waitlist!")]
    AlreadyOnWaitlist,

    #[error("Configuration error. Please try again later.")]
    Configuration,

    #[error("Something went wrong. Please try again.")]
    Upstream,
}

impl WaitlistError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::EmailRequired | Self::InvalidEmail | Self::AlreadyOnWaitlist => {
                StatusCode::BAD_REQUEST
            }
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Configuration | Self::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for WaitlistError {
    fn from(err: UpstreamError) -> Self {
        match &err {
            UpstreamError::DuplicateContact => Self::AlreadyOnWaitlist,
            UpstreamError::MissingCredentials | UpstreamError::Unauthorized => {
                error!(error = %err, "Contact service credentials are not usable");
                Self::Configuration
            }
            UpstreamError::Api { .. } | UpstreamError::Transport(_) => {
                error!(error = %err, "Contact service call failed");
                Self::Upstream
            }
        }
    }
}

impl IntoResponse for WaitlistError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

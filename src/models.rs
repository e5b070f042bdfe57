use serde::{Deserialize, Serialize};
use serde_json::Value;

// POST /api/waitlist body; `email` is kept raw so sanitizing decides what it means
#[derive(Deserialize, Debug, Default)]
pub struct WaitlistRequest {
    #[serde(default)]
    pub email: Option<Value>,
}

// Every /api/waitlist response, success or not
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

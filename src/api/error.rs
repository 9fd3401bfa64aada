use reqwest::StatusCode;
use serde_json::Value;

pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const UNEXPECTED_RESPONSE_MESSAGE: &str = "Unexpected response from server.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Build a server error from a non-success response body, keeping the
    /// backend's own message when it sent one.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| server_message(&json));
        ApiError::Server { status, message }
    }

    /// Text safe to show to the person using the portal.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            ApiError::Server { message: None, .. } | ApiError::Transport(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
            ApiError::Decode(_) => UNEXPECTED_RESPONSE_MESSAGE.to_string(),
        }
    }
}

fn server_message(json: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| json.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}

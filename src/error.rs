use reqwest::StatusCode;

/// Client-level errors
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Service returned status {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Service {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Not authenticated")]
    AuthFailure,

    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// True for errors that must redirect to the login page instead of
    /// showing a notice
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::AuthFailure)
    }

    /// Message shown to the user, falling back to `fallback` when neither the
    /// server nor a client-side check supplied one
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Service {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            ClientError::Validation(msg) => msg.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

use shared::error::{ApiError, ErrorKind};
use thiserror::Error;

/// Reason reported when the backend rejects a submission without saying why.
pub const UNKNOWN_BACKEND_ERROR: &str = "An unknown error occurred.";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Config(String),
    #[error("Server error: {status} - {body}")]
    Transport { status: u16, body: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid response payload: {0}")]
    MalformedResponse(String),
    #[error("{0}")]
    Application(String),
    #[error("{0}")]
    Dispatch(String),
}

impl ClientError {
    /// Application failure carrying the backend message, or the generic reason.
    pub fn application(message: Option<String>) -> Self {
        match message.filter(|m| !m.trim().is_empty()) {
            Some(message) => Self::Application(message),
            None => Self::Application(UNKNOWN_BACKEND_ERROR.to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Transport { .. }
            | Self::Network(_)
            | Self::MalformedResponse(_)
            | Self::Dispatch(_) => ErrorKind::Transport,
            Self::Application(_) => ErrorKind::Application,
        }
    }
}

impl From<&ClientError> for ApiError {
    fn from(value: &ClientError) -> Self {
        ApiError::new(value.kind(), value.to_string())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

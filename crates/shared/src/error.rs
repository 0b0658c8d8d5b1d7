use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Transport,
    Application,
    Clipboard,
    Config,
}

impl ErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Validation => "Validation",
            Self::Transport => "Transport",
            Self::Application => "Backend",
            Self::Clipboard => "Clipboard",
            Self::Config => "Configuration",
        }
    }

    /// Process exit status used by the command-line front end.
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Validation => 2,
            Self::Config => 3,
            Self::Transport => 4,
            Self::Application => 5,
            Self::Clipboard => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

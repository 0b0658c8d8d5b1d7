//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{ClientError, RequestTicket};
use shared::{
    error::ErrorKind,
    protocol::{LookupResponse, SubmitResponse},
};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    SubmitCompleted {
        ticket: RequestTicket,
        result: Result<SubmitResponse, ClientError>,
    },
    LookupCompleted {
        ticket: RequestTicket,
        result: Result<LookupResponse, ClientError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Config,
    Transport,
    Validation,
    Clipboard,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Submit,
    Lookup,
    Copy,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_kind(context: UiErrorContext, kind: ErrorKind, message: impl Into<String>) -> Self {
        let category = match kind {
            ErrorKind::Config => UiErrorCategory::Config,
            ErrorKind::Transport | ErrorKind::Application => UiErrorCategory::Transport,
            ErrorKind::Validation => UiErrorCategory::Validation,
            ErrorKind::Clipboard => UiErrorCategory::Clipboard,
        };
        Self {
            category,
            context,
            message: message.into(),
        }
    }

    /// Classifies free-form failure text from the worker thread.
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("endpoint") || lower.contains("configur") {
            UiErrorCategory::Config
        } else if lower.contains("clipboard") {
            UiErrorCategory::Clipboard
        } else if lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("connection")
            || lower.contains("network")
            || lower.contains("disconnected")
            || lower.contains("runtime")
        {
            UiErrorCategory::Transport
        } else if lower.contains("invalid") || lower.contains("required") {
            UiErrorCategory::Validation
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn label(&self) -> &'static str {
        match self.category {
            UiErrorCategory::Config => "Configuration",
            UiErrorCategory::Transport => "Transport",
            UiErrorCategory::Validation => "Validation",
            UiErrorCategory::Clipboard => "Clipboard",
            UiErrorCategory::Unknown => "Unexpected",
        }
    }

    /// Startup and configuration problems need a persistent banner; request
    /// failures are already shown next to the form that issued them.
    pub fn wants_banner(&self) -> bool {
        self.context == UiErrorContext::BackendStartup || self.category == UiErrorCategory::Config
    }
}

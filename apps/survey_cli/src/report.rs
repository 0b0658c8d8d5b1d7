//! What a command prints: the form notification plus whatever the presenter
//! is showing, as text or JSON.

use std::fmt::Write as _;

use client_core::{Notification, RecordView, SelectorEntry};
use serde::Serialize;
use shared::error::{ApiError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Selector entry numbered from 1 for `--pick`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub number: usize,
    pub label: String,
}

impl From<&SelectorEntry> for Choice {
    fn from(entry: &SelectorEntry) -> Self {
        Self {
            number: entry.index + 1,
            label: entry.label.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Report {
    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            error: Some(ApiError::new(kind, message)),
            ..Self::default()
        }
    }

    pub fn fail(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.error = Some(ApiError::new(kind, message));
    }

    /// Fails with the workflow's notification text as the message.
    pub fn fail_from_notification(&mut self, kind: ErrorKind) {
        let message = self
            .notification
            .as_ref()
            .map(|note| note.message.clone())
            .unwrap_or_default();
        self.fail(kind, message);
    }

    pub fn exit_code(&self) -> u8 {
        self.error.as_ref().map_or(0, |err| err.kind.exit_code())
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for err in &self.field_errors {
            let _ = writeln!(out, "{}: {}", err.field, err.message);
        }
        if let Some(note) = &self.notification {
            let _ = writeln!(out, "{}", note.message);
        }
        for choice in &self.choices {
            let _ = writeln!(out, "  {}. {}", choice.number, choice.label);
        }
        if let Some(record) = &self.record {
            let _ = writeln!(out, "Target Group:       {}", record.target_group);
            let _ = writeln!(out, "Bypass Link:        {}", record.bypass_link);
            let _ = writeln!(out, "Additional Details: {}", record.additional_details);
            let _ = writeln!(out, "Registered:         {}", record.timestamp_label());
        }
        // Error notifications already describe workflow failures.
        let reported = self.notification.as_ref().is_some_and(Notification::is_error);
        if let Some(err) = self.error.as_ref().filter(|_| !reported) {
            let _ = writeln!(out, "{}: {}", err.kind.label(), err.message);
        }
        out
    }
}

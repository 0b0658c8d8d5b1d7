//! Display state for lookup results: the disambiguation selector, the record
//! currently shown, and the copy-bypass-link affordance.

use std::time::{Duration, Instant};

use serde::Serialize;
use shared::domain::{
    timestamp_label, EpochMillis, SurveyRecord, PLACEHOLDER, UNKNOWN_TIMESTAMP_LABEL,
};
use tracing::warn;

use crate::{error::ClipboardError, schedule::RevertTimer};

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";
pub const SELECTOR_PROMPT: &str = "-- Select a timestamp --";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy. Please copy manually.";

/// Destination for copied text; the desktop front end backs this with the
/// system clipboard.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub target_group: String,
    pub bypass_link: String,
    pub additional_details: String,
    pub timestamp: Option<EpochMillis>,
    #[serde(skip)]
    copyable: bool,
}

impl RecordView {
    pub fn from_record(record: &SurveyRecord) -> Self {
        let or_placeholder = |value: Option<&str>| value.unwrap_or(PLACEHOLDER).to_string();
        Self {
            target_group: or_placeholder(record.target_group()),
            bypass_link: or_placeholder(record.bypass_link()),
            additional_details: or_placeholder(record.additional_details()),
            timestamp: record.timestamp,
            copyable: record.bypass_link().is_some(),
        }
    }

    pub fn timestamp_label(&self) -> String {
        timestamp_label(self.timestamp)
    }

    /// Whether the copy affordance is exposed for this record.
    pub fn can_copy(&self) -> bool {
        self.copyable && self.bypass_link != PLACEHOLDER
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectorEntry {
    pub index: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed(ClipboardError),
    /// Nothing copyable is displayed.
    NotAvailable,
}

pub type TimestampLabeler = fn(EpochMillis) -> String;

#[derive(Debug, Clone)]
pub struct ResultPresenter {
    selector: Vec<SelectorEntry>,
    selected: Option<usize>,
    displayed: Option<RecordView>,
    copy_revert: RevertTimer,
    labeler: TimestampLabeler,
}

impl ResultPresenter {
    pub fn new(copy_feedback: Duration) -> Self {
        Self {
            selector: Vec::new(),
            selected: None,
            displayed: None,
            copy_revert: RevertTimer::new(copy_feedback),
            labeler: EpochMillis::local_label,
        }
    }

    pub fn with_labeler(mut self, labeler: TimestampLabeler) -> Self {
        self.labeler = labeler;
        self
    }

    pub fn reset(&mut self) {
        self.selector.clear();
        self.selected = None;
        self.displayed = None;
        self.copy_revert.cancel();
    }

    pub fn show_record(&mut self, record: &SurveyRecord) {
        self.displayed = Some(RecordView::from_record(record));
        self.copy_revert.cancel();
    }

    /// One entry per record, in result-set order, labeled by timestamp.
    pub fn show_choices(&mut self, results: &[SurveyRecord]) {
        self.reset();
        self.selector = results
            .iter()
            .enumerate()
            .map(|(index, record)| SelectorEntry {
                index,
                label: record.timestamp.map_or_else(
                    || UNKNOWN_TIMESTAMP_LABEL.to_string(),
                    self.labeler,
                ),
            })
            .collect();
    }

    /// Applies a selector change. `None` (the prompt entry) hides the display;
    /// an index outside the result set is treated the same way.
    pub fn select(&mut self, results: &[SurveyRecord], index: Option<usize>) {
        match index.and_then(|i| results.get(i).map(|record| (i, record))) {
            Some((i, record)) => {
                self.selected = Some(i);
                self.show_record(record);
            }
            None => {
                if let Some(i) = index {
                    warn!(index = i, len = results.len(), "selector index outside result set");
                }
                self.selected = None;
                self.displayed = None;
                self.copy_revert.cancel();
            }
        }
    }

    pub fn selector(&self) -> &[SelectorEntry] {
        &self.selector
    }

    pub fn has_selector(&self) -> bool {
        !self.selector.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_label(&self) -> &str {
        self.selected
            .and_then(|i| self.selector.get(i))
            .map(|entry| entry.label.as_str())
            .unwrap_or(SELECTOR_PROMPT)
    }

    pub fn displayed(&self) -> Option<&RecordView> {
        self.displayed.as_ref()
    }

    pub fn can_copy(&self) -> bool {
        self.displayed.as_ref().is_some_and(RecordView::can_copy)
    }

    /// Copies the displayed bypass link. A success restarts the revert timer,
    /// replacing any revert still pending from an earlier copy.
    pub fn copy_bypass_link(
        &mut self,
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> CopyOutcome {
        let Some(view) = self.displayed.as_ref().filter(|view| view.can_copy()) else {
            return CopyOutcome::NotAvailable;
        };
        match clipboard.set_text(&view.bypass_link) {
            Ok(()) => {
                self.copy_revert.schedule(now);
                CopyOutcome::Copied
            }
            Err(err) => {
                warn!(error = %err, "failed to copy bypass link");
                CopyOutcome::Failed(err)
            }
        }
    }

    pub fn copy_label(&self) -> &'static str {
        if self.copy_revert.is_pending() {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }

    /// Advances the copy feedback; returns true when the label just reverted.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.copy_revert.fire_if_due(now)
    }

    pub fn next_wakeup(&self, now: Instant) -> Option<Duration> {
        self.copy_revert.remaining(now)
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;

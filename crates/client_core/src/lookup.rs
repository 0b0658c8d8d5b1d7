use std::time::{Duration, Instant};

use shared::{domain::SurveyRecord, protocol::LookupResponse};
use tracing::{info, warn};

use crate::{
    backend::SurveyBackend,
    error::ClientError,
    gate::{Completion, RequestGate, RequestTicket},
    notification::Notification,
    presenter::{ClipboardSink, CopyOutcome, ResultPresenter, COPY_FAILED_MESSAGE},
    validation::{FieldConstraint, FormField},
};

pub const FIND_LABEL: &str = "Find Details";
pub const FETCHING_LABEL: &str = "FETCHING...";
pub const INVALID_SEARCH_MESSAGE: &str = "Please enter a valid survey URL to search.";
pub const NOT_FOUND_MESSAGE: &str = "No survey found for this URL.";
pub const FOUND_MESSAGE: &str = "Survey found!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
    pub ticket: RequestTicket,
    pub survey_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupRejected {
    Invalid,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    NotFound,
    Single,
    Multiple(usize),
    Failed,
    Stale,
}

/// The "get survey" side of the form. Owns the last fetched result set and
/// hands it to the presenter explicitly.
#[derive(Debug, Clone)]
pub struct LookupWorkflow {
    pub query: FormField,
    results: Vec<SurveyRecord>,
    presenter: ResultPresenter,
    notification: Option<Notification>,
    gate: RequestGate,
}

impl LookupWorkflow {
    pub fn new(copy_feedback: Duration) -> Self {
        Self::with_presenter(ResultPresenter::new(copy_feedback))
    }

    pub fn with_presenter(presenter: ResultPresenter) -> Self {
        Self {
            query: FormField::new(FieldConstraint::REQUIRED_URL),
            results: Vec::new(),
            presenter,
            notification: None,
            gate: RequestGate::default(),
        }
    }

    pub fn results(&self) -> &[SurveyRecord] {
        &self.results
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn button_label(&self) -> &'static str {
        if self.is_busy() {
            FETCHING_LABEL
        } else {
            FIND_LABEL
        }
    }

    fn clear_results(&mut self) {
        self.results.clear();
        self.presenter.reset();
        self.notification = None;
    }

    /// Full reset used when the form leaves or enters Get mode.
    pub fn reset(&mut self) {
        self.clear_results();
        self.query.clear();
        self.gate.invalidate();
    }

    /// Drops every trace of the previous search, validates the query and, when
    /// valid, disables the control.
    pub fn begin(&mut self) -> Result<PendingLookup, LookupRejected> {
        if self.gate.is_busy() {
            return Err(LookupRejected::InFlight);
        }
        self.clear_results();
        if !self.query.revalidate() {
            self.notification = Some(Notification::error(INVALID_SEARCH_MESSAGE));
            return Err(LookupRejected::Invalid);
        }
        let ticket = self.gate.open().ok_or(LookupRejected::InFlight)?;
        Ok(PendingLookup {
            ticket,
            survey_url: self.query.trimmed().to_string(),
        })
    }

    pub fn finish(
        &mut self,
        ticket: RequestTicket,
        result: Result<LookupResponse, ClientError>,
    ) -> LookupOutcome {
        if self.gate.close(ticket) == Completion::Stale {
            info!(ticket = ticket.0, "discarding lookup result for reset form");
            return LookupOutcome::Stale;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "survey lookup failed");
                self.notification = Some(Notification::error(format!(
                    "Failed to retrieve survey: {err}"
                )));
                return LookupOutcome::Failed;
            }
        };

        let message = response.message.clone();
        let count = response.count;
        let records = response.into_records();
        if let Some(count) = count.filter(|c| *c as usize != records.len()) {
            warn!(count, returned = records.len(), "lookup count disagrees with results");
        }

        match records.len() {
            0 => {
                self.notification = Some(Notification::error(
                    message
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| NOT_FOUND_MESSAGE.to_string()),
                ));
                LookupOutcome::NotFound
            }
            1 => {
                self.results = records;
                self.presenter.show_record(&self.results[0]);
                self.notification = Some(Notification::success(FOUND_MESSAGE));
                info!("survey found");
                LookupOutcome::Single
            }
            n => {
                self.results = records;
                self.presenter.show_choices(&self.results);
                self.notification = Some(Notification::success(format!(
                    "Found {n} entries for this URL. Select below to view."
                )));
                info!(count = n, "multiple surveys found");
                LookupOutcome::Multiple(n)
            }
        }
    }

    pub async fn lookup(
        &mut self,
        backend: &dyn SurveyBackend,
    ) -> Result<LookupOutcome, LookupRejected> {
        let pending = self.begin()?;
        let result = backend.lookup(&pending.survey_url).await;
        Ok(self.finish(pending.ticket, result))
    }

    pub fn abandon(&mut self, ticket: RequestTicket, reason: impl Into<String>) {
        self.finish(ticket, Err(ClientError::Dispatch(reason.into())));
    }

    /// Selector change: `None` is the prompt entry.
    pub fn select(&mut self, index: Option<usize>) {
        self.presenter.select(&self.results, index);
    }

    pub fn copy_bypass_link(
        &mut self,
        clipboard: &mut dyn ClipboardSink,
        now: Instant,
    ) -> CopyOutcome {
        let outcome = self.presenter.copy_bypass_link(clipboard, now);
        if matches!(outcome, CopyOutcome::Failed(_)) {
            self.notification = Some(Notification::error(COPY_FAILED_MESSAGE));
        }
        outcome
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.presenter.tick(now)
    }
}

#[cfg(test)]
#[path = "tests/lookup_tests.rs"]
mod tests;

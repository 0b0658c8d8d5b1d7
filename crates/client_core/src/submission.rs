use shared::protocol::{SubmitResponse, SubmitSurveyRequest};
use tracing::{info, warn};

use crate::{
    backend::SurveyBackend,
    error::ClientError,
    gate::{Completion, RequestGate, RequestTicket},
    notification::Notification,
    validation::{FieldConstraint, FormField},
};

pub const SAVE_LABEL: &str = "Save Survey";
pub const REGISTERING_LABEL: &str = "REGISTERING...";
pub const INCOMPLETE_FORM_MESSAGE: &str = "Please fill in all required fields correctly.";
pub const REGISTERED_MESSAGE: &str = "Survey registered successfully!";

/// The "add survey" inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyDraft {
    pub survey_url: FormField,
    pub target_group: FormField,
    pub bypass_link: FormField,
    pub additional_details: FormField,
}

impl Default for SurveyDraft {
    fn default() -> Self {
        Self {
            survey_url: FormField::new(FieldConstraint::REQUIRED_URL),
            target_group: FormField::new(FieldConstraint::REQUIRED_TEXT),
            bypass_link: FormField::new(FieldConstraint::OPTIONAL_URL),
            additional_details: FormField::new(FieldConstraint::OPTIONAL_TEXT),
        }
    }
}

impl SurveyDraft {
    pub fn new(
        survey_url: impl Into<String>,
        target_group: impl Into<String>,
        bypass_link: impl Into<String>,
        additional_details: impl Into<String>,
    ) -> Self {
        Self {
            survey_url: FormField::with_value(FieldConstraint::REQUIRED_URL, survey_url),
            target_group: FormField::with_value(FieldConstraint::REQUIRED_TEXT, target_group),
            bypass_link: FormField::with_value(FieldConstraint::OPTIONAL_URL, bypass_link),
            additional_details: FormField::with_value(
                FieldConstraint::OPTIONAL_TEXT,
                additional_details,
            ),
        }
    }

    /// Validates every field so each one gets its annotation.
    pub fn validate_all(&mut self) -> bool {
        let survey_url = self.survey_url.revalidate();
        let target_group = self.target_group.revalidate();
        let bypass_link = self.bypass_link.revalidate();
        let additional_details = self.additional_details.revalidate();
        survey_url && target_group && bypass_link && additional_details
    }

    pub fn to_request(&self) -> SubmitSurveyRequest {
        SubmitSurveyRequest {
            survey_url: self.survey_url.trimmed().to_string(),
            target_group: self.target_group.trimmed().to_string(),
            bypass_link: self.bypass_link.trimmed().to_string(),
            additional_details: self.additional_details.trimmed().to_string(),
        }
    }

    pub fn clear(&mut self) {
        self.survey_url.clear();
        self.target_group.clear();
        self.bypass_link.clear();
        self.additional_details.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub ticket: RequestTicket,
    pub request: SubmitSurveyRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRejected {
    Invalid,
    InFlight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Registered,
    Failed,
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct SubmissionWorkflow {
    pub draft: SurveyDraft,
    notification: Option<Notification>,
    gate: RequestGate,
}

impl SubmissionWorkflow {
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
            REGISTERING_LABEL
        } else {
            SAVE_LABEL
        }
    }

    /// Clears inputs, annotations and feedback. A request already in flight
    /// keeps the control disabled and its completion is discarded.
    pub fn reset(&mut self) {
        self.draft.clear();
        self.notification = None;
        self.gate.invalidate();
    }

    /// Validates and, when valid, disables the control and hands back the
    /// request to send.
    pub fn begin(&mut self) -> Result<PendingSubmission, SubmitRejected> {
        if self.gate.is_busy() {
            return Err(SubmitRejected::InFlight);
        }
        if !self.draft.validate_all() {
            self.notification = Some(Notification::error(INCOMPLETE_FORM_MESSAGE));
            return Err(SubmitRejected::Invalid);
        }
        let ticket = self.gate.open().ok_or(SubmitRejected::InFlight)?;
        self.notification = None;
        Ok(PendingSubmission {
            ticket,
            request: self.draft.to_request(),
        })
    }

    /// Re-enables the control and applies the outcome of `ticket`.
    pub fn finish(
        &mut self,
        ticket: RequestTicket,
        result: Result<SubmitResponse, ClientError>,
    ) -> SubmitOutcome {
        if self.gate.close(ticket) == Completion::Stale {
            info!(ticket = ticket.0, "discarding submission result for reset form");
            return SubmitOutcome::Stale;
        }

        let result = result.and_then(|response| {
            if response.is_success() {
                Ok(())
            } else {
                Err(ClientError::application(response.message))
            }
        });

        match result {
            Ok(()) => {
                info!("survey registered");
                self.draft.clear();
                self.notification = Some(Notification::success(REGISTERED_MESSAGE));
                SubmitOutcome::Registered
            }
            Err(err) => {
                warn!(error = %err, "survey registration failed");
                self.notification = Some(Notification::error(format!(
                    "Failed to register survey: {err}"
                )));
                SubmitOutcome::Failed
            }
        }
    }

    /// `begin`, send, `finish` in one step.
    pub async fn submit(
        &mut self,
        backend: &dyn SurveyBackend,
    ) -> Result<SubmitOutcome, SubmitRejected> {
        let pending = self.begin()?;
        let result = backend.submit(&pending.request).await;
        Ok(self.finish(pending.ticket, result))
    }

    /// Aborts a begun submission that could not be dispatched.
    pub fn abandon(&mut self, ticket: RequestTicket, reason: impl Into<String>) {
        self.finish(ticket, Err(ClientError::Dispatch(reason.into())));
    }
}

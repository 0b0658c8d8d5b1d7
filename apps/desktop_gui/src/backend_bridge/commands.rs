//! Backend commands queued from UI to backend worker.

use client_core::RequestTicket;
use shared::protocol::SubmitSurveyRequest;

pub enum BackendCommand {
    SubmitSurvey {
        ticket: RequestTicket,
        request: SubmitSurveyRequest,
    },
    LookupSurvey {
        ticket: RequestTicket,
        survey_url: String,
    },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitSurvey { .. } => "submit_survey",
            Self::LookupSurvey { .. } => "lookup_survey",
        }
    }
}

//! Survey registry client: field validation, the submission and lookup
//! workflows, and the result presenter, independent of any UI toolkit.
//!
//! Front ends own a [`SurveyForm`], call `begin` on a workflow when the user
//! triggers it, execute the returned request against a [`SurveyBackend`]
//! (possibly on another thread), and feed the result back through `finish`.

pub mod backend;
pub mod config;
pub mod error;
pub mod form;
pub mod gate;
pub mod lookup;
pub mod notification;
pub mod presenter;
pub mod schedule;
pub mod submission;
pub mod validation;

pub use backend::{HttpSurveyBackend, SurveyBackend};
pub use config::{load_settings, Settings};
pub use error::{ClientError, ClipboardError};
pub use form::{Mode, SurveyForm};
pub use gate::RequestTicket;
pub use lookup::{LookupOutcome, LookupRejected, LookupWorkflow, PendingLookup};
pub use notification::{Notification, NotificationKind};
pub use presenter::{ClipboardSink, CopyOutcome, RecordView, ResultPresenter, SelectorEntry};
pub use submission::{
    PendingSubmission, SubmissionWorkflow, SubmitOutcome, SubmitRejected, SurveyDraft,
};
pub use validation::{is_valid_url, validate_field, FieldConstraint, FieldKind, ValidationError};

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

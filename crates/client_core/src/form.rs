use std::time::Duration;

use crate::{lookup::LookupWorkflow, submission::SubmissionWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Add,
    Get,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Add, Mode::Get];

    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "Add New Survey",
            Self::Get => "Get Survey Information",
        }
    }
}

/// One Add/Get form instance. Only the workflow for `mode` is active.
#[derive(Debug, Clone)]
pub struct SurveyForm {
    mode: Mode,
    pub submission: SubmissionWorkflow,
    pub lookup: LookupWorkflow,
}

impl SurveyForm {
    pub fn new(copy_feedback: Duration) -> Self {
        Self {
            mode: Mode::default(),
            submission: SubmissionWorkflow::default(),
            lookup: LookupWorkflow::new(copy_feedback),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Changes mode, resetting both workflows. Selecting the current mode
    /// leaves state untouched.
    pub fn switch_mode(&mut self, mode: Mode) -> bool {
        if mode == self.mode {
            return false;
        }
        tracing::debug!(from = ?self.mode, to = ?mode, "switching form mode");
        self.mode = mode;
        self.submission.reset();
        self.lookup.reset();
        true
    }
}

//! Desktop app shell: owns the survey form, drains backend events and queues
//! requests for the backend worker.

use std::time::{Duration, Instant};

use client_core::{
    ClipboardSink, CopyOutcome, LookupRejected, Mode, SubmitRejected, SurveyForm,
};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use eframe::egui;
use shared::error::ErrorKind;

use crate::backend_bridge::commands::BackendCommand;
use crate::clipboard::SystemClipboard;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const IDLE_REPAINT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StatusBannerSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub(super) struct StatusBanner {
    pub(super) severity: StatusBannerSeverity,
    pub(super) message: String,
}

pub struct SurveyFormApp {
    pub(super) form: SurveyForm,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    clipboard: Box<dyn ClipboardSink>,
    pub(super) status_banner: Option<StatusBanner>,
    pub(super) worker_status: String,
}

impl SurveyFormApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        copy_feedback: Duration,
    ) -> Self {
        Self::with_clipboard(
            cmd_tx,
            ui_rx,
            copy_feedback,
            Box::new(SystemClipboard::default()),
        )
    }

    pub fn with_clipboard(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        copy_feedback: Duration,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        Self {
            form: SurveyForm::new(copy_feedback),
            cmd_tx,
            ui_rx,
            clipboard,
            status_banner: None,
            worker_status: "Backend worker starting...".to_string(),
        }
    }

    pub(super) fn process_ui_events(&mut self) {
        loop {
            match self.ui_rx.try_recv() {
                Ok(UiEvent::Info(message)) => {
                    tracing::info!("{message}");
                    self.show_info(&message);
                    self.worker_status = message;
                }
                Ok(UiEvent::Error(err)) => self.report_error(err),
                Ok(UiEvent::SubmitCompleted { ticket, result }) => {
                    let outcome = self.form.submission.finish(ticket, result);
                    tracing::debug!(ticket = ticket.0, ?outcome, "submission completed");
                }
                Ok(UiEvent::LookupCompleted { ticket, result }) => {
                    let outcome = self.form.lookup.finish(ticket, result);
                    tracing::debug!(ticket = ticket.0, ?outcome, "lookup completed");
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.status_banner.is_none() {
                        self.status_banner = Some(StatusBanner {
                            severity: StatusBannerSeverity::Error,
                            message: "Backend worker stopped; restart the app".to_string(),
                        });
                    }
                    break;
                }
            }
        }
    }

    /// Info never replaces an error banner.
    fn show_info(&mut self, message: &str) {
        let has_error = self
            .status_banner
            .as_ref()
            .is_some_and(|banner| banner.severity == StatusBannerSeverity::Error);
        if !has_error {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Info,
                message: message.to_string(),
            });
        }
    }

    fn report_error(&mut self, err: UiError) {
        tracing::warn!(
            category = ?err.category(),
            context = ?err.context(),
            "{}",
            err.message()
        );
        if err.wants_banner() {
            self.status_banner = Some(StatusBanner {
                severity: StatusBannerSeverity::Error,
                message: format!("{}: {}", err.label(), err.message()),
            });
        }
    }

    pub(super) fn select_mode(&mut self, mode: Mode) {
        if self.form.switch_mode(mode) {
            tracing::info!(mode = mode.label(), "form mode changed");
        }
    }

    pub(super) fn submit_survey(&mut self) {
        let pending = match self.form.submission.begin() {
            Ok(pending) => pending,
            Err(SubmitRejected::Invalid) => {
                tracing::debug!("survey form failed validation");
                return;
            }
            Err(SubmitRejected::InFlight) => return,
        };
        let ticket = pending.ticket;
        let cmd = BackendCommand::SubmitSurvey {
            ticket,
            request: pending.request,
        };
        if let Err(reason) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.report_error(UiError::from_message(UiErrorContext::Submit, reason));
            self.form.submission.abandon(ticket, reason);
        }
    }

    pub(super) fn lookup_survey(&mut self) {
        let pending = match self.form.lookup.begin() {
            Ok(pending) => pending,
            Err(LookupRejected::Invalid) => {
                tracing::debug!("lookup query failed validation");
                return;
            }
            Err(LookupRejected::InFlight) => return,
        };
        let ticket = pending.ticket;
        let cmd = BackendCommand::LookupSurvey {
            ticket,
            survey_url: pending.survey_url,
        };
        if let Err(reason) = dispatch_backend_command(&self.cmd_tx, cmd) {
            self.report_error(UiError::from_message(UiErrorContext::Lookup, reason));
            self.form.lookup.abandon(ticket, reason);
        }
    }

    /// Enter in a single-line field acts like the active mode's button.
    pub(super) fn submit_active_mode(&mut self) {
        match self.form.mode() {
            Mode::Add => self.submit_survey(),
            Mode::Get => self.lookup_survey(),
        }
    }

    pub(super) fn dismiss_notification(&mut self) {
        match self.form.mode() {
            Mode::Add => self.form.submission.dismiss_notification(),
            Mode::Get => self.form.lookup.dismiss_notification(),
        }
    }

    pub(super) fn copy_bypass_link(&mut self) {
        let outcome = self
            .form
            .lookup
            .copy_bypass_link(self.clipboard.as_mut(), Instant::now());
        if let CopyOutcome::Failed(err) = outcome {
            self.report_error(UiError::from_kind(
                UiErrorContext::Copy,
                ErrorKind::Clipboard,
                err.to_string(),
            ));
        }
    }

    /// Advances the copy feedback and returns how soon the next repaint is due.
    fn tick(&mut self, now: Instant) -> Duration {
        self.form.lookup.tick(now);
        self.form
            .lookup
            .presenter()
            .next_wakeup(now)
            .map_or(IDLE_REPAINT, |wakeup| wakeup.min(IDLE_REPAINT))
    }
}

impl eframe::App for SurveyFormApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        let repaint_after = self.tick(Instant::now());

        egui::TopBottomPanel::bottom("worker_status").show(ctx, |ui| {
            ui.small(self.worker_status.as_str());
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.show_form(ui);
            });
        });

        ctx.request_repaint_after(repaint_after);
    }
}

#[cfg(test)]
mod tests {
    use client_core::{ClientError, ClipboardError, RequestTicket};
    use crossbeam_channel::bounded;
    use shared::domain::{EpochMillis, SurveyRecord};
    use shared::protocol::{LookupResponse, SubmitResponse};

    use super::*;

    struct RejectingClipboard;

    impl ClipboardSink for RejectingClipboard {
        fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError("no display".to_string()))
        }
    }

    struct Harness {
        app: SurveyFormApp,
        cmd_rx: Receiver<BackendCommand>,
        ui_tx: Sender<UiEvent>,
    }

    fn harness() -> Harness {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(16);
        let app = SurveyFormApp::with_clipboard(
            cmd_tx,
            ui_rx,
            Duration::from_millis(2000),
            Box::new(RejectingClipboard),
        );
        Harness { app, cmd_rx, ui_tx }
    }

    fn record(ts: i64, bypass: &str) -> SurveyRecord {
        SurveyRecord {
            survey_url: "https://s.co/1".to_string(),
            target_group: "students".to_string(),
            bypass_link: Some(bypass.to_string()),
            additional_details: None,
            timestamp: Some(EpochMillis(ts)),
        }
    }

    #[test]
    fn submit_queues_command_and_applies_completion() {
        let mut h = harness();
        h.app.form.submission.draft.survey_url.set("https://s.co/1");
        h.app.form.submission.draft.target_group.set("students");

        h.app.submit_survey();
        assert!(h.app.form.submission.is_busy());
        let ticket = match h.cmd_rx.try_recv().expect("queued command") {
            BackendCommand::SubmitSurvey { ticket, request } => {
                assert_eq!(request.survey_url, "https://s.co/1");
                ticket
            }
            BackendCommand::LookupSurvey { .. } => panic!("expected submit command"),
        };

        h.ui_tx
            .send(UiEvent::SubmitCompleted {
                ticket,
                result: Ok(SubmitResponse {
                    result: "success".to_string(),
                    message: None,
                }),
            })
            .expect("send completion");
        h.app.process_ui_events();

        assert!(!h.app.form.submission.is_busy());
        let note = h.app.form.submission.notification().expect("notification");
        assert_eq!(note.message, "Survey registered successfully!");
        assert!(h.app.form.submission.draft.survey_url.value.is_empty());
    }

    #[test]
    fn invalid_form_queues_nothing() {
        let mut h = harness();
        h.app.submit_survey();
        assert!(h.cmd_rx.try_recv().is_err());
        assert!(!h.app.form.submission.is_busy());
    }

    #[test]
    fn disconnected_worker_abandons_lookup() {
        let mut h = harness();
        drop(h.cmd_rx);
        h.app.form.lookup.query.set("https://s.co/1");

        h.app.lookup_survey();

        assert!(!h.app.form.lookup.is_busy());
        let note = h.app.form.lookup.notification().expect("notification");
        assert!(note.is_error());
        assert!(note
            .message
            .starts_with("Failed to retrieve survey: Backend command processor disconnected"));
    }

    #[test]
    fn late_lookup_after_mode_switch_is_discarded() {
        let mut h = harness();
        h.app.select_mode(Mode::Get);
        h.app.form.lookup.query.set("https://s.co/1");
        h.app.lookup_survey();
        let ticket = match h.cmd_rx.try_recv().expect("queued command") {
            BackendCommand::LookupSurvey { ticket, .. } => ticket,
            BackendCommand::SubmitSurvey { .. } => panic!("expected lookup command"),
        };

        h.app.select_mode(Mode::Add);
        h.ui_tx
            .send(UiEvent::LookupCompleted {
                ticket,
                result: Ok(LookupResponse {
                    found: true,
                    count: Some(1),
                    results: Some(vec![record(1, "https://b.co/x")]),
                    message: None,
                }),
            })
            .expect("send completion");
        h.app.process_ui_events();

        assert!(h.app.form.lookup.results().is_empty());
        assert!(h.app.form.lookup.notification().is_none());
        assert!(!h.app.form.lookup.is_busy());
    }

    #[test]
    fn clipboard_failure_surfaces_copy_message() {
        let mut h = harness();
        h.app.select_mode(Mode::Get);
        h.app.form.lookup.query.set("https://s.co/1");
        h.app.lookup_survey();
        h.ui_tx
            .send(UiEvent::LookupCompleted {
                ticket: RequestTicket(0),
                result: Ok(LookupResponse {
                    found: true,
                    count: None,
                    results: Some(vec![record(1, "https://b.co/x")]),
                    message: None,
                }),
            })
            .expect("send completion");
        h.app.process_ui_events();
        assert!(h.app.form.lookup.presenter().can_copy());

        h.app.copy_bypass_link();

        let note = h.app.form.lookup.notification().expect("notification");
        assert_eq!(note.message, "Failed to copy. Please copy manually.");
        assert_eq!(h.app.form.lookup.presenter().copy_label(), "Copy");
    }

    #[test]
    fn startup_config_error_raises_banner() {
        let mut h = harness();
        h.ui_tx
            .send(UiEvent::Error(UiError::from_kind(
                UiErrorContext::BackendStartup,
                ClientError::Config("backend endpoint is not configured".to_string()).kind(),
                "backend endpoint is not configured",
            )))
            .expect("send error");
        h.app.process_ui_events();

        let banner = h.app.status_banner.as_ref().expect("banner");
        assert_eq!(banner.message, "Configuration: backend endpoint is not configured");
    }

    #[test]
    fn worker_ready_shows_info_banner_without_hiding_errors() {
        let mut h = harness();
        h.ui_tx
            .send(UiEvent::Info("Backend worker ready".to_string()))
            .expect("send info");
        h.app.process_ui_events();

        let banner = h.app.status_banner.as_ref().expect("banner");
        assert_eq!(banner.severity, StatusBannerSeverity::Info);
        assert_eq!(banner.message, "Backend worker ready");
        assert_eq!(h.app.worker_status, "Backend worker ready");

        h.ui_tx
            .send(UiEvent::Error(UiError::from_kind(
                UiErrorContext::BackendStartup,
                ErrorKind::Config,
                "backend endpoint is not configured",
            )))
            .expect("send error");
        h.ui_tx
            .send(UiEvent::Info("Backend worker ready".to_string()))
            .expect("send info");
        h.app.process_ui_events();

        let banner = h.app.status_banner.as_ref().expect("banner");
        assert_eq!(banner.severity, StatusBannerSeverity::Error);
    }

    #[test]
    fn enter_submits_the_active_mode() {
        let mut h = harness();
        h.app.form.submission.draft.survey_url.set("https://s.co/1");
        h.app.form.submission.draft.target_group.set("students");
        h.app.submit_active_mode();
        assert!(matches!(
            h.cmd_rx.try_recv(),
            Ok(BackendCommand::SubmitSurvey { .. })
        ));

        h.app.select_mode(Mode::Get);
        h.app.form.lookup.query.set("https://s.co/1");
        h.app.submit_active_mode();
        match h.cmd_rx.try_recv() {
            Ok(BackendCommand::LookupSurvey { survey_url, .. }) => {
                assert_eq!(survey_url, "https://s.co/1");
            }
            _ => panic!("expected lookup command"),
        }
    }

    #[test]
    fn dismiss_clears_only_the_active_notification() {
        let mut h = harness();
        h.app.submit_survey();
        assert!(h.app.form.submission.notification().is_some());

        h.app.dismiss_notification();
        assert!(h.app.form.submission.notification().is_none());

        h.app.select_mode(Mode::Get);
        h.app.form.lookup.query.set("not a url");
        h.app.lookup_survey();
        assert!(h.app.form.lookup.notification().is_some());
        h.app.dismiss_notification();
        assert!(h.app.form.lookup.notification().is_none());
    }
}

//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{ClientError, HttpSurveyBackend, Settings, SurveyBackend};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(settings: Settings, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let backend: Result<Arc<dyn SurveyBackend>, String> =
                match HttpSurveyBackend::from_settings(&settings) {
                    Ok(backend) => {
                        tracing::info!(endpoint = %backend.endpoint(), "survey backend ready");
                        Ok(Arc::new(backend))
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "survey backend unavailable");
                        let _ = ui_tx.try_send(UiEvent::Error(UiError::from_kind(
                            UiErrorContext::BackendStartup,
                            err.kind(),
                            err.to_string(),
                        )));
                        Err(err.to_string())
                    }
                };
            if backend.is_ok() {
                let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));
            }

            while let Ok(cmd) = cmd_rx.recv() {
                tracing::debug!(command = cmd.name(), "backend worker received command");
                let backend = match &backend {
                    Ok(backend) => Arc::clone(backend),
                    Err(reason) => {
                        // Requests still complete so the form re-enables its control.
                        let _ = ui_tx.send(unavailable(cmd, reason));
                        continue;
                    }
                };
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = execute(backend.as_ref(), cmd).await;
                    if ui_tx.send(event).is_err() {
                        tracing::debug!("ui event channel closed; dropping backend completion");
                    }
                });
            }
            tracing::info!("backend command channel closed; worker exiting");
        });
    });
}

async fn execute(backend: &dyn SurveyBackend, cmd: BackendCommand) -> UiEvent {
    match cmd {
        BackendCommand::SubmitSurvey { ticket, request } => UiEvent::SubmitCompleted {
            ticket,
            result: backend.submit(&request).await,
        },
        BackendCommand::LookupSurvey { ticket, survey_url } => UiEvent::LookupCompleted {
            ticket,
            result: backend.lookup(&survey_url).await,
        },
    }
}

fn unavailable(cmd: BackendCommand, reason: &str) -> UiEvent {
    let err = ClientError::Config(reason.to_string());
    match cmd {
        BackendCommand::SubmitSurvey { ticket, .. } => UiEvent::SubmitCompleted {
            ticket,
            result: Err(err),
        },
        BackendCommand::LookupSurvey { ticket, .. } => UiEvent::LookupCompleted {
            ticket,
            result: Err(err),
        },
    }
}

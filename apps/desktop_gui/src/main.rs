mod backend_bridge;
mod clipboard;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::events::{UiError, UiErrorContext, UiEvent};
use ui::SurveyFormApp;

#[derive(Debug, Parser)]
#[command(name = "desktop_gui", about = "Register and look up survey bypass links")]
struct Args {
    /// Backend endpoint URL; overrides the config file and environment.
    #[arg(long)]
    endpoint: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);

    let settings = match client_core::load_settings() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::error!("failed to load settings: {err:#}");
            let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                format!("configuration error: {err:#}"),
            )));
            client_core::Settings::default()
        }
    }
    .with_endpoint_override(args.endpoint);
    let copy_feedback = settings.copy_feedback_delay();
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Survey Registry")
            .with_inner_size([560.0, 640.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Survey Registry",
        options,
        Box::new(move |_cc| Ok(Box::new(SurveyFormApp::new(cmd_tx, ui_rx, copy_feedback)))),
    )
}

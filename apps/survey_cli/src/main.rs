mod report;

use std::{process::ExitCode, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    HttpSurveyBackend, LookupOutcome, LookupRejected, LookupWorkflow, SubmissionWorkflow,
    SubmitOutcome, SubmitRejected, SurveyBackend, SurveyDraft,
};
use shared::error::ErrorKind;
use tracing_subscriber::EnvFilter;

use report::{Choice, FieldError, Report};

#[derive(Parser, Debug)]
#[command(name = "survey_cli", about = "Register and look up survey bypass links")]
struct Cli {
    /// Backend endpoint URL; overrides the config file and environment.
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a survey.
    Add {
        #[arg(long)]
        survey_url: String,
        #[arg(long)]
        target_group: String,
        #[arg(long)]
        bypass_link: Option<String>,
        #[arg(long)]
        details: Option<String>,
    },
    /// Look up every registration of a survey URL.
    Get {
        survey_url: String,
        /// Entry to show when several registrations match, counted from 1.
        #[arg(long)]
        pick: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let report = match execute(&cli).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{err:#}");
            Report::failed(ErrorKind::Config, format!("{err:#}"))
        }
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("failed to encode report: {err}"),
        }
    } else if report.error.is_some() {
        eprint!("{}", report.render_text());
    } else {
        print!("{}", report.render_text());
    }
    ExitCode::from(report.exit_code())
}

async fn execute(cli: &Cli) -> Result<Report> {
    let settings = client_core::load_settings()
        .context("failed to load settings")?
        .with_endpoint_override(cli.endpoint.clone());
    let backend = match HttpSurveyBackend::from_settings(&settings) {
        Ok(backend) => backend,
        Err(err) => return Ok(Report::failed(err.kind(), err.to_string())),
    };
    tracing::debug!(endpoint = %backend.endpoint(), "using survey backend");

    let report = match &cli.command {
        Command::Add {
            survey_url,
            target_group,
            bypass_link,
            details,
        } => {
            let draft = SurveyDraft::new(
                survey_url.as_str(),
                target_group.as_str(),
                bypass_link.clone().unwrap_or_default(),
                details.clone().unwrap_or_default(),
            );
            add_survey(&backend, draft).await
        }
        Command::Get { survey_url, pick } => {
            get_survey(
                &backend,
                survey_url,
                *pick,
                settings.copy_feedback_delay(),
            )
            .await
        }
    };
    Ok(report)
}

async fn add_survey(backend: &dyn SurveyBackend, draft: SurveyDraft) -> Report {
    let mut workflow = SubmissionWorkflow::default();
    workflow.draft = draft;
    let mut report = Report::default();

    let pending = match workflow.begin() {
        Ok(pending) => pending,
        Err(SubmitRejected::Invalid) => {
            report.field_errors = draft_errors(&workflow.draft);
            report.notification = workflow.notification().cloned();
            report.fail(
                ErrorKind::Validation,
                client_core::submission::INCOMPLETE_FORM_MESSAGE,
            );
            return report;
        }
        Err(SubmitRejected::InFlight) => {
            report.fail(ErrorKind::Application, "a submission is already in flight");
            return report;
        }
    };

    let result = backend.submit(&pending.request).await;
    let failure = match &result {
        Ok(response) if response.is_success() => None,
        Ok(_) => Some(ErrorKind::Application),
        Err(err) => Some(err.kind()),
    };
    let outcome = workflow.finish(pending.ticket, result);
    tracing::info!(?outcome, "submission finished");

    report.notification = workflow.notification().cloned();
    if outcome != SubmitOutcome::Registered {
        report.fail_from_notification(failure.unwrap_or(ErrorKind::Application));
    }
    report
}

async fn get_survey(
    backend: &dyn SurveyBackend,
    survey_url: &str,
    pick: Option<usize>,
    copy_feedback: Duration,
) -> Report {
    let mut workflow = LookupWorkflow::new(copy_feedback);
    workflow.query.set(survey_url);
    let mut report = Report::default();

    let pending = match workflow.begin() {
        Ok(pending) => pending,
        Err(LookupRejected::Invalid) => {
            if let Some(err) = workflow.query.error() {
                report.field_errors.push(FieldError {
                    field: "survey-url",
                    message: err.to_string(),
                });
            }
            report.notification = workflow.notification().cloned();
            report.fail(
                ErrorKind::Validation,
                client_core::lookup::INVALID_SEARCH_MESSAGE,
            );
            return report;
        }
        Err(LookupRejected::InFlight) => {
            report.fail(ErrorKind::Application, "a lookup is already in flight");
            return report;
        }
    };

    let result = backend.lookup(&pending.survey_url).await;
    let failure = result.as_ref().err().map(|err| err.kind());
    let outcome = workflow.finish(pending.ticket, result);
    tracing::info!(?outcome, "lookup finished");
    report.notification = workflow.notification().cloned();

    match outcome {
        LookupOutcome::Single => {
            if let Some(pick) = pick.filter(|pick| *pick != 1) {
                report.fail(ErrorKind::Validation, pick_out_of_range(pick, 1));
            }
        }
        LookupOutcome::Multiple(available) => {
            report.choices = workflow
                .presenter()
                .selector()
                .iter()
                .map(Choice::from)
                .collect();
            if let Some(pick) = pick {
                match pick_index(pick, available) {
                    Some(index) => workflow.select(Some(index)),
                    None => {
                        report.fail(ErrorKind::Validation, pick_out_of_range(pick, available))
                    }
                }
            }
        }
        LookupOutcome::NotFound => {
            report.fail_from_notification(ErrorKind::Application);
        }
        LookupOutcome::Failed => {
            report.fail_from_notification(failure.unwrap_or(ErrorKind::Transport));
        }
        LookupOutcome::Stale => {
            report.fail(ErrorKind::Application, "lookup result was discarded");
        }
    }

    report.record = workflow.presenter().displayed().cloned();
    report
}

fn draft_errors(draft: &SurveyDraft) -> Vec<FieldError> {
    [
        ("survey-url", &draft.survey_url),
        ("target-group", &draft.target_group),
        ("bypass-link", &draft.bypass_link),
        ("details", &draft.additional_details),
    ]
    .into_iter()
    .filter_map(|(field, input)| {
        input.error().map(|err| FieldError {
            field,
            message: err.to_string(),
        })
    })
    .collect()
}

/// Converts a 1-based `--pick` into a result-set index.
fn pick_index(pick: usize, available: usize) -> Option<usize> {
    (1..=available).contains(&pick).then(|| pick - 1)
}

fn pick_out_of_range(pick: usize, available: usize) -> String {
    format!("--pick {pick} is out of range; choose 1 to {available}")
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;

//! Form page handlers.
//!
//! `POST /` runs the same pipeline as the CLI, in-process, and renders the
//! result below the form.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Html, Form};
use tracing::{error, info, warn};
use triage_core::{
    run_triage, validate_config, ApiMode, OutputFormat, RenderOptions, SourceError, TicketScope,
    TriageOptions,
};

use crate::page::{render_page, Outcome, TriageForm};
use crate::state::AppState;

/// A failed run, classified for the response status.
#[derive(Debug)]
enum RunError {
    /// The form or the configuration is wrong.
    BadRequest(String),
    /// FreshService failed or refused the request.
    Upstream(String),
    Internal(String),
}

impl RunError {
    fn status(&self) -> StatusCode {
        match self {
            RunError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RunError::Upstream(_) => StatusCode::BAD_GATEWAY,
            RunError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            RunError::BadRequest(m) | RunError::Upstream(m) | RunError::Internal(m) => m,
        }
    }
}

/// Parsed form.
#[derive(Debug)]
struct RunRequest {
    mode: ApiMode,
    scope: Option<TicketScope>,
    format: OutputFormat,
    file: Option<PathBuf>,
    time_wait: Option<u64>,
    show_score: bool,
}

pub async fn form_page() -> Result<Html<String>, StatusCode> {
    render_page(&TriageForm::default(), None)
        .map(Html)
        .map_err(page_error)
}

pub async fn run_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TriageForm>,
) -> Result<(StatusCode, Html<String>), StatusCode> {
    let (status, outcome) = match execute(&state, &form).await {
        Ok(outcome) => (StatusCode::OK, outcome),
        Err(e) => {
            warn!(status = %e.status(), error = e.message(), "Triage run failed");
            (e.status(), Outcome::Error(e.message().to_string()))
        }
    };
    let page = render_page(&form, Some(&outcome)).map_err(page_error)?;
    Ok((status, Html(page)))
}

fn page_error(e: std::fmt::Error) -> StatusCode {
    error!(error = %e, "Failed to render page");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn execute(state: &AppState, form: &TriageForm) -> Result<Outcome, RunError> {
    let request = parse_form(form)?;
    info!(
        mode = request.mode.as_str(),
        scope = request.scope.map(|s| s.as_str()),
        output = request.format.as_str(),
        "Running triage from form"
    );

    let mut config = state.config().clone();
    if let Some(wait) = request.time_wait {
        config.freshservice.time_wait_ms = wait;
    }
    validate_config(&config, request.mode, request.scope)
        .map_err(|e| RunError::BadRequest(e.to_string()))?;

    let source = state
        .source_for(&config, request.mode, request.file.as_deref())
        .map_err(|e| RunError::BadRequest(e.to_string()))?;

    // Test mode has no scope; the fixture is returned as is.
    let scope = request.scope.unwrap_or(TicketScope::Mine);
    let report = run_triage(
        source.as_ref(),
        scope,
        &TriageOptions::for_format(request.format),
    )
    .await
    .map_err(|e| source_error(e, request.mode))?;

    let options = RenderOptions {
        show_score: request.show_score,
        portal_url: config.freshservice.portal_url.clone(),
    };
    let output = report
        .render(request.format, &options)
        .map_err(|e| RunError::Internal(e.to_string()))?;

    Ok(match request.format {
        OutputFormat::Html => Outcome::Rows(output),
        OutputFormat::Json | OutputFormat::Table => Outcome::Text(output),
    })
}

fn parse_form(form: &TriageForm) -> Result<RunRequest, RunError> {
    let bad = |e: &dyn std::fmt::Display| RunError::BadRequest(e.to_string());

    let mode: ApiMode = form.mode.trim().parse().map_err(|e| bad(&e))?;
    let scope = non_empty(&form.get_tickets)
        .map(str::parse::<TicketScope>)
        .transpose()
        .map_err(|e| bad(&e))?;
    let format = match non_empty(&form.output) {
        Some(output) => output.parse::<OutputFormat>().map_err(|e| bad(&e))?,
        None => OutputFormat::default(),
    };
    let file = non_empty(&form.file).map(PathBuf::from);
    let time_wait = non_empty(&form.time_wait)
        .map(str::parse::<u64>)
        .transpose()
        .map_err(|_| bad(&"time_wait must be a whole number of milliseconds"))?;
    let show_score = match non_empty(&form.log_level) {
        None | Some("warning") => false,
        Some("debug") => true,
        Some(other) => return Err(bad(&format!("unknown log level: {:?}", other))),
    };

    if mode != ApiMode::Test && scope.is_none() {
        return Err(bad(&"get_tickets is required for staging and production"));
    }
    if mode == ApiMode::Test && file.is_none() {
        return Err(bad(&"a fixture file is required in test mode"));
    }

    Ok(RunRequest {
        mode,
        scope,
        format,
        file,
        time_wait,
        show_score,
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}

fn source_error(e: SourceError, mode: ApiMode) -> RunError {
    let message = match e.hint() {
        Some(hint) => format!("{} {}", e, hint),
        None => e.to_string(),
    };
    if mode == ApiMode::Test {
        RunError::BadRequest(message)
    } else {
        RunError::Upstream(message)
    }
}

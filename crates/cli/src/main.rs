mod args;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{debug, error, info, warn};

use triage_core::{
    build_source, load_config, load_config_from_env, run_triage, validate_config, ApiMode, Config,
    OutputFormat, RenderOptions, SourceError, TicketScope, TriageOptions,
};

use args::{Args, LogLevel};

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "TRIAGE_CONFIG";

/// Config file picked up from the working directory when nothing else is given.
const DEFAULT_CONFIG_FILE: &str = "triage.toml";

/// Exit status after Ctrl+C.
const INTERRUPTED_EXIT: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e
                .chain()
                .find_map(|cause| cause.downcast_ref::<SourceError>())
                .and_then(SourceError::hint)
            {
                eprintln!("{}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let mut config = resolve_config(args.config.as_deref())?;
    if let Some(wait) = args.time_wait {
        config.freshservice.time_wait_ms = wait;
    }

    let log_file = logging::init(args.log_level, config.logging.directory.as_deref())?;
    info!(
        "Triage start time: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("Arguments: {:?}", args);
    if let Some(path) = &log_file {
        debug!("Logging to {:?}", path);
    }

    let mode = ApiMode::from(args.mode);
    let scope = args.get_tickets.map(TicketScope::from);
    validate_config(&config, mode, scope).context("Configuration validation failed")?;

    let source = build_source(&config, mode, args.file.as_deref())
        .context("Failed to set up ticket source")?;

    let format = OutputFormat::from(args.output);
    // Test mode has no scope; the fixture is returned as is.
    let scope = scope.unwrap_or(TicketScope::Mine);
    let triage_options = TriageOptions::for_format(format);

    let report = tokio::select! {
        result = run_triage(source.as_ref(), scope, &triage_options) => {
            result.context("Error fetching tickets")?
        }
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupt received, exiting");
            eprintln!("\nInterrupt received, exiting.");
            return Ok(ExitCode::from(INTERRUPTED_EXIT));
        }
    };

    let options = RenderOptions {
        show_score: args.log_level == LogLevel::Debug,
        portal_url: config.freshservice.portal_url.clone(),
    };
    let output = report
        .render(format, &options)
        .context("Failed to render tickets")?;
    println!("{}", output);

    Ok(ExitCode::SUCCESS)
}

/// Load the config from `--config`, `$TRIAGE_CONFIG` or `./triage.toml`,
/// falling back to defaults plus environment overrides.
fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.exists().then_some(default)
        });

    match path {
        Some(path) => {
            load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => load_config_from_env().context("Failed to load config from environment"),
    }
}

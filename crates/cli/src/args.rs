use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use triage_core::{ApiMode, OutputFormat, TicketScope};

/// Rank FreshService tickets by triage priority.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Where tickets come from
    #[arg(short, long, value_enum)]
    pub mode: ModeArg,

    /// Which tickets to fetch (required for staging and production)
    #[arg(
        short = 'g',
        long,
        value_enum,
        required_if_eq_any([("mode", "staging"), ("mode", "production")])
    )]
    pub get_tickets: Option<ScopeArg>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Json)]
    pub output: FormatArg,

    /// JSON ticket file (required for test mode)
    #[arg(short, long, required_if_eq("mode", "test"))]
    pub file: Option<PathBuf>,

    /// Wait between API calls in milliseconds (overrides freshservice.time_wait_ms)
    #[arg(short = 't', long)]
    pub time_wait: Option<u64>,

    /// Log verbosity; debug also shows the Score column
    #[arg(short = 'l', long, value_enum, default_value_t = LogLevel::Warning)]
    pub log_level: LogLevel,

    /// Config file (defaults to $TRIAGE_CONFIG, then ./triage.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Staging,
    Production,
    Test,
}

impl From<ModeArg> for ApiMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Staging => ApiMode::Staging,
            ModeArg::Production => ApiMode::Production,
            ModeArg::Test => ApiMode::Test,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeArg {
    /// Open tickets assigned to you
    Mine,
    /// Tickets assigned to you that you can act on now
    #[value(alias = "mine_focused")]
    MineFocused,
    /// Open tickets of your group
    Group,
    /// Tickets of your group that can be acted on now
    #[value(alias = "group_focused")]
    GroupFocused,
}

impl From<ScopeArg> for TicketScope {
    fn from(scope: ScopeArg) -> Self {
        match scope {
            ScopeArg::Mine => TicketScope::Mine,
            ScopeArg::MineFocused => TicketScope::MineFocused,
            ScopeArg::Group => TicketScope::Group,
            ScopeArg::GroupFocused => TicketScope::GroupFocused,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Table,
    Html,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Html => OutputFormat::Html,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Warning,
    Debug,
}

impl LogLevel {
    /// Default `EnvFilter` directive for this level.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Warning => "warn",
            LogLevel::Debug => "debug",
        }
    }
}

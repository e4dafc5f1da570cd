pub mod config;
pub mod render;
pub mod scoring;
pub mod source;
pub mod testing;
pub mod ticket;
pub mod triage;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, ApiMode, Config,
    ConfigError, SanitizedConfig,
};
pub use render::{render, OutputFormat, RenderError, RenderOptions};
pub use scoring::{rank, ScoredTicket};
pub use source::{build_source, SourceError, TicketScope, TicketSource};
pub use ticket::Ticket;
pub use triage::{run_triage, TriageOptions, TriageReport};

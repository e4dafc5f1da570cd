use std::path::Path;
use std::sync::Arc;

use triage_core::{build_source, ApiMode, Config, SanitizedConfig, SourceError, TicketSource};

/// Shared application state
pub struct AppState {
    config: Config,
    /// Replaces the mode-selected source for every run (tests).
    source_override: Option<Arc<dyn TicketSource>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            source_override: None,
        }
    }

    /// Serve every run from `source` instead of building one per request.
    pub fn with_source(mut self, source: Arc<dyn TicketSource>) -> Self {
        self.source_override = Some(source);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    /// Ticket source for one run.
    pub fn source_for(
        &self,
        config: &Config,
        mode: ApiMode,
        fixture: Option<&Path>,
    ) -> Result<Arc<dyn TicketSource>, SourceError> {
        match &self.source_override {
            Some(source) => Ok(Arc::clone(source)),
            None => build_source(config, mode, fixture).map(Arc::from),
        }
    }
}

//! Ticket sources.
//!
//! This module provides a `TicketSource` trait for fetching raw tickets,
//! implemented by the FreshService API client and by a JSON fixture reader
//! used in test mode.

mod error;
mod fixture;
mod freshservice;
mod throttle;

pub use error::SourceError;
pub use fixture::{Department, FixtureFile, FixtureSource};
pub use freshservice::FreshServiceClient;
pub use throttle::Throttle;

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{ApiMode, Config, ConfigError};
use crate::ticket::Ticket;

/// Statuses that still need work from someone.
pub const OPEN_STATUSES: [u32; 9] = [2, 3, 6, 7, 8, 9, 10, 11, 12];

/// Statuses the agent can act on right now (Open, New, Service request triage).
pub const ACTIONABLE_STATUSES: [u32; 3] = [2, 6, 12];

/// Which set of tickets to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TicketScope {
    /// Open tickets assigned to the configured agent.
    Mine,
    /// Actionable tickets assigned to the configured agent.
    #[serde(alias = "mine_focused")]
    MineFocused,
    /// Open tickets assigned to the configured group.
    Group,
    /// Actionable tickets assigned to the configured group.
    #[serde(alias = "group_focused")]
    GroupFocused,
}

impl TicketScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketScope::Mine => "mine",
            TicketScope::MineFocused => "mine-focused",
            TicketScope::Group => "group",
            TicketScope::GroupFocused => "group-focused",
        }
    }

    pub fn is_agent_scope(&self) -> bool {
        matches!(self, TicketScope::Mine | TicketScope::MineFocused)
    }

    pub fn is_group_scope(&self) -> bool {
        matches!(self, TicketScope::Group | TicketScope::GroupFocused)
    }

    /// Status codes the scope matches.
    pub fn statuses(&self) -> &'static [u32] {
        match self {
            TicketScope::Mine | TicketScope::Group => &OPEN_STATUSES,
            TicketScope::MineFocused | TicketScope::GroupFocused => &ACTIONABLE_STATUSES,
        }
    }
}

impl FromStr for TicketScope {
    type Err = ConfigError;

    /// Accepts both the dashed and the underscored spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "-").as_str() {
            "mine" => Ok(TicketScope::Mine),
            "mine-focused" => Ok(TicketScope::MineFocused),
            "group" => Ok(TicketScope::Group),
            "group-focused" => Ok(TicketScope::GroupFocused),
            _ => Err(ConfigError::ValidationError(format!(
                "unknown ticket scope: {:?}",
                s
            ))),
        }
    }
}

/// A supplier of raw tickets.
#[async_trait]
pub trait TicketSource: Send + Sync {
    /// Name of this source, for logs.
    fn name(&self) -> &str;

    /// Fetch the complete ticket list for a scope.
    ///
    /// An absent or malformed list is an error; callers never rank a partial
    /// or missing list.
    async fn fetch_tickets(&self, scope: TicketScope) -> Result<Vec<Ticket>, SourceError>;

    /// Department ID to company name lookup.
    async fn fetch_company_names(&self) -> Result<HashMap<u64, String>, SourceError>;
}

/// Build the ticket source for a mode.
///
/// Test mode reads `fixture`; API modes use the endpoint configured for the
/// mode.
pub fn build_source(
    config: &Config,
    mode: ApiMode,
    fixture: Option<&Path>,
) -> Result<Box<dyn TicketSource>, SourceError> {
    match mode {
        ApiMode::Test => {
            let path = fixture.ok_or_else(|| {
                SourceError::MissingConfig("a fixture file is required in test mode".to_string())
            })?;
            Ok(Box::new(FixtureSource::new(path)))
        }
        ApiMode::Staging | ApiMode::Production => {
            let endpoint = config.freshservice.endpoint(mode).ok_or_else(|| {
                SourceError::MissingConfig(format!("freshservice.{}_endpoint", mode.as_str()))
            })?;
            let client = FreshServiceClient::new(endpoint, &config.freshservice)?;
            Ok(Box::new(client))
        }
    }
}

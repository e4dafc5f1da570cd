//! JSON fixture source for test mode.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::ticket::Ticket;

use super::{SourceError, TicketScope, TicketSource};

/// A department (company) record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub id: u64,
    pub name: String,
}

/// Body of a ticket list response.
///
/// The API and the fixture files share this shape; fixtures may also carry
/// the departments used for company names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub tickets: Option<Vec<Ticket>>,
    #[serde(default)]
    pub departments: Option<Vec<Department>>,
}

pub(crate) type TicketEnvelope = FixtureFile;

impl FixtureFile {
    pub fn parse(body: &str) -> Result<Self, SourceError> {
        serde_json::from_str(body).map_err(|e| SourceError::InvalidPayload(e.to_string()))
    }

    /// Take the ticket list, failing if the body had none.
    pub fn into_tickets(self) -> Result<Vec<Ticket>, SourceError> {
        self.tickets.ok_or(SourceError::MissingTicketList)
    }

    pub fn company_names(&self) -> HashMap<u64, String> {
        self.departments
            .iter()
            .flatten()
            .map(|d| (d.id, d.name.clone()))
            .collect()
    }
}

/// Reads tickets from a local JSON file instead of the API.
///
/// The file is read on every call so edits show up without a restart.
pub struct FixtureSource {
    path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<FixtureFile, SourceError> {
        let body = match tokio::fs::read_to_string(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::FixtureNotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        debug!(path = %self.path.display(), bytes = body.len(), "Read fixture file");
        FixtureFile::parse(&body)
    }
}

#[async_trait]
impl TicketSource for FixtureSource {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn fetch_tickets(&self, scope: TicketScope) -> Result<Vec<Ticket>, SourceError> {
        let tickets = self.load().await?.into_tickets()?;
        info!(
            path = %self.path.display(),
            scope = scope.as_str(),
            count = tickets.len(),
            "Loaded tickets from fixture"
        );
        Ok(tickets)
    }

    async fn fetch_company_names(&self) -> Result<HashMap<u64, String>, SourceError> {
        Ok(self.load().await?.company_names())
    }
}

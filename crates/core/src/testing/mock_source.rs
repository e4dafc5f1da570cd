//! Mock ticket source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::source::{SourceError, TicketScope, TicketSource};
use crate::ticket::Ticket;

/// Mock implementation of the TicketSource trait.
///
/// Returns configured tickets and company names, records the scopes it was
/// asked for, and can be told to fail the next call.
///
/// # Example
///
/// ```rust,ignore
/// let source = MockTicketSource::new();
/// source.set_tickets(vec![fixtures::ticket(1, "A", 4, "Production", "Incident or Problem")]).await;
///
/// let report = run_triage(&source, TicketScope::Mine).await?;
/// assert_eq!(source.recorded_scopes().await, vec![TicketScope::Mine]);
/// ```
#[derive(Debug, Default)]
pub struct MockTicketSource {
    tickets: Arc<RwLock<Vec<Ticket>>>,
    company_names: Arc<RwLock<HashMap<u64, String>>>,
    scopes: Arc<RwLock<Vec<TicketScope>>>,
    /// If set, the next `fetch_tickets` call fails with this error.
    next_error: Arc<RwLock<Option<SourceError>>>,
    /// If set, the next `fetch_company_names` call fails with this error.
    next_names_error: Arc<RwLock<Option<SourceError>>>,
}

impl MockTicketSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tickets returned by subsequent fetches.
    pub async fn set_tickets(&self, tickets: Vec<Ticket>) {
        *self.tickets.write().await = tickets;
    }

    pub async fn set_company_names(&self, names: HashMap<u64, String>) {
        *self.company_names.write().await = names;
    }

    /// Scopes passed to `fetch_tickets`, in call order.
    pub async fn recorded_scopes(&self) -> Vec<TicketScope> {
        self.scopes.read().await.clone()
    }

    /// Configure the next ticket fetch to fail with the given error.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Configure the next company name lookup to fail with the given error.
    pub async fn set_next_names_error(&self, error: SourceError) {
        *self.next_names_error.write().await = Some(error);
    }
}

#[async_trait]
impl TicketSource for MockTicketSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_tickets(&self, scope: TicketScope) -> Result<Vec<Ticket>, SourceError> {
        self.scopes.write().await.push(scope);
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        Ok(self.tickets.read().await.clone())
    }

    async fn fetch_company_names(&self) -> Result<HashMap<u64, String>, SourceError> {
        if let Some(err) = self.next_names_error.write().await.take() {
            return Err(err);
        }
        Ok(self.company_names.read().await.clone())
    }
}

//! End-to-end triage run: fetch, rank, and gather display data.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::render::{render, OutputFormat, RenderError, RenderOptions};
use crate::scoring::{rank, ScoredTicket};
use crate::source::{SourceError, TicketScope, TicketSource};

/// What a run should collect besides the ranked tickets.
#[derive(Debug, Clone, Default)]
pub struct TriageOptions {
    /// Look up company names for the departments on the tickets.
    pub company_names: bool,
}

impl TriageOptions {
    /// Options matching what `format` displays.
    pub fn for_format(format: OutputFormat) -> Self {
        Self {
            company_names: format.needs_company_names(),
        }
    }
}

/// Result of a triage run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TriageReport {
    /// Tickets in ranked order.
    pub tickets: Vec<ScoredTicket>,
    /// Department id to company name; empty when not requested or the
    /// lookup failed.
    pub company_names: HashMap<u64, String>,
}

impl TriageReport {
    pub fn render(
        &self,
        format: OutputFormat,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        render(&self.tickets, &self.company_names, format, options)
    }
}

/// Fetch the tickets for `scope` from `source` and rank them.
///
/// A failed ticket fetch fails the run. A failed company name lookup only
/// degrades the display, so it is logged and the names are left empty.
pub async fn run_triage(
    source: &dyn TicketSource,
    scope: TicketScope,
    options: &TriageOptions,
) -> Result<TriageReport, SourceError> {
    info!(source = source.name(), scope = scope.as_str(), "Starting triage run");

    let tickets = source.fetch_tickets(scope).await?;
    let fetched = tickets.len();
    let tickets = rank(tickets);

    let company_names = if options.company_names {
        match source.fetch_company_names().await {
            Ok(names) => names,
            Err(e) => {
                warn!(error = %e, "Company name lookup failed, names will show as unknown");
                HashMap::new()
            }
        }
    } else {
        HashMap::new()
    };

    info!(count = fetched, "Triage run complete");
    Ok(TriageReport {
        tickets,
        company_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockTicketSource};

    #[tokio::test]
    async fn test_run_ranks_fetched_tickets() {
        let source = MockTicketSource::new();
        source
            .set_tickets(vec![
                fixtures::ticket(1, "E", 1, "Lab", "Service request"),
                fixtures::ticket(2, "A", 4, "Production", "Incident or Problem"),
                fixtures::ticket(3, "C", 3, "Lab", "Service request"),
            ])
            .await;

        let report = run_triage(&source, TicketScope::MineFocused, &TriageOptions::default())
            .await
            .unwrap();

        let ids: Vec<u64> = report.tickets.iter().map(|t| t.ticket.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert!(report.company_names.is_empty());
        assert_eq!(
            source.recorded_scopes().await,
            vec![TicketScope::MineFocused]
        );
    }

    #[tokio::test]
    async fn test_fetch_error_fails_run() {
        let source = MockTicketSource::new();
        source
            .set_next_error(SourceError::Unauthorized {
                url: "https://x".to_string(),
            })
            .await;

        let result = run_triage(&source, TicketScope::Mine, &TriageOptions::default()).await;
        assert!(matches!(result, Err(SourceError::Unauthorized { .. })));
    }

    #[tokio::test]
    async fn test_company_names_fetched_when_requested() {
        let source = MockTicketSource::new();
        source
            .set_company_names(HashMap::from([(1, "Acme".to_string())]))
            .await;

        let report = run_triage(
            &source,
            TicketScope::Group,
            &TriageOptions::for_format(OutputFormat::Table),
        )
        .await
        .unwrap();
        assert_eq!(report.company_names.get(&1).map(String::as_str), Some("Acme"));
    }

    #[tokio::test]
    async fn test_company_name_failure_degrades() {
        let source = MockTicketSource::new();
        source
            .set_tickets(vec![fixtures::ticket(1, "A", 2, "Lab", "Service request")])
            .await;
        source
            .set_next_names_error(SourceError::ApiError("HTTP 500".to_string()))
            .await;

        let report = run_triage(
            &source,
            TicketScope::Group,
            &TriageOptions { company_names: true },
        )
        .await
        .unwrap();

        assert_eq!(report.tickets.len(), 1);
        assert!(report.company_names.is_empty());

        let table = report
            .render(OutputFormat::Table, &RenderOptions::default())
            .unwrap();
        assert!(table.contains("Unknown"));
    }
}

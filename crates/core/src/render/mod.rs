//! Presenters for ranked tickets.
//!
//! Three output formats are supported: a pretty-printed JSON array, an ASCII
//! table and HTML table rows for embedding in a page.

mod html;
mod json;
mod table;

pub use html::{escape as escape_html, render_html};
pub use json::render_json;
pub use table::render_table;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::ScoredTicket;

/// Company name shown when a department has no known name.
pub const UNKNOWN_COMPANY: &str = "Unknown";

const SUBJECT_MAX_CHARS: usize = 50;
const COMPANY_MAX_CHARS: usize = 30;
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Formatting failed: {0}")]
    Format(#[from] fmt::Error),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Html,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
            OutputFormat::Html => "html",
        }
    }

    /// Whether this format shows company names.
    pub fn needs_company_names(&self) -> bool {
        !matches!(self, OutputFormat::Json)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "html" => Ok(OutputFormat::Html),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}

/// Presentation switches.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Add the Score column to the table.
    pub show_score: bool,
    /// Ticket link prefix for HTML; the ticket id is appended after a slash.
    pub portal_url: Option<String>,
}

/// Render ranked tickets in the given format.
pub fn render(
    tickets: &[ScoredTicket],
    company_names: &HashMap<u64, String>,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    match format {
        OutputFormat::Json => render_json(tickets),
        OutputFormat::Table => render_table(tickets, company_names, options),
        OutputFormat::Html => render_html(tickets, company_names, options),
    }
}

/// Display fields shared by the table and HTML presenters.
struct DisplayRow<'a> {
    id: u64,
    department_id: String,
    company_name: String,
    subject: String,
    priority: &'static str,
    status: &'static str,
    is_escalated: bool,
    environment: &'a str,
    account_tier: &'a str,
    ticket_type: &'a str,
    created_at: String,
    score: u8,
}

impl<'a> DisplayRow<'a> {
    fn new(scored: &'a ScoredTicket, company_names: &HashMap<u64, String>) -> Self {
        let ticket = &scored.ticket;
        let fields = &ticket.custom_fields;
        let company = ticket
            .department_id
            .and_then(|id| company_names.get(&id))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COMPANY);

        Self {
            id: ticket.id,
            department_id: ticket
                .department_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            company_name: truncate_chars(company, COMPANY_MAX_CHARS),
            subject: truncate_chars(&ticket.subject, SUBJECT_MAX_CHARS),
            priority: crate::ticket::priority_label(ticket.priority),
            status: crate::ticket::status_label(ticket.status),
            is_escalated: ticket.is_escalated,
            environment: fields.environment.as_deref().unwrap_or_default(),
            account_tier: fields.account_tier.as_deref().unwrap_or_default(),
            ticket_type: fields.ticket_type.as_deref().unwrap_or_default(),
            created_at: ticket.created_at.format(CREATED_AT_FORMAT).to_string(),
            score: scored.score,
        }
    }
}

/// Cut `value` to `max` characters, ending in "..." when shortened.
pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(max.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rank;
    use crate::testing::fixtures;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TABLE".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("html".parse::<OutputFormat>().unwrap(), OutputFormat::Html);
        assert!(matches!(
            "xml".parse::<OutputFormat>(),
            Err(RenderError::UnknownFormat(_))
        ));
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }

    #[test]
    fn test_needs_company_names() {
        assert!(!OutputFormat::Json.needs_company_names());
        assert!(OutputFormat::Table.needs_company_names());
        assert!(OutputFormat::Html.needs_company_names());
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 50), "short");

        let exact = "x".repeat(50);
        assert_eq!(truncate_chars(&exact, 50), exact);

        let long = "y".repeat(51);
        let cut = truncate_chars(&long, 50);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with("..."));
        assert_eq!(&cut[..47], &long[..47]);
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let name = "é".repeat(31);
        let cut = truncate_chars(&name, 30);
        assert_eq!(cut.chars().count(), 30);
        assert!(cut.starts_with("ééé"));
    }

    #[test]
    fn test_display_row_uses_company_lookup() {
        let mut ticket = fixtures::ticket(1, "A", 4, "Production", "Incident or Problem");
        ticket.department_id = Some(9);
        let ranked = rank(vec![ticket]);

        let names = HashMap::from([(9, "Acme".to_string())]);
        let row = DisplayRow::new(&ranked[0], &names);
        assert_eq!(row.company_name, "Acme");
        assert_eq!(row.priority, "Urgent");
        assert_eq!(row.status, "Open");
        assert_eq!(row.created_at, "2024-01-01 00:00:00");

        let row = DisplayRow::new(&ranked[0], &HashMap::new());
        assert_eq!(row.company_name, UNKNOWN_COMPANY);
    }
}

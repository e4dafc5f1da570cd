use std::collections::HashMap;
use std::fmt::Write;

use crate::scoring::ScoredTicket;

use super::{DisplayRow, RenderError, RenderOptions};

const HEADERS: [&str; 12] = [
    "#",
    "Ticket ID",
    "Company Name",
    "Subject",
    "Priority",
    "Status",
    "Escalated",
    "Environment",
    "Tier",
    "Type",
    "Created",
    "Score",
];

/// HTML table rows (header row first) for embedding in a `<table>`.
///
/// Ticket ids link to `{portal_url}/{id}` when a portal URL is configured.
pub fn render_html(
    tickets: &[ScoredTicket],
    company_names: &HashMap<u64, String>,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut out = String::new();

    out.push_str("<tr>\n");
    for header in HEADERS {
        writeln!(out, "    <th>{}</th>", escape(header))?;
    }
    out.push_str("</tr>\n");

    let portal = options
        .portal_url
        .as_deref()
        .map(|url| url.trim_end_matches('/'));

    for (index, scored) in tickets.iter().enumerate() {
        let row = DisplayRow::new(scored, company_names);
        out.push_str("<tr>\n");
        writeln!(out, "    <td>{}</td>", index + 1)?;
        match portal {
            Some(base) => writeln!(
                out,
                "    <td><a href=\"{}/{}\" target=\"_blank\">{}</a></td>",
                escape(base),
                row.id,
                row.id
            )?,
            None => writeln!(out, "    <td>{}</td>", row.id)?,
        }
        for cell in [
            row.company_name.as_str(),
            row.subject.as_str(),
            row.priority,
            row.status,
        ] {
            writeln!(out, "    <td>{}</td>", escape(cell))?;
        }
        writeln!(out, "    <td>{}</td>", row.is_escalated)?;
        for cell in [row.environment, row.account_tier, row.ticket_type] {
            writeln!(out, "    <td>{}</td>", escape(cell))?;
        }
        writeln!(out, "    <td>{}</td>", row.created_at)?;
        writeln!(out, "    <td>{}</td>", row.score)?;
        out.push_str("</tr>\n");
    }

    Ok(out)
}

/// Escape text for HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

use serde_json::Value;

use crate::scoring::ScoredTicket;
use crate::ticket::{priority_label, status_label};

use super::RenderError;

/// Pretty-printed JSON array of the ranked tickets.
///
/// Each element is the upstream ticket with its normalized custom fields,
/// `priority` and `status` replaced by their labels, and `score` added.
pub fn render_json(tickets: &[ScoredTicket]) -> Result<String, RenderError> {
    let values = tickets
        .iter()
        .map(readable_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&values)?)
}

fn readable_value(scored: &ScoredTicket) -> Result<Value, RenderError> {
    let mut value = serde_json::to_value(scored)?;
    if let Value::Object(map) = &mut value {
        map.insert(
            "priority".to_string(),
            Value::from(priority_label(scored.ticket.priority)),
        );
        map.insert(
            "status".to_string(),
            Value::from(status_label(scored.ticket.status)),
        );
    }
    Ok(value)
}

//! Field defaulting and policy key extraction.

use tracing::{debug, warn};

use crate::ticket::{AccountTier, DefaultedField, Environment, Priority, Ticket, TicketType};

use super::policy::PolicyKey;

/// Fill in missing `account_tier` and `environment` with their defaults.
///
/// Returns the fields that were defaulted, in a fixed order. One warning is
/// logged per defaulted field.
pub fn normalize(mut ticket: Ticket) -> (Ticket, Vec<DefaultedField>) {
    let mut defaulted = Vec::new();

    if ticket.custom_fields.account_tier.is_none() {
        ticket.custom_fields.account_tier = Some(AccountTier::DEFAULT.as_str().to_string());
        defaulted.push(DefaultedField::AccountTier);
    }
    if ticket.custom_fields.environment.is_none() {
        ticket.custom_fields.environment = Some(Environment::DEFAULT.as_str().to_string());
        defaulted.push(DefaultedField::Environment);
    }

    for field in &defaulted {
        warn!(
            ticket_id = ticket.id,
            field = field.field_name(),
            default = field.default_value(),
            "Ticket has no {} defined, using default",
            field.field_name()
        );
    }

    (ticket, defaulted)
}

/// Build the policy key for an already normalized ticket.
///
/// Returns `None` when an attribute is missing or not recognized, which ranks
/// the ticket at the bottom.
pub fn policy_key(ticket: &Ticket) -> Option<PolicyKey> {
    let fields = &ticket.custom_fields;

    let tier = parse_field::<AccountTier>(ticket.id, fields.account_tier.as_deref())?;
    let environment = parse_field::<Environment>(ticket.id, fields.environment.as_deref())?;

    if ticket.is_escalated {
        return Some(PolicyKey::escalated(tier, environment));
    }

    let Some(priority) = Priority::from_code(ticket.priority) else {
        debug!(
            ticket_id = ticket.id,
            priority = ticket.priority,
            "Priority outside the ranked range"
        );
        return None;
    };
    let ticket_type = parse_field::<TicketType>(ticket.id, fields.ticket_type.as_deref())?;

    Some(PolicyKey::ranked(tier, priority, environment, ticket_type))
}

fn parse_field<T>(ticket_id: u64, value: Option<&str>) -> Option<T>
where
    T: std::str::FromStr<Err = crate::ticket::UnknownValue>,
{
    match value?.parse() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!(ticket_id, error = %e, "Unrecognized ticket attribute");
            None
        }
    }
}

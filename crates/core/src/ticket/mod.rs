//! Ticket model shared by sources, the scoring engine and presenters.

mod labels;
mod types;

pub use labels::{priority_label, status_label, UNKNOWN_PRIORITY, UNKNOWN_STATUS};
pub use types::{
    AccountTier, CustomFields, DefaultedField, Environment, Priority, Ticket, TicketType,
    UnknownValue,
};

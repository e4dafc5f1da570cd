//! Human-readable labels for upstream status and priority codes.
//!
//! The upstream system may introduce new codes at any time, so unmapped codes
//! get a placeholder label instead of an error.

use super::Priority;

pub const UNKNOWN_STATUS: &str = "Unknown Status";
pub const UNKNOWN_PRIORITY: &str = "Unknown Priority";

/// Label for a ticket status code.
pub fn status_label(code: u32) -> &'static str {
    match code {
        2 => "Open",
        3 => "Pending",
        4 => "Resolved",
        5 => "Closed",
        6 => "New",
        7 => "Pending access",
        8 => "Waiting for RnD",
        9 => "Pending other ticket",
        10 => "Waiting for maintenance",
        11 => "Waiting for bugfix",
        12 => "Service request triage",
        13 => "Rejected",
        14 => "Duplicate",
        _ => UNKNOWN_STATUS,
    }
}

/// Label for a ticket priority code.
pub fn priority_label(code: u32) -> &'static str {
    Priority::from_code(code)
        .map(|p| p.label())
        .unwrap_or(UNKNOWN_PRIORITY)
}

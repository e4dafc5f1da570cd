//! Core ticket data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Ticket
// ============================================================================

/// A helpdesk ticket as delivered by the upstream ticketing system.
///
/// Only the fields the triage pipeline reads are typed; everything else the
/// upstream sends is kept in `extra` so presenters can echo it back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    /// Upstream ticket ID.
    pub id: u64,
    /// Company/department the requester belongs to (display only).
    #[serde(default)]
    pub department_id: Option<u64>,
    /// Free-text subject line.
    #[serde(default)]
    pub subject: String,
    /// Priority code (1 = Low .. 4 = Urgent).
    pub priority: u32,
    /// Status code (2 .. 14).
    pub status: u32,
    /// Whether the ticket has been flagged for expedited handling.
    #[serde(default)]
    pub is_escalated: bool,
    /// Creation instant, used as the ordering tiebreak.
    pub created_at: DateTime<Utc>,
    /// Business attributes stored as upstream custom fields.
    #[serde(default)]
    pub custom_fields: CustomFields,
    /// Upstream fields not interpreted by the pipeline.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Custom fields carrying the triage attributes.
///
/// Values are kept as the raw upstream strings; parsing into
/// [`AccountTier`], [`Environment`] and [`TicketType`] happens at scoring time
/// so an unrecognized value simply leaves the ticket unranked.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomFields {
    #[serde(default)]
    pub account_tier: Option<String>,
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub ticket_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============================================================================
// Scoring attributes
// ============================================================================

/// Error returned when an upstream attribute value is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} value: {:?}", self.field, self.value)
    }
}

impl std::error::Error for UnknownValue {}

/// Customer account classification, A being the most important customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AccountTier {
    A,
    B,
    C,
    D,
    E,
}

impl AccountTier {
    /// Tier assumed when the ticket does not carry one.
    pub const DEFAULT: AccountTier = AccountTier::C;

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTier::A => "A",
            AccountTier::B => "B",
            AccountTier::C => "C",
            AccountTier::D => "D",
            AccountTier::E => "E",
        }
    }
}

impl FromStr for AccountTier {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(AccountTier::A),
            "B" => Ok(AccountTier::B),
            "C" => Ok(AccountTier::C),
            "D" => Ok(AccountTier::D),
            "E" => Ok(AccountTier::E),
            other => Err(UnknownValue {
                field: "account_tier",
                value: other.to_string(),
            }),
        }
    }
}

/// Deployment context of the affected system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Production,
    Lab,
}

impl Environment {
    /// Environment assumed when the ticket does not carry one.
    pub const DEFAULT: Environment = Environment::Production;

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "Production",
            Environment::Lab => "Lab",
        }
    }
}

impl FromStr for Environment {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Production" => Ok(Environment::Production),
            "Lab" => Ok(Environment::Lab),
            other => Err(UnknownValue {
                field: "environment",
                value: other.to_string(),
            }),
        }
    }
}

/// Kind of request a ticket represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketType {
    IncidentOrProblem,
    ServiceRequest,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::IncidentOrProblem => "Incident or Problem",
            TicketType::ServiceRequest => "Service request",
        }
    }
}

impl FromStr for TicketType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Incident or Problem" => Ok(TicketType::IncidentOrProblem),
            "Service request" => Ok(TicketType::ServiceRequest),
            other => Err(UnknownValue {
                field: "ticket_type",
                value: other.to_string(),
            }),
        }
    }
}

/// Upstream priority levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Map an upstream priority code to a level. Codes outside 1-4 have none.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Priority::Low),
            2 => Some(Priority::Medium),
            3 => Some(Priority::High),
            4 => Some(Priority::Urgent),
            _ => None,
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
        }
    }
}

/// A custom field that was missing and received its default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultedField {
    AccountTier,
    Environment,
}

impl DefaultedField {
    pub fn field_name(&self) -> &'static str {
        match self {
            DefaultedField::AccountTier => "account_tier",
            DefaultedField::Environment => "environment",
        }
    }

    pub fn default_value(&self) -> &'static str {
        match self {
            DefaultedField::AccountTier => AccountTier::DEFAULT.as_str(),
            DefaultedField::Environment => Environment::DEFAULT.as_str(),
        }
    }
}

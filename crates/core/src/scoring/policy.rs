//! Static triage policy table.
//!
//! The ordering encoded here is hand-tuned business judgment, not a weighted
//! sum of its inputs: an escalated tier C ticket in Lab outranks a tier A High
//! incident, tier D escalations sit between Medium incidents, and so on. The
//! table is the single source of truth and must not be derived from a formula.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::ticket::AccountTier::{self, A, B, C, D, E};
use crate::ticket::Environment::{self, Lab, Production};
use crate::ticket::Priority::{self, High, Low, Medium, Urgent};
use crate::ticket::TicketType::{self, IncidentOrProblem as Incident, ServiceRequest as Request};

/// Highest score the table assigns.
pub const MAX_SCORE: u8 = 76;

/// Score given to combinations the table does not list.
pub const UNRANKED_SCORE: u8 = 0;

/// Escalation branch of a policy key.
///
/// Escalated tickets are keyed without priority or ticket type; everything
/// else is keyed by both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Urgency {
    Escalated,
    Priority(Priority, TicketType),
}

/// Composite key into the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PolicyKey {
    pub tier: AccountTier,
    pub urgency: Urgency,
    pub environment: Environment,
}

impl PolicyKey {
    pub const fn escalated(tier: AccountTier, environment: Environment) -> Self {
        Self {
            tier,
            urgency: Urgency::Escalated,
            environment,
        }
    }

    pub const fn ranked(
        tier: AccountTier,
        priority: Priority,
        environment: Environment,
        ticket_type: TicketType,
    ) -> Self {
        Self {
            tier,
            urgency: Urgency::Priority(priority, ticket_type),
            environment,
        }
    }
}

const fn esc(tier: AccountTier, environment: Environment) -> PolicyKey {
    PolicyKey::escalated(tier, environment)
}

const fn key(
    tier: AccountTier,
    priority: Priority,
    environment: Environment,
    ticket_type: TicketType,
) -> PolicyKey {
    PolicyKey::ranked(tier, priority, environment, ticket_type)
}

/// Every ranked combination with its score, highest first.
pub const POLICY_TABLE: [(PolicyKey, u8); 76] = [
    (key(A, Urgent, Production, Incident), 76),
    (key(A, Urgent, Lab, Incident), 75),
    (key(B, Urgent, Production, Incident), 74),
    (key(B, Urgent, Lab, Incident), 73),
    (key(C, Urgent, Production, Incident), 72),
    (key(C, Urgent, Lab, Incident), 71),
    (key(D, Urgent, Production, Incident), 70),
    (key(D, Urgent, Lab, Incident), 69),
    (key(E, Urgent, Production, Incident), 68),
    (key(E, Urgent, Lab, Incident), 67),
    (esc(A, Production), 66),
    (esc(A, Lab), 65),
    (esc(B, Production), 64),
    (esc(B, Lab), 63),
    (esc(C, Production), 62),
    (esc(C, Lab), 61),
    (key(A, High, Production, Incident), 60),
    (key(A, High, Lab, Incident), 59),
    (key(B, High, Production, Incident), 58),
    (key(B, High, Lab, Incident), 57),
    (key(C, High, Production, Incident), 56),
    (key(C, High, Lab, Incident), 55),
    (key(A, High, Production, Request), 54),
    (key(A, High, Lab, Request), 53),
    (key(B, High, Production, Request), 52),
    (key(B, High, Lab, Request), 51),
    (key(C, High, Production, Request), 50),
    (key(C, High, Lab, Request), 49),
    (key(D, High, Production, Incident), 48),
    (key(D, High, Lab, Incident), 47),
    (key(E, High, Production, Incident), 46),
    (key(E, High, Lab, Incident), 45),
    (key(A, Medium, Production, Incident), 44),
    (key(A, Medium, Lab, Incident), 43),
    (key(B, Medium, Production, Incident), 42),
    (key(B, Medium, Lab, Incident), 41),
    (esc(D, Production), 40),
    (esc(D, Lab), 39),
    (key(C, Medium, Production, Incident), 38),
    (key(C, Medium, Lab, Incident), 37),
    (key(A, Medium, Production, Request), 36),
    (key(A, Medium, Lab, Request), 35),
    (key(B, Medium, Production, Request), 34),
    (key(B, Medium, Lab, Request), 33),
    (key(C, Medium, Production, Request), 32),
    (key(C, Medium, Lab, Request), 31),
    (esc(E, Production), 30),
    (esc(E, Lab), 29),
    (key(D, Medium, Production, Incident), 28),
    (key(D, Medium, Lab, Incident), 27),
    (key(D, Medium, Production, Request), 26),
    (key(D, Medium, Lab, Request), 25),
    (key(E, Medium, Production, Incident), 24),
    (key(E, Medium, Lab, Incident), 23),
    (key(E, Medium, Production, Request), 22),
    (key(E, Medium, Lab, Request), 21),
    (key(A, Low, Production, Incident), 20),
    (key(A, Low, Lab, Incident), 19),
    (key(B, Low, Production, Incident), 18),
    (key(B, Low, Lab, Incident), 17),
    (key(C, Low, Production, Incident), 16),
    (key(C, Low, Lab, Incident), 15),
    (key(A, Low, Production, Request), 14),
    (key(A, Low, Lab, Request), 13),
    (key(B, Low, Production, Request), 12),
    (key(B, Low, Lab, Request), 11),
    (key(C, Low, Production, Request), 10),
    (key(C, Low, Lab, Request), 9),
    (key(D, Low, Production, Incident), 8),
    (key(D, Low, Lab, Incident), 7),
    (key(D, Low, Production, Request), 6),
    (key(D, Low, Lab, Request), 5),
    (key(E, Low, Production, Incident), 4),
    (key(E, Low, Lab, Incident), 3),
    (key(E, Low, Production, Request), 2),
    (key(E, Low, Lab, Request), 1),
];

static POLICY: Lazy<HashMap<PolicyKey, u8>> = Lazy::new(|| POLICY_TABLE.into_iter().collect());

/// Score for a policy key; combinations missing from the table are unranked.
pub fn resolve_score(key: &PolicyKey) -> u8 {
    POLICY.get(key).copied().unwrap_or(UNRANKED_SCORE)
}

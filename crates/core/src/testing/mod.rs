//! Testing utilities and mock implementations.
//!
//! Provides a mock [`TicketSource`](crate::source::TicketSource) and ticket
//! fixtures so the pipeline, presenters and server can be exercised without a
//! FreshService account.
//!
//! # Example
//!
//! ```rust,ignore
//! use triage_core::testing::{fixtures, MockTicketSource};
//!
//! let source = MockTicketSource::new();
//! source.set_tickets(fixtures::mixed_tickets(10)).await;
//! source.set_company_names([(1, "Acme".to_string())].into()).await;
//! ```

mod mock_source;

pub use mock_source::MockTicketSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{DateTime, Duration, Utc};

    use crate::ticket::{CustomFields, Ticket};

    const DEFAULT_CREATED_AT: &str = "2024-01-01T00:00:00Z";

    /// Create an open, non-escalated ticket with the given scoring attributes.
    pub fn ticket(id: u64, tier: &str, priority: u32, environment: &str, ticket_type: &str) -> Ticket {
        ticket_created(id, tier, priority, environment, ticket_type, DEFAULT_CREATED_AT)
    }

    /// Like [`ticket`], with an explicit RFC 3339 creation time.
    pub fn ticket_created(
        id: u64,
        tier: &str,
        priority: u32,
        environment: &str,
        ticket_type: &str,
        created_at: &str,
    ) -> Ticket {
        Ticket {
            id,
            department_id: Some(id % 3 + 1),
            subject: format!("Ticket {}", id),
            priority,
            status: 2,
            is_escalated: false,
            created_at: parse_instant(created_at),
            custom_fields: CustomFields {
                account_tier: Some(tier.to_string()),
                environment: Some(environment.to_string()),
                ticket_type: Some(ticket_type.to_string()),
                extra: Default::default(),
            },
            extra: Default::default(),
        }
    }

    /// A deterministic, varied batch of tickets.
    ///
    /// Covers every tier plus an unknown one, both environments, escalations,
    /// missing attributes and repeated creation times.
    pub fn mixed_tickets(count: usize) -> Vec<Ticket> {
        const TIERS: [&str; 6] = ["A", "B", "C", "D", "E", "Z"];
        const ENVIRONMENTS: [&str; 2] = ["Production", "Lab"];
        const TYPES: [&str; 2] = ["Incident or Problem", "Service request"];

        let base = parse_instant(DEFAULT_CREATED_AT);

        (0..count)
            .map(|i| {
                let id = i as u64 + 1;
                // Only a few distinct hours so equal scores share timestamps.
                let created_at = base + Duration::hours((i * 7 % 5) as i64);
                let mut t = ticket(
                    id,
                    TIERS[i % TIERS.len()],
                    (i % 4) as u32 + 1,
                    ENVIRONMENTS[i / 3 % ENVIRONMENTS.len()],
                    TYPES[i / 2 % TYPES.len()],
                );
                t.created_at = created_at;
                t.is_escalated = i % 9 == 4;
                if i % 11 == 3 {
                    t.custom_fields.account_tier = None;
                }
                if i % 13 == 5 {
                    t.custom_fields.environment = None;
                }
                t
            })
            .collect()
    }

    fn parse_instant(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|e| panic!("invalid fixture timestamp {:?}: {}", value, e))
    }
}

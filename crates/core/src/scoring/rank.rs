//! Ticket ranking.

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ticket::{DefaultedField, Ticket};

use super::normalize::{normalize, policy_key};
use super::policy::{resolve_score, UNRANKED_SCORE};

/// A normalized ticket decorated with its triage score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredTicket {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub score: u8,
    /// Custom fields that were missing and received a default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted_fields: Vec<DefaultedField>,
}

impl ScoredTicket {
    /// Normalize a ticket and look up its score.
    pub fn from_ticket(ticket: Ticket) -> Self {
        let (ticket, defaulted_fields) = normalize(ticket);
        let score = policy_key(&ticket)
            .map(|key| resolve_score(&key))
            .unwrap_or(UNRANKED_SCORE);

        Self {
            ticket,
            score,
            defaulted_fields,
        }
    }

    /// Composite ordering key: highest score first, then oldest first.
    pub fn sort_key(&self) -> (Reverse<u8>, DateTime<Utc>) {
        (Reverse(self.score), self.ticket.created_at)
    }
}

/// Score every ticket and return them in triage order.
///
/// The result is a permutation of the input. Tickets tying on both score and
/// creation time keep their input order.
pub fn rank(tickets: Vec<Ticket>) -> Vec<ScoredTicket> {
    let mut scored: Vec<ScoredTicket> = tickets.into_iter().map(ScoredTicket::from_ticket).collect();
    sort_scored(&mut scored);

    for t in &scored {
        debug!(
            ticket_id = t.ticket.id,
            score = t.score,
            created_at = %t.ticket.created_at,
            tier = ?t.ticket.custom_fields.account_tier,
            priority = t.ticket.priority,
            is_escalated = t.ticket.is_escalated,
            environment = ?t.ticket.custom_fields.environment,
            ticket_type = ?t.ticket.custom_fields.ticket_type,
            "Ranked ticket"
        );
    }

    scored
}

/// Stable in-place sort of already scored tickets.
pub fn sort_scored(scored: &mut [ScoredTicket]) {
    scored.sort_by_key(ScoredTicket::sort_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn ids(ranked: &[ScoredTicket]) -> Vec<u64> {
        ranked.iter().map(|t| t.ticket.id).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(Vec::new()).is_empty());
    }

    #[test]
    fn test_top_score() {
        let ranked = rank(vec![fixtures::ticket(
            1,
            "A",
            4,
            "Production",
            "Incident or Problem",
        )]);
        assert_eq!(ranked[0].score, 76);
    }

    #[test]
    fn test_lowest_nonzero_score() {
        let ranked = rank(vec![fixtures::ticket(1, "E", 1, "Lab", "Service request")]);
        assert_eq!(ranked[0].score, 1);
    }

    #[test]
    fn test_escalated_ignores_priority_and_type() {
        for (priority, ticket_type) in [
            (1, "Service request"),
            (4, "Incident or Problem"),
            (0, "Unheard of"),
        ] {
            let mut ticket = fixtures::ticket(1, "A", priority, "Lab", ticket_type);
            ticket.is_escalated = true;
            assert_eq!(ScoredTicket::from_ticket(ticket).score, 65);
        }
    }

    #[test]
    fn test_missing_fields_are_defaulted_before_scoring() {
        let mut ticket = fixtures::ticket(5, "A", 2, "Lab", "Incident or Problem");
        ticket.custom_fields.account_tier = None;
        ticket.custom_fields.environment = None;

        let scored = ScoredTicket::from_ticket(ticket);

        assert_eq!(scored.score, 38);
        assert_eq!(scored.ticket.custom_fields.account_tier.as_deref(), Some("C"));
        assert_eq!(
            scored.ticket.custom_fields.environment.as_deref(),
            Some("Production")
        );
        assert_eq!(scored.defaulted_fields.len(), 2);
    }

    #[test]
    fn test_unmapped_combination_scores_zero() {
        let scored = ScoredTicket::from_ticket(fixtures::ticket(
            1,
            "A",
            4,
            "Production",
            "Service request",
        ));
        assert_eq!(scored.score, 0);
    }

    #[test]
    fn test_equal_scores_older_first() {
        let newer = fixtures::ticket_created(
            1,
            "A",
            4,
            "Production",
            "Incident or Problem",
            "2024-01-02T00:00:00Z",
        );
        let older = fixtures::ticket_created(
            2,
            "A",
            4,
            "Production",
            "Incident or Problem",
            "2024-01-01T00:00:00Z",
        );

        let ranked = rank(vec![newer, older]);
        assert_eq!(ids(&ranked), vec![2, 1]);
        assert!(ranked.iter().all(|t| t.score == 76));
    }

    #[test]
    fn test_all_unranked_orders_by_created_at() {
        let tickets = vec![
            fixtures::ticket_created(1, "Z", 1, "Lab", "x", "2024-03-01T00:00:00Z"),
            fixtures::ticket_created(2, "Z", 1, "Lab", "x", "2024-01-01T00:00:00Z"),
            fixtures::ticket_created(3, "Z", 1, "Lab", "x", "2024-02-01T00:00:00Z"),
        ];

        let ranked = rank(tickets);
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
        assert!(ranked.iter().all(|t| t.score == 0));
    }

    #[test]
    fn test_created_at_compared_as_instants() {
        // Same instant written with different offsets must tie.
        let a: Ticket = serde_json::from_value(serde_json::json!({
            "id": 1, "priority": 1, "status": 2,
            "created_at": "2024-01-01T02:00:00+02:00",
            "custom_fields": {"account_tier": "A", "environment": "Lab", "ticket_type": "Service request"}
        }))
        .unwrap();
        let b: Ticket = serde_json::from_value(serde_json::json!({
            "id": 2, "priority": 1, "status": 2,
            "created_at": "2024-01-01T00:30:00Z",
            "custom_fields": {"account_tier": "A", "environment": "Lab", "ticket_type": "Service request"}
        }))
        .unwrap();

        // a is 00:00Z, b is 00:30Z
        let ranked = rank(vec![b, a]);
        assert_eq!(ids(&ranked), vec![1, 2]);
    }

    #[test]
    fn test_stable_for_full_ties() {
        let tickets: Vec<Ticket> = (1..=5)
            .map(|id| fixtures::ticket(id, "B", 3, "Lab", "Incident or Problem"))
            .collect();

        let ranked = rank(tickets);
        assert_eq!(ids(&ranked), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_ordering_properties_over_mixed_input() {
        let tickets = fixtures::mixed_tickets(60);
        let input_len = tickets.len();
        let mut input_ids: Vec<u64> = tickets.iter().map(|t| t.id).collect();

        let ranked = rank(tickets);

        assert_eq!(ranked.len(), input_len);
        let mut output_ids = ids(&ranked);
        input_ids.sort_unstable();
        output_ids.sort_unstable();
        assert_eq!(input_ids, output_ids);

        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                assert!(pair[0].ticket.created_at <= pair[1].ticket.created_at);
            }
        }
    }

    #[test]
    fn test_ranking_is_idempotent() {
        let first = rank(fixtures::mixed_tickets(40));
        let again = rank(first.iter().map(|t| t.ticket.clone()).collect());

        assert_eq!(ids(&first), ids(&again));
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let ticket = fixtures::ticket(1, "C", 3, "Lab", "Service request");
        let first = ScoredTicket::from_ticket(ticket.clone()).score;
        for _ in 0..10 {
            assert_eq!(ScoredTicket::from_ticket(ticket.clone()).score, first);
        }
        assert_eq!(first, 49);
    }

    #[test]
    fn test_serialized_form_carries_score() {
        let mut ticket = fixtures::ticket(3, "A", 4, "Production", "Incident or Problem");
        ticket.custom_fields.environment = None;
        let value = serde_json::to_value(ScoredTicket::from_ticket(ticket)).unwrap();

        assert_eq!(value["id"], 3);
        assert_eq!(value["score"], 76);
        assert_eq!(value["defaulted_fields"], serde_json::json!(["environment"]));
        assert_eq!(value["custom_fields"]["environment"], "Production");
    }
}

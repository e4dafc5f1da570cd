//! Ticket priority scoring and ordering.
//!
//! Scoring is a pure table lookup over a ticket's business attributes;
//! ranking sorts scored tickets by score (descending) and creation time
//! (ascending). Nothing here performs I/O.

mod normalize;
mod policy;
mod rank;

pub use normalize::{normalize, policy_key};
pub use policy::{resolve_score, PolicyKey, Urgency, MAX_SCORE, POLICY_TABLE, UNRANKED_SCORE};
pub use rank::{rank, sort_scored, ScoredTicket};

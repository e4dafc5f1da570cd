//! Error types for ticket sources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching tickets.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The API key was rejected.
    #[error("Unauthorized (HTTP 401) for {url}")]
    Unauthorized { url: String },

    /// The API user is not allowed to make the request, usually because it
    /// has been locked.
    #[error("Forbidden (HTTP 403) for {url}")]
    Forbidden { url: String },

    /// Upstream rate limit exceeded.
    #[error("Too many requests (HTTP 429) for {url}")]
    RateLimited { url: String },

    /// Request kept timing out after all retries.
    #[error("Request timed out after {attempts} attempts: {url}")]
    Timeout { url: String, attempts: u32 },

    /// Could not reach the API.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Any other unsuccessful API response.
    #[error("API error: {0}")]
    ApiError(String),

    /// The response or fixture has no ticket list.
    #[error("Ticket list missing from response")]
    MissingTicketList,

    /// The ticket list could not be decoded.
    #[error("Invalid ticket payload: {0}")]
    InvalidPayload(String),

    /// Test mode fixture does not exist.
    #[error("Fixture file not found: {}", .0.display())]
    FixtureNotFound(PathBuf),

    /// Required configuration is absent.
    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    /// Failed to build the HTTP client.
    #[error("HTTP client error: {0}")]
    Client(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Operator guidance for errors the user can act on.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SourceError::Unauthorized { .. } => Some(
                "The API key was rejected. Copy the key from your FreshService profile \
                 settings and update freshservice.api_key (or TRIAGE_FRESHSERVICE__API_KEY).",
            ),
            SourceError::Forbidden { .. } => Some(
                "FreshService refused the request and may have locked the API user. \
                 Check that the agent the API key belongs to is not locked.",
            ),
            SourceError::RateLimited { .. } => Some(
                "The API rate limit was exceeded. Wait a few minutes, check that the \
                 user is not locked, and try again.",
            ),
            SourceError::FixtureNotFound(_) => {
                Some("Pass an existing JSON file with --file in test mode.")
            }
            _ => None,
        }
    }

    /// Whether the failure came from the upstream service rather than local input.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            SourceError::Unauthorized { .. }
                | SourceError::Forbidden { .. }
                | SourceError::RateLimited { .. }
                | SourceError::Timeout { .. }
                | SourceError::ConnectionFailed(_)
                | SourceError::ApiError(_)
        )
    }
}

//! FreshService API ticket source.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::config::FreshServiceConfig;
use crate::ticket::Ticket;

use super::fixture::{Department, TicketEnvelope};
use super::throttle::Throttle;
use super::{SourceError, TicketScope, TicketSource};

/// Page size requested from list endpoints.
const PER_PAGE: u32 = 100;

/// Upper bound on department pages, in case the upstream never returns an
/// empty page.
const MAX_DEPARTMENT_PAGES: u32 = 50;

/// How many times a timed-out request is retried.
const TIMEOUT_RETRIES: u32 = 2;

/// Pause before retrying a timed-out request.
const RETRY_PAUSE: Duration = Duration::from_secs(2);

const RATE_LIMIT_REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// FreshService REST API client.
pub struct FreshServiceClient {
    client: Client,
    base_url: String,
    api_key: String,
    agent_id: Option<u64>,
    group_id: Option<u64>,
    throttle: Throttle,
    retry_pause: Duration,
}

impl FreshServiceClient {
    /// Create a client for the API rooted at `base_url` (e.g.
    /// "https://acme.freshservice.com/api/v2").
    pub fn new(base_url: &str, config: &FreshServiceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SourceError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            agent_id: config.agent_id,
            group_id: config.group_id,
            throttle: Throttle::new(Duration::from_millis(config.time_wait_ms)),
            retry_pause: RETRY_PAUSE,
        })
    }

    /// Override the pause between timeout retries.
    pub fn with_retry_pause(mut self, pause: Duration) -> Self {
        self.retry_pause = pause;
        self
    }

    /// Build the filter URL for a scope.
    fn tickets_url(&self, scope: TicketScope) -> Result<String, SourceError> {
        let (field, id) = if scope.is_agent_scope() {
            let id = self
                .agent_id
                .ok_or_else(|| SourceError::MissingConfig("freshservice.agent_id".to_string()))?;
            ("agent_id", id)
        } else {
            let id = self
                .group_id
                .ok_or_else(|| SourceError::MissingConfig("freshservice.group_id".to_string()))?;
            ("group_id", id)
        };

        let query = format!("\"{}\"", filter_query(field, id, scope.statuses()));
        Ok(format!(
            "{}/tickets/filter?query={}&per_page={}",
            self.base_url,
            urlencoding::encode(&query),
            PER_PAGE
        ))
    }

    /// GET with pacing, timeout retries and status mapping.
    async fn get(&self, url: &str) -> Result<Response, SourceError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            self.throttle.wait_turn().await;
            debug!(url, attempt, "FreshService request");

            let result = self
                .client
                .get(url)
                .basic_auth(&self.api_key, Some("X"))
                .header(CONTENT_TYPE, "application/json")
                .send()
                .await;

            match result {
                Ok(response) => return self.check_response(url, response).await,
                Err(e) if e.is_timeout() && attempt <= TIMEOUT_RETRIES => {
                    warn!(url, attempt, "Request timed out, retrying");
                    tokio::time::sleep(self.retry_pause).await;
                }
                Err(e) if e.is_timeout() => {
                    error!(url, attempts = attempt, "Request timed out");
                    return Err(SourceError::Timeout {
                        url: url.to_string(),
                        attempts: attempt,
                    });
                }
                Err(e) if e.is_connect() => {
                    error!(url, error = %e, "API request failed");
                    return Err(SourceError::ConnectionFailed(e.to_string()));
                }
                Err(e) => {
                    error!(url, error = %e, "API request failed");
                    return Err(SourceError::ApiError(e.to_string()));
                }
            }
        }
    }

    async fn check_response(&self, url: &str, response: Response) -> Result<Response, SourceError> {
        let remaining = response
            .headers()
            .get(RATE_LIMIT_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());
        self.throttle.observe_remaining(remaining).await;

        let status = response.status();
        let url = url.to_string();
        match status {
            StatusCode::UNAUTHORIZED => {
                error!(url = %url, "401 Unauthorized");
                Err(SourceError::Unauthorized { url })
            }
            StatusCode::FORBIDDEN => {
                error!(url = %url, "403 Forbidden");
                Err(SourceError::Forbidden { url })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                error!(url = %url, "429 Too Many Requests");
                Err(SourceError::RateLimited { url })
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                error!(url = %url, status = %s, "API request failed");
                Err(SourceError::ApiError(format!(
                    "HTTP {}: {}",
                    s,
                    body.chars().take(200).collect::<String>()
                )))
            }
            _ => Ok(response),
        }
    }
}

#[async_trait]
impl TicketSource for FreshServiceClient {
    fn name(&self) -> &str {
        "freshservice"
    }

    async fn fetch_tickets(&self, scope: TicketScope) -> Result<Vec<Ticket>, SourceError> {
        let url = self.tickets_url(scope)?;
        let response = self.get(&url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| SourceError::InvalidPayload(e.to_string()))?;

        let tickets = TicketEnvelope::parse(&body)?.into_tickets()?;
        info!(scope = scope.as_str(), count = tickets.len(), "Fetched tickets");
        Ok(tickets)
    }

    async fn fetch_company_names(&self) -> Result<HashMap<u64, String>, SourceError> {
        let mut companies = HashMap::new();

        let mut exhausted = false;
        for page in 1..=MAX_DEPARTMENT_PAGES {
            let url = format!(
                "{}/departments?per_page={}&page={}",
                self.base_url, PER_PAGE, page
            );
            let response = self.get(&url).await?;
            let body: DepartmentsPage = response
                .json()
                .await
                .map_err(|e| SourceError::InvalidPayload(e.to_string()))?;

            let departments = body.departments.unwrap_or_default();
            if departments.is_empty() {
                exhausted = true;
                break;
            }
            companies.extend(departments.into_iter().map(|d| (d.id, d.name)));
        }

        if !exhausted {
            warn!(
                pages = MAX_DEPARTMENT_PAGES,
                count = companies.len(),
                "Department page limit reached, remaining company names not fetched"
            );
        }

        debug!(count = companies.len(), "Fetched company names");
        Ok(companies)
    }
}

/// Filter expression matching `field: id` tickets in any of `statuses`.
///
/// Every status clause repeats the owner condition since the filter language
/// gives AND and OR equal precedence.
fn filter_query(field: &str, id: u64, statuses: &[u32]) -> String {
    statuses
        .iter()
        .map(|status| format!("{}: {} AND status: {}", field, id, status))
        .collect::<Vec<_>>()
        .join(" OR ")
}

#[derive(Debug, Deserialize)]
struct DepartmentsPage {
    #[serde(default)]
    departments: Option<Vec<Department>>,
}

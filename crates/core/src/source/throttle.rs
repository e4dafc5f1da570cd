//! Request pacing for the FreshService API.
//!
//! Consecutive requests are spaced by a configured wait. The upstream reports
//! how many calls remain in the current window; when that runs low the wait
//! is raised until the budget recovers.

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::{info, warn};

/// Remaining-call count at or below which requests are slowed down.
pub const LOW_REMAINING_THRESHOLD: u32 = 40;

/// Minimum wait between requests while the budget is low.
pub const SLOW_WAIT: Duration = Duration::from_millis(1000);

#[derive(Debug)]
struct ThrottleState {
    wait: Duration,
    last_request: Option<Instant>,
}

/// Per-client request pacer.
#[derive(Debug)]
pub struct Throttle {
    base_wait: Duration,
    state: Mutex<ThrottleState>,
}

impl Throttle {
    pub fn new(base_wait: Duration) -> Self {
        Self {
            base_wait,
            state: Mutex::new(ThrottleState {
                wait: base_wait,
                last_request: None,
            }),
        }
    }

    /// Wait until the next request may be sent and claim the slot.
    ///
    /// The first request goes out immediately.
    pub async fn wait_turn(&self) {
        let deadline = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            let deadline = state
                .last_request
                .map(|last| last + state.wait)
                .filter(|deadline| *deadline > now);
            state.last_request = Some(deadline.unwrap_or(now));
            deadline
        };

        if let Some(deadline) = deadline {
            tokio::time::sleep_until(deadline).await;
        }
    }

    /// Adjust the wait from the upstream's remaining-calls header.
    ///
    /// Responses without the header leave the wait unchanged.
    pub async fn observe_remaining(&self, remaining: Option<u32>) {
        let Some(remaining) = remaining else {
            return;
        };

        let mut state = self.state.lock().await;
        if remaining <= LOW_REMAINING_THRESHOLD {
            let slowed = self.base_wait.max(SLOW_WAIT);
            if state.wait != slowed {
                warn!(
                    remaining,
                    wait_ms = slowed.as_millis() as u64,
                    "Slowing down API requests due to low remaining calls"
                );
                state.wait = slowed;
            }
        } else if state.wait != self.base_wait {
            info!(
                remaining,
                wait_ms = self.base_wait.as_millis() as u64,
                "Returning API wait to its configured value"
            );
            state.wait = self.base_wait;
        }
    }

    /// Current wait between requests.
    pub async fn current_wait(&self) -> Duration {
        self.state.lock().await.wait
    }
}

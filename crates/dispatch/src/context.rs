//! Deadline-bearing execution context for synchronous calls.

use std::time::{Duration, Instant};

/// Deadline applied when neither the caller nor the request supplies one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// Deadline used when `now + timeout` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Execution context handed to [`crate::Dispatcher::call`].
///
/// The deadline is the only cancellation channel: cores are expected to stop
/// working on a request once [`Context::remaining`] reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Context {
    timeout: Duration,
    deadline: Instant,
}

impl Context {
    /// Creates a context whose deadline is `timeout` from now.
    ///
    /// Timeouts too large to add to the current instant are clamped to a
    /// deadline roughly thirty years out.
    pub fn with_timeout(timeout: Duration) -> Self {
        let now = Instant::now();
        let deadline = now
            .checked_add(timeout)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self { timeout, deadline }
    }

    /// The timeout this context was created with.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The instant after which the request should be abandoned.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline; zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }
}

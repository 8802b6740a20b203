//! Retry policy for transient failures.
//!
//! A request is retried when the send itself failed (DNS, connect, timeout),
//! or when the API answered 429 or any 5xx. The wait between attempts is a
//! fixed duration; a 429 carrying an integer `Retry-After` waits exactly that
//! many seconds instead. There is no exponential growth.

use std::time::Duration;

/// Parses a `Retry-After` header value given as whole seconds.
///
/// HTTP-date values and fractional seconds are not honored.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use onfido::clients::parse_retry_after;
///
/// assert_eq!(parse_retry_after(" 3 "), Some(Duration::from_secs(3)));
/// assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
/// ```
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Outcome of a single send attempt, as seen by the retry policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// The server answered.
    Response {
        /// The HTTP status code.
        code: u16,
        /// The parsed `Retry-After` header, if any.
        retry_after: Option<Duration>,
    },
    /// The send failed with no response.
    TransportError,
}

/// What to do after an attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Return the outcome to the caller as-is.
    Stop,
    /// Wait for the duration, then send again.
    RetryAfter(Duration),
}

/// Returns `true` for statuses that warrant another attempt.
#[must_use]
pub const fn is_retryable_status(code: u16) -> bool {
    code == 429 || code >= 500
}

/// Fixed-wait retry policy with a bounded budget.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use onfido::clients::{AttemptOutcome, RetryDecision, RetryPolicy};
///
/// let policy = RetryPolicy::new(2, Duration::from_secs(1));
/// let rate_limited = AttemptOutcome::Response {
///     code: 429,
///     retry_after: Some(Duration::from_secs(3)),
/// };
///
/// assert_eq!(
///     policy.decide(0, rate_limited),
///     RetryDecision::RetryAfter(Duration::from_secs(3))
/// );
/// assert_eq!(policy.decide(2, rate_limited), RetryDecision::Stop);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    retries: u32,
    wait: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `retries` additional attempts after the first.
    #[must_use]
    pub const fn new(retries: u32, wait: Duration) -> Self {
        Self { retries, wait }
    }

    /// Returns the retry budget.
    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Returns the fixed wait between attempts.
    #[must_use]
    pub const fn wait(&self) -> Duration {
        self.wait
    }

    /// Decides whether attempt number `attempt` (0 is the first send) should
    /// be followed by another one.
    #[must_use]
    pub fn decide(&self, attempt: u32, outcome: AttemptOutcome) -> RetryDecision {
        if attempt >= self.retries {
            return RetryDecision::Stop;
        }

        match outcome {
            AttemptOutcome::TransportError => RetryDecision::RetryAfter(self.wait),
            AttemptOutcome::Response { code, retry_after } if is_retryable_status(code) => {
                match (code, retry_after) {
                    (429, Some(after)) => RetryDecision::RetryAfter(after),
                    _ => RetryDecision::RetryAfter(self.wait),
                }
            }
            AttemptOutcome::Response { .. } => RetryDecision::Stop,
        }
    }
}

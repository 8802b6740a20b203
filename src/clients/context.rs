//! Cancellation and deadline context for client operations.
//!
//! Every operation takes a [`Context`]. The transport checks it before each
//! attempt and races both the send and the retry wait against it.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::clients::errors::HttpError;

/// Cancellation signal and optional deadline for an operation.
///
/// Contexts are cheap to clone; clones share the same cancellation token.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use onfido::Context;
///
/// let ctx = Context::background().with_timeout(Duration::from_secs(10));
/// assert!(!ctx.is_done());
///
/// ctx.cancel();
/// assert!(ctx.is_done());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// Returns a context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Returns a child context that additionally expires after `timeout`.
    ///
    /// Cancelling the parent cancels the child; cancelling the child leaves
    /// the parent untouched. A timeout too large to represent as an instant
    /// adds no deadline.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => Self {
                token: self.token.child_token(),
                deadline: self.deadline,
            },
        }
    }

    /// Returns a child context that additionally expires at `deadline`.
    ///
    /// The earlier of the parent's and the new deadline applies.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = self.deadline.map_or(deadline, |d| d.min(deadline));
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Returns a context driven by an existing cancellation token.
    #[must_use]
    pub const fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Cancels this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns the underlying cancellation token.
    #[must_use]
    pub const fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns `true` once cancelled or past the deadline.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Returns the reason this context is done, if it is.
    #[must_use]
    pub fn err(&self) -> Option<HttpError> {
        if self.token.is_cancelled() {
            return Some(HttpError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(HttpError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Fails with the context error if the context is done.
    pub(crate) fn check(&self) -> Result<(), HttpError> {
        self.err().map_or(Ok(()), Err)
    }

    /// Resolves once the context is cancelled or its deadline passes.
    async fn done(&self) -> HttpError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.token.cancelled() => HttpError::Cancelled,
                    () = tokio::time::sleep_until(deadline) => HttpError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                HttpError::Cancelled
            }
        }
    }

    /// Runs `future` unless the context finishes first.
    pub(crate) async fn run<F: Future>(&self, future: F) -> Result<F::Output, HttpError> {
        tokio::select! {
            biased;
            err = self.done() => Err(err),
            output = future => Ok(output),
        }
    }

    /// Sleeps for `duration` unless the context finishes first.
    pub(crate) async fn sleep(&self, duration: Duration) -> Result<(), HttpError> {
        self.run(tokio::time::sleep(duration)).await
    }
}

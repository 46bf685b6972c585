//! Per-call execution context.
//!
//! Every storage round-trip runs under a [`Ctx`]. A context either has no
//! deadline ([`Ctx::background`]) or carries an absolute deadline after which
//! the in-flight future is dropped and [`DeadlineExceeded`] is returned.
//! Callers cancel outright by dropping the future they are awaiting.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Returned when a call does not finish before its context deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("context deadline exceeded")]
pub struct DeadlineExceeded;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ctx {
    deadline: Option<Instant>,
}

impl Ctx {
    /// A context that never expires.
    pub fn background() -> Self {
        Self { deadline: None }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether the deadline has already passed.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| d <= Instant::now())
    }

    /// Drive `fut` to completion unless the deadline passes first.
    ///
    /// An expired context fails without polling `fut` at all.
    pub async fn run<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        match self.deadline {
            None => Ok(fut.await),
            Some(_) if self.is_expired() => Err(DeadlineExceeded),
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
        }
    }
}

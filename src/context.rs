//! Deadline and cancellation scope handed to lifecycle operations.
//!
//! A [`Context`] is cheap to clone; clones share the same deadline and the same
//! cancellation token. Cancelling any clone cancels them all.

use crate::error::{FlowRunError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct Context {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl Context {
    /// A context that never expires on its own
    pub fn background() -> Self {
        Self {
            deadline: None,
            token: CancellationToken::new(),
        }
    }

    /// A context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            token: CancellationToken::new(),
        }
    }

    /// Derive a context that is cancelled with this one but can also be
    /// cancelled on its own. The earlier of the two deadlines wins.
    pub fn child(&self, timeout: Option<Duration>) -> Self {
        let deadline = match (self.deadline, timeout.map(|t| Instant::now() + t)) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };

        Self {
            deadline,
            token: self.token.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, `None` when there is no deadline
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline
            .map(|deadline| Instant::now() >= deadline)
            .unwrap_or(false)
    }

    /// The error an operation under this context should fail with, if the
    /// context is already done.
    pub fn err(&self, operation: &str) -> Option<FlowRunError> {
        if self.is_cancelled() {
            Some(FlowRunError::Cancelled {
                operation: operation.to_string(),
            })
        } else if self.is_expired() {
            Some(FlowRunError::Timeout {
                operation: operation.to_string(),
            })
        } else {
            None
        }
    }

    /// Resolves once the context is cancelled or its deadline passes
    pub async fn done(&self) {
        tokio::select! {
            _ = self.token.cancelled() => {}
            _ = wait_for(self.deadline) => {}
        }
    }

    /// Drive `future` until it completes or the context ends.
    ///
    /// The future is always polled before the deadline is checked, so work
    /// that is already complete is never reported as timed out.
    pub async fn run<T, F>(&self, operation: &str, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            result = future => result,
            _ = self.token.cancelled() => Err(FlowRunError::Cancelled {
                operation: operation.to_string(),
            }),
            _ = wait_for(self.deadline) => Err(FlowRunError::Timeout {
                operation: operation.to_string(),
            }),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

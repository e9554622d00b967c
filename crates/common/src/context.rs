//! Request-scoped cancellation and deadlines.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Reasons a context stops an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The cancellation token was triggered.
    #[error("operation cancelled")]
    Cancelled,

    /// The deadline passed before the operation finished.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation signal and deadline threaded through a single request.
///
/// Cloning shares the same token; use [`Context::child`] to derive a context
/// that can be cancelled independently of its parent.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// Creates a context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context driven by an existing cancellation token.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Sets a deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Sets an absolute deadline. An earlier existing deadline wins.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) if current < deadline => current,
            _ => deadline,
        });
        self
    }

    /// Derives a context cancelled whenever this one is, keeping the deadline.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Returns the underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns true once the token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Fails if the context is cancelled or past its deadline.
    pub fn check(&self) -> Result<(), ContextError> {
        if self.token.is_cancelled() {
            return Err(ContextError::Cancelled);
        }
        if let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            return Err(ContextError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drives `fut` to completion unless the context stops first.
    ///
    /// When the context wins, `fut` is dropped without being polled again.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, ContextError> {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(ContextError::Cancelled),
            () = deadline => Err(ContextError::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

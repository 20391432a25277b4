//! Per-call cancellation and deadline.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::domain::foundation::SdkError;

/// Caller-supplied signal that bounds an outbound operation.
///
/// Cloning shares the cancellation token, so cancelling any clone (or the
/// token it was built from) aborts every call using it.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that never cancels on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context driven by an existing cancellation token.
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels every call sharing this context.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns the abort error if the context is already done.
    pub fn check(&self) -> Result<(), SdkError> {
        if self.cancel.is_cancelled() {
            return Err(Self::cancelled_error());
        }
        if matches!(self.deadline, Some(d) if Instant::now() >= d) {
            return Err(Self::deadline_error());
        }
        Ok(())
    }

    /// Resolves with the abort error once the context is cancelled or its
    /// deadline passes. Never resolves for a context with neither.
    pub async fn done(&self) -> SdkError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => Self::cancelled_error(),
                    _ = tokio::time::sleep_until(deadline) => Self::deadline_error(),
                }
            }
            None => {
                self.cancel.cancelled().await;
                Self::cancelled_error()
            }
        }
    }

    fn cancelled_error() -> SdkError {
        SdkError::timeout("context cancelled")
    }

    fn deadline_error() -> SdkError {
        SdkError::timeout("deadline exceeded")
    }
}

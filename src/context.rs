//! Cancellation and deadline scope for API calls.
//!
//! A [`Context`] bounds the in-flight part of a request. Once it is
//! cancelled or its deadline passes, a pending call is aborted and returns
//! the context's error instead of whatever the transport reported.

use futures_util::future::select_all;
use std::future::pending;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// Reason a context finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellable execution scope with an optional deadline
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// One receiver per cancel scope in the ancestry
    cancel: Vec<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels the context returned alongside it by [`Context::with_cancel`]
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel the associated context and every context derived from it
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Context::default()
    }

    /// Derive a context that is cancelled by the returned handle or by any ancestor
    pub fn with_cancel(&self) -> (Context, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let mut child = self.clone();
        child.cancel.push(rx);
        (child, CancelHandle { tx })
    }

    /// Derive a context that expires after `timeout`
    pub fn with_timeout(&self, timeout: Duration) -> Context {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Derive a context that expires at `deadline`, or earlier if the parent does
    pub fn with_deadline(&self, deadline: Instant) -> Context {
        let mut child = self.clone();
        child.deadline = Some(match self.deadline {
            Some(parent) => parent.min(deadline),
            None => deadline,
        });
        child
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is done, or `None` while it is still live
    pub fn err(&self) -> Option<ContextError> {
        if self.cancel.iter().any(|rx| *rx.borrow()) {
            return Some(ContextError::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Wait until the context is cancelled or expires
    pub async fn done(&self) -> ContextError {
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancelled() => ContextError::Canceled,
            _ = expired => ContextError::DeadlineExceeded,
        }
    }

    async fn cancelled(&self) {
        if self.cancel.is_empty() {
            return pending().await;
        }

        let waits = self.cancel.iter().cloned().map(|mut rx| {
            Box::pin(async move {
                // A dropped handle can no longer cancel; park instead of resolving.
                let fired = rx.wait_for(|cancelled| *cancelled).await.is_ok();
                if !fired {
                    pending::<()>().await;
                }
            })
        });
        select_all(waits).await;
    }
}

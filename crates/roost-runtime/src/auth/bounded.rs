//! Timeout- and panic-bounded collaborator calls.
//!
//! Session providers and oracles are host code. A call into them runs on
//! its own task so that a panic surfaces as a [`JoinError`] instead of
//! unwinding through the decision, and it is raced against a deadline.
//! The task is aborted when the deadline passes or the caller goes away.
//!
//! [`JoinError`]: tokio::task::JoinError

use std::future::Future;
use std::time::Duration;
use tokio::task::AbortHandle;

/// Why a bounded call produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Interrupted {
    TimedOut,
    Panicked,
    Cancelled,
}

impl Interrupted {
    pub(crate) fn reason(&self) -> &'static str {
        match self {
            Self::TimedOut => "timed out",
            Self::Panicked => "panicked",
            Self::Cancelled => "cancelled",
        }
    }
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Runs `fut` on a separate task, bounded by `limit`.
///
/// Must be called from within a Tokio runtime.
pub(crate) async fn run_bounded<F, T>(limit: Duration, fut: F) -> Result<T, Interrupted>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handle = tokio::spawn(fut);
    let _guard = AbortOnDrop(handle.abort_handle());

    match tokio::time::timeout(limit, handle).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) if e.is_panic() => Err(Interrupted::Panicked),
        Ok(Err(_)) => Err(Interrupted::Cancelled),
        Err(_) => Err(Interrupted::TimedOut),
    }
}

//! Cancellation of in-flight listener and sender runs.
//!
//! A [`CancelHandle`] fires a [`CancelCause`] at most once; every
//! [`CancelSignal`] subscribed to it observes the same cause. [`supervise`]
//! races a worker task against a signal and tears the worker down when the
//! signal wins, so the socket owned by the worker is closed before the caller
//! sees the cancellation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::TransportError;

/// Why a run was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelCause {
    /// Explicit call to [`CancelHandle::cancel`].
    Requested,
    /// Process interrupt (Ctrl-C).
    Interrupted,
    /// An overall run deadline passed.
    DeadlineExceeded,
}

impl fmt::Display for CancelCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CancelCause::Requested => "cancelled",
            CancelCause::Interrupted => "interrupted",
            CancelCause::DeadlineExceeded => "deadline exceeded",
        };
        f.write_str(text)
    }
}

/// Result of a supervised run that is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Cancelled(CancelCause),
}

impl<T> Outcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Outcome::Cancelled(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Cancelled(_) => None,
        }
    }

    pub fn cause(&self) -> Option<CancelCause> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Cancelled(cause) => Some(*cause),
        }
    }
}

/// Create a connected handle and signal.
pub fn cancellation() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = watch::channel(None);
    (CancelHandle { tx: Arc::new(tx) }, CancelSignal { rx })
}

/// Triggering side of a cancellation. Cheap to clone.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<Option<CancelCause>>>,
}

impl CancelHandle {
    /// Fire the signal. Returns `false` if it had already fired; the first
    /// cause is kept.
    pub fn cancel(&self, cause: CancelCause) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(cause);
            true
        })
    }

    /// Fire [`CancelCause::DeadlineExceeded`] once `after` has elapsed.
    ///
    /// Aborting the returned task disarms the timer.
    pub fn cancel_after(&self, after: Duration) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if handle.cancel(CancelCause::DeadlineExceeded) {
                debug!(?after, "run deadline elapsed");
            }
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.tx.borrow().is_some()
    }
}

/// Observing side of a cancellation.
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<Option<CancelCause>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        let (_, rx) = watch::channel(None);
        Self { rx }
    }

    pub fn cause(&self) -> Option<CancelCause> {
        *self.rx.borrow()
    }

    /// Wait until the signal fires.
    ///
    /// Pends forever if every handle is dropped without firing.
    pub async fn cancelled(&mut self) -> CancelCause {
        loop {
            if let Some(cause) = *self.rx.borrow_and_update() {
                return cause;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Race `worker` against `signal`.
///
/// A signal that has already fired wins even if the worker is also ready. On
/// cancellation the worker is aborted and awaited, which drops everything it
/// owns before this returns.
///
/// # Errors
///
/// The worker's own error, or [`TransportError::Worker`] if it panicked.
pub async fn supervise<T>(
    signal: &mut CancelSignal,
    mut worker: JoinHandle<Result<T, TransportError>>,
) -> Result<Outcome<T>, TransportError>
where
    T: Send + 'static,
{
    tokio::select! {
        biased;

        cause = signal.cancelled() => {
            worker.abort();
            match worker.await {
                Err(join_err) if join_err.is_panic() => {
                    warn!(error = %join_err, "worker panicked during cancellation");
                }
                Ok(Err(err)) => {
                    debug!(error = %err, "worker failed while cancellation was pending");
                }
                _ => {}
            }
            debug!(%cause, "run cancelled");
            Ok(Outcome::Cancelled(cause))
        }

        joined = &mut worker => match joined {
            Ok(result) => result.map(Outcome::Completed),
            Err(join_err) => Err(TransportError::Worker(join_err.to_string())),
        },
    }
}

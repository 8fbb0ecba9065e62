//! Absolute deadlines for socket operations.
//!
//! tokio sockets have no per-socket timeout setting, so a deadline is an
//! absolute instant that individual operations are raced against.

use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::time::Instant;

use crate::error::{Operation, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// A deadline `budget` from now.
    ///
    /// # Errors
    ///
    /// [`TransportError::Io`] if the instant cannot be represented.
    pub fn after(budget: Duration, operation: Operation) -> Result<Self, TransportError> {
        Instant::now()
            .checked_add(budget)
            .map(|at| Self { at, budget })
            .ok_or_else(|| TransportError::Io {
                operation,
                bytes_written: 0,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("cannot set a deadline {budget:?} from now"),
                ),
            })
    }

    /// Drive `fut` until it finishes or the deadline passes.
    ///
    /// # Errors
    ///
    /// [`TransportError::Timeout`] on expiry, [`TransportError::Io`] if `fut`
    /// itself fails.
    pub async fn run<T, F>(
        &self,
        operation: Operation,
        bytes_written: u64,
        fut: F,
    ) -> Result<T, TransportError>
    where
        F: Future<Output = io::Result<T>>,
    {
        match tokio::time::timeout_at(self.at, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(source)) => Err(TransportError::Io {
                operation,
                bytes_written,
                source,
            }),
            Err(_) => Err(TransportError::Timeout {
                operation,
                deadline: self.budget,
            }),
        }
    }
}

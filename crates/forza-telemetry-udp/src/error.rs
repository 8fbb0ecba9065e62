//! Error types for the UDP transport.

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

/// The I/O step an error or deadline applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Bind,
    Resolve,
    Connect,
    /// Waiting for an inbound datagram.
    Receive,
    /// Sending an outbound datagram.
    Send,
    /// Reflecting a datagram back to its sender.
    Reply,
    /// Reading the caller-supplied byte source.
    ReadSource,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Bind => "bind",
            Operation::Resolve => "resolve",
            Operation::Connect => "connect",
            Operation::Receive => "receive",
            Operation::Send => "send",
            Operation::Reply => "reply",
            Operation::ReadSource => "source read",
        };
        f.write_str(name)
    }
}

/// Terminal failures of a listener or sender.
///
/// Decode failures never appear here; the listener recovers from them
/// locally. Cancellation is not an error either, see [`crate::Outcome`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind UDP endpoint {endpoint}: {source}")]
    Bind { endpoint: String, source: io::Error },

    #[error("failed to resolve {endpoint}: {source}")]
    Resolve { endpoint: String, source: io::Error },

    #[error("failed to connect to {endpoint}: {source}")]
    Connect { endpoint: String, source: io::Error },

    #[error("{operation} failed after {bytes_written} bytes: {source}")]
    Io {
        operation: Operation,
        bytes_written: u64,
        source: io::Error,
    },

    #[error("{operation} deadline of {deadline:?} exceeded")]
    Timeout {
        operation: Operation,
        deadline: Duration,
    },

    /// The worker task panicked or was torn down by the runtime.
    #[error("transport worker failed: {0}")]
    Worker(String),
}

impl TransportError {
    /// Bind, resolve and connect failures happen before any traffic flows.
    pub fn is_initialization(&self) -> bool {
        matches!(
            self,
            TransportError::Bind { .. }
                | TransportError::Resolve { .. }
                | TransportError::Connect { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    pub fn operation(&self) -> Option<Operation> {
        match self {
            TransportError::Bind { .. } => Some(Operation::Bind),
            TransportError::Resolve { .. } => Some(Operation::Resolve),
            TransportError::Connect { .. } => Some(Operation::Connect),
            TransportError::Io { operation, .. } | TransportError::Timeout { operation, .. } => {
                Some(*operation)
            }
            TransportError::Worker(_) => None,
        }
    }

    /// Bytes successfully written before the failure, when known.
    pub fn bytes_written(&self) -> Option<u64> {
        match self {
            TransportError::Io { bytes_written, .. } => Some(*bytes_written),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let bind = TransportError::Bind {
            endpoint: "127.0.0.1:5607".to_string(),
            source: io::Error::from(io::ErrorKind::AddrInUse),
        };
        assert!(bind.is_initialization());
        assert!(!bind.is_timeout());
        assert_eq!(bind.operation(), Some(Operation::Bind));

        let timeout = TransportError::Timeout {
            operation: Operation::Receive,
            deadline: Duration::from_secs(15),
        };
        assert!(timeout.is_timeout());
        assert!(!timeout.is_initialization());
        assert_eq!(timeout.bytes_written(), None);
    }

    #[test]
    fn io_error_carries_progress() {
        let err = TransportError::Io {
            operation: Operation::Send,
            bytes_written: 2048,
            source: io::Error::from(io::ErrorKind::ConnectionRefused),
        };
        assert_eq!(err.bytes_written(), Some(2048));
        assert!(err.to_string().starts_with("send failed after 2048 bytes"));
    }

    #[test]
    fn timeout_message_names_deadline() {
        let err = TransportError::Timeout {
            operation: Operation::Receive,
            deadline: Duration::from_millis(200),
        };
        assert_eq!(err.to_string(), "receive deadline of 200ms exceeded");
    }
}

//! UDP transport for Forza Horizon 5 "Data Out" telemetry.
//!
//! - [`Listener`] binds an endpoint and decodes each datagram with
//!   [`forza_telemetry_protocol::decode`].
//! - [`Sender`] streams a byte source to a remote endpoint and waits for a
//!   reply.
//! - [`cancellation`] creates the handle/signal pair both of them observe.
//!
//! ```no_run
//! use forza_telemetry_udp::{CancelCause, ListenerConfig, cancellation, listen};
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), forza_telemetry_udp::TransportError> {
//! let (handle, signal) = cancellation();
//! let (tx, mut rx) = mpsc::channel(64);
//! let task = tokio::spawn(listen(ListenerConfig::default(), Some(tx), signal));
//!
//! while let Some(event) = rx.recv().await {
//!     if let Some(frame) = event.frame() {
//!         println!("rpm {}", frame.engine.current_rpm);
//!         handle.cancel(CancelCause::Requested);
//!     }
//! }
//! # let _ = task.await;
//! # Ok(())
//! # }
//! ```

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

pub mod cancel;
pub mod config;
pub mod deadline;
pub mod error;
pub mod listener;
pub mod sender;

pub use forza_telemetry_protocol as protocol;

pub use cancel::{CancelCause, CancelHandle, CancelSignal, Outcome, cancellation, supervise};
pub use config::{
    DEFAULT_DEADLINE, DEFAULT_HOST, DEFAULT_PORT, ListenerConfig, ReplyPolicy, SenderConfig,
    format_endpoint,
};
pub use deadline::Deadline;
pub use error::{Operation, TransportError};
pub use listener::{Listener, ListenerEvent, ListenerReport, ListenerStats, StatsSnapshot, listen};
pub use sender::{Exchange, Reply, Sender};

//! Datagram listener.
//!
//! Binds a UDP endpoint and decodes every datagram that arrives into a
//! [`TelemetryFrame`]. Malformed datagrams are logged and counted but never
//! stop the loop; only socket failures and cancellation end a run.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use forza_telemetry_protocol::{DecodeError, TelemetryFrame, decode};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::cancel::{CancelCause, CancelSignal, Outcome, supervise};
use crate::config::ListenerConfig;
use crate::deadline::Deadline;
use crate::error::{Operation, TransportError};

/// Something the listener observed, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerEvent {
    Frame {
        /// Zero-based index of the datagram since the listener started.
        seq: u64,
        source: SocketAddr,
        len: usize,
        frame: Box<TelemetryFrame>,
    },
    DecodeFailed {
        seq: u64,
        source: SocketAddr,
        len: usize,
        error: DecodeError,
    },
}

impl ListenerEvent {
    pub fn seq(&self) -> u64 {
        match self {
            ListenerEvent::Frame { seq, .. } | ListenerEvent::DecodeFailed { seq, .. } => *seq,
        }
    }

    pub fn frame(&self) -> Option<&TelemetryFrame> {
        match self {
            ListenerEvent::Frame { frame, .. } => Some(frame.as_ref()),
            ListenerEvent::DecodeFailed { .. } => None,
        }
    }
}

/// Live counters, shared with whoever holds [`Listener::stats`].
#[derive(Debug, Default)]
pub struct ListenerStats {
    datagrams_received: AtomicU64,
    frames_decoded: AtomicU64,
    decode_failures: AtomicU64,
    replies_sent: AtomicU64,
}

/// Point-in-time copy of [`ListenerStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub datagrams_received: u64,
    pub frames_decoded: u64,
    pub decode_failures: u64,
    pub replies_sent: u64,
}

impl ListenerStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            datagrams_received: self.datagrams_received.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            replies_sent: self.replies_sent.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// How a listener run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerReport {
    pub cause: CancelCause,
    pub stats: StatsSnapshot,
}

/// A bound, not yet running listener.
#[derive(Debug)]
pub struct Listener {
    socket: UdpSocket,
    local_addr: SocketAddr,
    config: ListenerConfig,
    stats: Arc<ListenerStats>,
    events: Option<mpsc::Sender<ListenerEvent>>,
}

impl Listener {
    /// Bind `config.endpoint`.
    ///
    /// # Errors
    ///
    /// [`TransportError::Bind`] if the endpoint does not resolve or the
    /// address is unavailable.
    pub async fn bind(config: ListenerConfig) -> Result<Self, TransportError> {
        let bind_err = |source| TransportError::Bind {
            endpoint: config.endpoint.clone(),
            source,
        };
        let socket = UdpSocket::bind(config.endpoint.as_str())
            .await
            .map_err(bind_err)?;
        let local_addr = socket.local_addr().map_err(bind_err)?;
        info!("Telemetry listener bound on {local_addr}");

        Ok(Self {
            socket,
            local_addr,
            config,
            stats: Arc::new(ListenerStats::default()),
            events: None,
        })
    }

    /// Forward every [`ListenerEvent`] to `tx`. A full channel applies
    /// backpressure to the receive loop.
    pub fn with_events(mut self, tx: mpsc::Sender<ListenerEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    /// The address actually bound; useful when the configured port was 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn stats(&self) -> Arc<ListenerStats> {
        Arc::clone(&self.stats)
    }

    /// Receive until `signal` fires or the socket fails.
    ///
    /// The socket is closed before this returns.
    ///
    /// # Errors
    ///
    /// Any receive or reply failure, including an expired write deadline.
    pub async fn run(self, mut signal: CancelSignal) -> Result<ListenerReport, TransportError> {
        let stats = self.stats();
        let local_addr = self.local_addr;
        let worker = tokio::spawn(self.receive_loop());

        match supervise(&mut signal, worker).await {
            Ok(Outcome::Cancelled(cause)) => {
                let stats = stats.snapshot();
                info!(
                    datagrams = stats.datagrams_received,
                    frames = stats.frames_decoded,
                    "Telemetry listener on {local_addr} stopped: {cause}"
                );
                Ok(ListenerReport { cause, stats })
            }
            Ok(Outcome::Completed(never)) => match never {},
            Err(err) => {
                error!("Telemetry listener on {local_addr} failed: {err}");
                Err(err)
            }
        }
    }

    async fn receive_loop(self) -> Result<Infallible, TransportError> {
        let Listener {
            socket,
            config,
            stats,
            mut events,
            ..
        } = self;
        let mut buffer = vec![0u8; config.buffer_size];
        let mut seq: u64 = 0;

        loop {
            let (len, source) =
                socket
                    .recv_from(&mut buffer)
                    .await
                    .map_err(|source| TransportError::Io {
                        operation: Operation::Receive,
                        bytes_written: 0,
                        source,
                    })?;
            ListenerStats::bump(&stats.datagrams_received);

            // Decoding copies every field out, so the buffer is free for the
            // next receive as soon as this returns.
            let event = match decode(&buffer, len) {
                Ok(frame) => {
                    ListenerStats::bump(&stats.frames_decoded);
                    debug!(
                        seq,
                        %source,
                        len,
                        race_on = frame.is_race_on,
                        timestamp_ms = frame.timestamp_ms,
                        "Decoded telemetry frame"
                    );
                    ListenerEvent::Frame {
                        seq,
                        source,
                        len,
                        frame: Box::new(frame),
                    }
                }
                Err(error) => {
                    ListenerStats::bump(&stats.decode_failures);
                    warn!("Dropping datagram {seq} from {source}: {error}");
                    ListenerEvent::DecodeFailed {
                        seq,
                        source,
                        len,
                        error,
                    }
                }
            };

            let receiver_gone = match &events {
                Some(tx) => tx.send(event).await.is_err(),
                None => false,
            };
            if receiver_gone {
                debug!("Event receiver dropped, no longer forwarding listener events");
                events = None;
            }

            let deadline = Deadline::after(config.write_deadline, Operation::Reply)?;
            if config.echo {
                let payload = buffer.get(..len).unwrap_or_default();
                let sent = deadline
                    .run(Operation::Reply, 0, socket.send_to(payload, source))
                    .await?;
                ListenerStats::bump(&stats.replies_sent);
                debug!(seq, %source, sent, "Echoed datagram");
            }

            seq = seq.wrapping_add(1);
        }
    }
}

/// Bind `config` and run until cancelled, forwarding events to `events`.
///
/// # Errors
///
/// See [`Listener::bind`] and [`Listener::run`].
pub async fn listen(
    config: ListenerConfig,
    events: Option<mpsc::Sender<ListenerEvent>>,
    signal: CancelSignal,
) -> Result<ListenerReport, TransportError> {
    let mut listener = Listener::bind(config).await?;
    if let Some(tx) = events {
        listener = listener.with_events(tx);
    }
    listener.run(signal).await
}

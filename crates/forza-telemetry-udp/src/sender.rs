//! Datagram sender.
//!
//! Streams an arbitrary byte source to a remote endpoint, one datagram per
//! chunk read, then waits for a single reply.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::net::{UdpSocket, lookup_host};
use tracing::{debug, info};

use crate::cancel::{CancelSignal, Outcome, supervise};
use crate::config::{ReplyPolicy, SenderConfig};
use crate::deadline::Deadline;
use crate::error::{Operation, TransportError};

/// A datagram received back from the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub from: SocketAddr,
    pub payload: Vec<u8>,
}

/// Summary of a completed send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub remote: SocketAddr,
    pub bytes_written: u64,
    pub datagrams_sent: u64,
    /// `None` only under [`ReplyPolicy::Optional`].
    pub reply: Option<Reply>,
}

#[derive(Debug, Clone)]
pub struct Sender {
    config: SenderConfig,
}

impl Sender {
    pub fn new(config: SenderConfig) -> Self {
        Self { config }
    }

    /// Send everything `source` yields, then wait for a reply.
    ///
    /// # Errors
    ///
    /// Resolve or connect failures, a failed source read or send, or a
    /// missed reply under [`ReplyPolicy::Required`].
    pub async fn run<R>(
        &self,
        source: R,
        mut signal: CancelSignal,
    ) -> Result<Outcome<Exchange>, TransportError>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let worker = tokio::spawn(exchange(self.config.clone(), source));
        supervise(&mut signal, worker).await
    }
}

/// Resolve `endpoint` and bind an unconnected wildcard socket of the same
/// family. A closed remote port then behaves like a silent peer.
async fn open(endpoint: &str) -> Result<(UdpSocket, SocketAddr), TransportError> {
    let resolve_err = |source| TransportError::Resolve {
        endpoint: endpoint.to_string(),
        source,
    };
    let remote = lookup_host(endpoint)
        .await
        .map_err(resolve_err)?
        .next()
        .ok_or_else(|| resolve_err(io::Error::new(io::ErrorKind::NotFound, "no addresses")))?;

    let local: SocketAddr = if remote.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };
    let socket = UdpSocket::bind(local)
        .await
        .map_err(|source| TransportError::Connect {
            endpoint: remote.to_string(),
            source,
        })?;
    debug!("Sender targeting {remote} from {:?}", socket.local_addr().ok());

    Ok((socket, remote))
}

/// Whether a datagram from `from` counts as the remote's reply. A wildcard
/// remote accepts any host on the remote port.
fn is_reply_source(remote: SocketAddr, from: SocketAddr) -> bool {
    if remote.ip().is_unspecified() {
        from.port() == remote.port()
    } else {
        from == remote
    }
}

/// ICMP "unreachable" as reported by some platforms on an unconnected socket.
fn is_unreachable(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionRefused | io::ErrorKind::ConnectionReset
    )
}

async fn recv_reply(
    socket: &UdpSocket,
    remote: SocketAddr,
    buffer: &mut [u8],
) -> io::Result<(usize, SocketAddr)> {
    loop {
        match socket.recv_from(buffer).await {
            Ok((len, from)) if is_reply_source(remote, from) => return Ok((len, from)),
            Ok((len, from)) => debug!("Ignoring {len}-byte datagram from {from}"),
            Err(e) if is_unreachable(e.kind()) => {
                debug!("{remote} unreachable, still waiting: {e}");
            }
            Err(e) => return Err(e),
        }
    }
}

async fn exchange<R>(config: SenderConfig, mut source: R) -> Result<Exchange, TransportError>
where
    R: AsyncRead + Unpin,
{
    let (socket, remote) = open(&config.endpoint).await?;

    let mut chunk = vec![0u8; config.chunk_size];
    let mut bytes_written: u64 = 0;
    let mut datagrams_sent: u64 = 0;
    loop {
        let read = source
            .read(&mut chunk)
            .await
            .map_err(|source| TransportError::Io {
                operation: Operation::ReadSource,
                bytes_written,
                source,
            })?;
        if read == 0 {
            break;
        }
        let payload = chunk.get(..read).ok_or_else(|| TransportError::Io {
            operation: Operation::ReadSource,
            bytes_written,
            source: io::Error::new(io::ErrorKind::InvalidData, "source overran read buffer"),
        })?;
        let sent = socket
            .send_to(payload, remote)
            .await
            .map_err(|source| TransportError::Io {
                operation: Operation::Send,
                bytes_written,
                source,
            })?;
        bytes_written = bytes_written.saturating_add(sent as u64);
        datagrams_sent = datagrams_sent.saturating_add(1);
    }
    info!("Sent {bytes_written} bytes in {datagrams_sent} datagrams to {remote}");

    let reply = await_reply(&socket, remote, &config, bytes_written).await?;
    Ok(Exchange {
        remote,
        bytes_written,
        datagrams_sent,
        reply,
    })
}

async fn await_reply(
    socket: &UdpSocket,
    remote: SocketAddr,
    config: &SenderConfig,
    bytes_written: u64,
) -> Result<Option<Reply>, TransportError> {
    let deadline = Deadline::after(config.read_deadline, Operation::Receive)?;
    let mut buffer = vec![0u8; config.reply_buffer_size.max(1)];

    match deadline
        .run(
            Operation::Receive,
            bytes_written,
            recv_reply(socket, remote, &mut buffer),
        )
        .await
    {
        Ok((len, from)) => {
            buffer.truncate(len);
            info!("Received {len}-byte reply from {from}");
            Ok(Some(Reply {
                from,
                payload: buffer,
            }))
        }
        Err(err) if err.is_timeout() && config.reply == ReplyPolicy::Optional => {
            debug!("No reply within {:?}", config.read_deadline);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

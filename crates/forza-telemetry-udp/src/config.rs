//! Listener and sender configuration.
//!
//! There is no configuration file; the CLI fills these from flags and the
//! defaults match what the game and the reference tooling expect.

use std::time::Duration;

use forza_telemetry_protocol::MAX_DATAGRAM_LEN;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5607;

/// Write deadline for listener replies and read deadline for sender replies.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(15);

/// Join a host and port, bracketing bare IPv6 literals.
pub fn format_endpoint(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Local `host:port` to bind.
    pub endpoint: String,
    /// Capacity of the reusable receive buffer. Longer datagrams are truncated
    /// by the OS.
    pub buffer_size: usize,
    pub write_deadline: Duration,
    /// Reflect each datagram back to its sender. Off by default.
    pub echo: bool,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            endpoint: format_endpoint(DEFAULT_HOST, DEFAULT_PORT),
            buffer_size: MAX_DATAGRAM_LEN,
            write_deadline: DEFAULT_DEADLINE,
            echo: false,
        }
    }
}

impl ListenerConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    pub fn with_write_deadline(mut self, deadline: Duration) -> Self {
        self.write_deadline = deadline;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }
}

/// What the sender does when no reply arrives before the read deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReplyPolicy {
    /// A missing reply is a [`crate::TransportError::Timeout`].
    #[default]
    Required,
    /// A missing reply completes the exchange with `reply: None`.
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SenderConfig {
    /// Remote `host:port`; resolved on every run.
    pub endpoint: String,
    /// Maximum bytes per outbound datagram.
    pub chunk_size: usize,
    pub read_deadline: Duration,
    pub reply_buffer_size: usize,
    pub reply: ReplyPolicy,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            endpoint: format_endpoint(DEFAULT_HOST, DEFAULT_PORT),
            chunk_size: MAX_DATAGRAM_LEN,
            read_deadline: DEFAULT_DEADLINE,
            reply_buffer_size: MAX_DATAGRAM_LEN,
            reply: ReplyPolicy::Required,
        }
    }
}

impl SenderConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn with_read_deadline(mut self, deadline: Duration) -> Self {
        self.read_deadline = deadline;
        self
    }

    pub fn with_reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.reply = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_defaults() {
        let config = ListenerConfig::default();
        assert_eq!(config.endpoint, "127.0.0.1:5607");
        assert_eq!(config.buffer_size, 1024);
        assert_eq!(config.write_deadline, Duration::from_secs(15));
        assert!(!config.echo);
    }

    #[test]
    fn sender_defaults() {
        let config = SenderConfig::default();
        assert_eq!(config.chunk_size, 1024);
        assert_eq!(config.read_deadline, Duration::from_secs(15));
        assert_eq!(config.reply, ReplyPolicy::Required);
    }

    #[test]
    fn zero_sizes_are_clamped() {
        assert_eq!(ListenerConfig::default().with_buffer_size(0).buffer_size, 1);
        assert_eq!(SenderConfig::default().with_chunk_size(0).chunk_size, 1);
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        assert_eq!(format_endpoint("::1", 5607), "[::1]:5607");
        assert_eq!(format_endpoint("[::1]", 5607), "[::1]:5607");
        assert_eq!(format_endpoint("localhost", 3000), "localhost:3000");
    }
}

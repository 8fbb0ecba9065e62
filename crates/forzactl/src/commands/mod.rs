//! Command definitions and handlers

pub mod layout;
pub mod send;
pub mod serve;

use std::path::PathBuf;

use clap::Args;
use forza_telemetry_udp::{CancelCause, CancelHandle, DEFAULT_HOST, DEFAULT_PORT, format_endpoint};
use tracing::{info, warn};

/// Host and port of a UDP endpoint.
#[derive(Args, Debug, Clone)]
pub struct EndpointArgs {
    /// Host name or IP address
    #[arg(long, env = "FORZA_ADDRESS", default_value = DEFAULT_HOST)]
    pub address: String,

    /// UDP port
    #[arg(long, env = "FORZA_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

impl EndpointArgs {
    pub fn endpoint(&self) -> String {
        format_endpoint(&self.address, self.port)
    }
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Reflect every datagram back to its sender
    #[arg(long)]
    pub echo: bool,

    /// Stop after this many seconds
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Deadline for echo writes, in milliseconds
    #[arg(long, default_value_t = 15_000)]
    pub write_timeout_ms: u64,

    /// Only report every Nth frame (decode failures are always reported)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub every: u64,
}

#[derive(Args, Debug, Clone)]
pub struct SendArgs {
    #[command(flatten)]
    pub endpoint: EndpointArgs,

    /// Send this text
    #[arg(long, conflicts_with_all = ["file", "synthetic"])]
    pub message: Option<String>,

    /// Send the contents of this file
    #[arg(long, conflicts_with = "synthetic")]
    pub file: Option<PathBuf>,

    /// Send N generated telemetry frames, one per datagram
    #[arg(long, value_name = "N")]
    pub synthetic: Option<u32>,

    /// Maximum bytes per datagram (ignored with --synthetic)
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(u64).range(1..=65_507))]
    pub chunk_size: u64,

    /// How long to wait for a reply, in milliseconds
    #[arg(long, default_value_t = 15_000)]
    pub reply_timeout_ms: u64,

    /// Succeed even if no reply arrives
    #[arg(long)]
    pub no_reply_required: bool,
}

/// Cancel `handle` with [`CancelCause::Interrupted`] on Ctrl-C.
pub fn cancel_on_ctrl_c(handle: CancelHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, shutting down");
                handle.cancel(CancelCause::Interrupted);
            }
            Err(e) => warn!("Failed to install Ctrl-C handler: {e}"),
        }
    })
}

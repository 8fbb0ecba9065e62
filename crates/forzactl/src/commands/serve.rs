//! Run a telemetry listener until interrupted.

use std::time::Duration;

use anyhow::{Context, Result};
use forza_telemetry_udp::{Listener, ListenerConfig, ListenerEvent, cancellation};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::commands::{ServeArgs, cancel_on_ctrl_c};
use crate::error::CliError;
use crate::output;

const EVENT_BUFFER: usize = 256;

pub async fn execute(args: &ServeArgs, json: bool) -> Result<()> {
    let endpoint = args.endpoint.endpoint();
    let config = ListenerConfig::new(endpoint.clone())
        .with_echo(args.echo)
        .with_write_deadline(Duration::from_millis(args.write_timeout_ms));

    let listener = Listener::bind(config)
        .await
        .map_err(CliError::from)
        .with_context(|| format!("cannot listen on {endpoint}"))?;
    output::print_listening(listener.local_addr(), args.echo, json);

    let (handle, signal) = cancellation();
    let ctrl_c = cancel_on_ctrl_c(handle.clone());
    let timer = args
        .duration_secs
        .map(|secs| handle.cancel_after(Duration::from_secs(secs)));

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let printer = tokio::spawn(print_events(rx, args.every, json));
    let result = listener.with_events(tx).run(signal).await;

    ctrl_c.abort();
    if let Some(timer) = timer {
        timer.abort();
    }
    // The listener's sender is gone, so the printer drains and exits.
    if let Err(e) = printer.await {
        warn!("Event printer failed: {e}");
    }

    let report = result.map_err(CliError::from)?;
    output::print_report(&report, json);
    Ok(())
}

async fn print_events(mut rx: mpsc::Receiver<ListenerEvent>, every: u64, json: bool) {
    let mut frames_seen: u64 = 0;
    while let Some(event) = rx.recv().await {
        match event {
            ListenerEvent::Frame {
                seq,
                source,
                len,
                frame,
            } => {
                if frames_seen.is_multiple_of(every) {
                    output::print_frame(seq, source, len, &frame, json);
                }
                frames_seen = frames_seen.wrapping_add(1);
            }
            ListenerEvent::DecodeFailed {
                seq,
                source,
                len,
                error,
            } => output::print_decode_failure(seq, source, len, &error, json),
        }
    }
    debug!("Event stream closed after {frames_seen} frames");
}

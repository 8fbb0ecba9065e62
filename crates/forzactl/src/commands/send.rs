//! One bounded send-and-reply exchange.

use std::io::Cursor;
use std::time::Duration;

use anyhow::{Context, Result};
use forza_telemetry_protocol::FRAME_LEN;
use forza_telemetry_udp::{Outcome, ReplyPolicy, Sender, SenderConfig, cancellation};
use tokio::io::AsyncRead;
use tracing::info;

use crate::commands::{SendArgs, cancel_on_ctrl_c};
use crate::error::CliError;
use crate::output;
use crate::synthetic::synthetic_stream;

type Source = Box<dyn AsyncRead + Unpin + Send>;

async fn open_source(args: &SendArgs) -> Result<(Source, usize)> {
    let chunk_size = usize::try_from(args.chunk_size).map_err(|_overflow| {
        CliError::InvalidArgument(format!("--chunk-size {} is too large", args.chunk_size))
    })?;

    if let Some(message) = &args.message {
        return Ok((Box::new(Cursor::new(message.clone().into_bytes())), chunk_size));
    }
    if let Some(path) = &args.file {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(CliError::from)
            .with_context(|| format!("failed to open '{}'", path.display()))?;
        return Ok((Box::new(file), chunk_size));
    }
    if let Some(count) = args.synthetic {
        if count == 0 {
            return Err(CliError::InvalidArgument("--synthetic must be > 0".to_string()).into());
        }
        info!("Generating {count} synthetic frames");
        return Ok((Box::new(Cursor::new(synthetic_stream(count))), FRAME_LEN));
    }
    Ok((Box::new(tokio::io::stdin()), chunk_size))
}

pub async fn execute(args: &SendArgs, json: bool) -> Result<()> {
    let (source, chunk_size) = open_source(args).await?;

    let policy = if args.no_reply_required {
        ReplyPolicy::Optional
    } else {
        ReplyPolicy::Required
    };
    let config = SenderConfig::new(args.endpoint.endpoint())
        .with_chunk_size(chunk_size)
        .with_read_deadline(Duration::from_millis(args.reply_timeout_ms))
        .with_reply_policy(policy);

    let (handle, signal) = cancellation();
    let ctrl_c = cancel_on_ctrl_c(handle);
    let outcome = Sender::new(config).run(source, signal).await;
    ctrl_c.abort();

    match outcome.map_err(CliError::from)? {
        Outcome::Completed(exchange) => {
            output::print_exchange(&exchange, json);
            Ok(())
        }
        Outcome::Cancelled(cause) => {
            output::print_cancelled(cause, json);
            Err(CliError::Interrupted.into())
        }
    }
}

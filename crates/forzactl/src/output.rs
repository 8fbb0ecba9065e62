//! Output formatting for CLI responses
//!
//! Streaming events are printed one per line (JSON Lines with `--json`);
//! summaries and the layout table are pretty-printed.

use std::net::SocketAddr;

use anyhow::Error;
use colored::*;
use forza_telemetry_protocol::{DecodeError, FIELD_TABLE, FRAME_LEN, TelemetryFrame, normalize_u8};
use forza_telemetry_udp::{CancelCause, Exchange, ListenerReport};
use serde_json::{Value, json};

use crate::error::CliError;

fn emit_json(value: &Value, pretty: bool, what: &str) {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Failed to format {what} as JSON: {e}"),
    }
}

/// Print error in JSON format
pub fn print_error_json(error: &Error) {
    let kind = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CliError>())
        .map_or("Other", |err| match err {
            CliError::InvalidArgument(_) => "InvalidArgument",
            CliError::Transport(_) => "Transport",
            CliError::Interrupted => "Interrupted",
            CliError::IoError(_) => "Io",
            CliError::JsonError(_) => "Json",
        });
    let output = json!({
        "success": false,
        "error": {
            "message": error.to_string(),
            "type": kind,
        }
    });
    emit_json(&output, true, "error");
}

/// Print error in human-readable format
pub fn print_error_human(error: &Error) {
    eprintln!("{} {}", "Error:".red().bold(), error);

    let mut source = error.source();
    while let Some(err) = source {
        eprintln!("  {} {}", "Caused by:".yellow(), err);
        source = err.source();
    }
}

/// Driver inputs scaled to 0.0–1.0.
pub fn normalized_inputs(frame: &TelemetryFrame) -> Value {
    let input = &frame.input;
    json!({
        "throttle": normalize_u8(input.throttle),
        "brake": normalize_u8(input.brake),
        "clutch": normalize_u8(input.clutch),
        "handbrake": normalize_u8(input.handbrake),
        "steer": normalize_u8(input.steer),
        "driving_line": normalize_u8(input.normalized_driving_line),
        "ai_brake_difference": normalize_u8(input.normalized_ai_brake_difference),
    })
}

pub fn frame_json(seq: u64, source: SocketAddr, len: usize, frame: &TelemetryFrame) -> Value {
    json!({
        "event": "frame",
        "seq": seq,
        "source": source.to_string(),
        "len": len,
        "frame": frame,
        "normalized": normalized_inputs(frame),
    })
}

pub fn frame_line(seq: u64, source: SocketAddr, frame: &TelemetryFrame) -> String {
    let race = if frame.is_race_on { "racing" } else { "paused" };
    let gear = match frame.input.gear {
        0 => "R".to_string(),
        g => g.to_string(),
    };
    format!(
        "#{seq} {source} t={}ms {race} rpm {:.0}/{:.0} gear {gear} {:.1} m/s throttle {:.2} brake {:.2} steer {:.2} lap {} P{}",
        frame.timestamp_ms,
        frame.engine.current_rpm,
        frame.engine.max_rpm,
        frame.dynamics.speed,
        normalize_u8(frame.input.throttle),
        normalize_u8(frame.input.brake),
        normalize_u8(frame.input.steer),
        frame.progress.lap_number,
        frame.progress.race_position,
    )
}

pub fn print_listening(addr: SocketAddr, echo: bool, json: bool) {
    if json {
        emit_json(
            &json!({ "event": "listening", "address": addr.to_string(), "echo": echo }),
            false,
            "listener status",
        );
    } else {
        let mode = if echo { " (echo on)" } else { "" };
        println!("{} {addr}{mode}", "Listening on".green().bold());
    }
}

pub fn print_frame(seq: u64, source: SocketAddr, len: usize, frame: &TelemetryFrame, json: bool) {
    if json {
        emit_json(&frame_json(seq, source, len, frame), false, "frame");
    } else {
        println!("{}", frame_line(seq, source, frame));
    }
}

pub fn print_decode_failure(
    seq: u64,
    source: SocketAddr,
    len: usize,
    error: &DecodeError,
    json: bool,
) {
    if json {
        emit_json(
            &json!({
                "event": "decode_failed",
                "seq": seq,
                "source": source.to_string(),
                "len": len,
                "error": error.to_string(),
            }),
            false,
            "decode failure",
        );
    } else {
        println!("#{seq} {source} {} {error}", "dropped:".yellow());
    }
}

pub fn print_report(report: &ListenerReport, json: bool) {
    let stats = &report.stats;
    if json {
        emit_json(
            &json!({
                "event": "stopped",
                "success": true,
                "reason": report.cause.to_string(),
                "datagrams_received": stats.datagrams_received,
                "frames_decoded": stats.frames_decoded,
                "decode_failures": stats.decode_failures,
                "replies_sent": stats.replies_sent,
            }),
            false,
            "listener report",
        );
    } else {
        println!(
            "{} ({}): {} datagrams, {} frames, {} dropped, {} echoed",
            "Stopped".bold(),
            report.cause,
            stats.datagrams_received,
            stats.frames_decoded,
            stats.decode_failures,
            stats.replies_sent
        );
    }
}

pub fn exchange_json(exchange: &Exchange) -> Value {
    let reply = exchange.reply.as_ref().map(|reply| {
        json!({
            "from": reply.from.to_string(),
            "len": reply.payload.len(),
            "text": String::from_utf8_lossy(&reply.payload),
        })
    });
    json!({
        "success": true,
        "remote": exchange.remote.to_string(),
        "bytes_written": exchange.bytes_written,
        "datagrams_sent": exchange.datagrams_sent,
        "reply": reply,
    })
}

pub fn print_exchange(exchange: &Exchange, json: bool) {
    if json {
        emit_json(&exchange_json(exchange), true, "exchange");
        return;
    }

    println!(
        "{} {} bytes in {} datagrams to {}",
        "Sent".green().bold(),
        exchange.bytes_written,
        exchange.datagrams_sent,
        exchange.remote
    );
    match &exchange.reply {
        Some(reply) => println!(
            "{} {} bytes from {}: {}",
            "Reply".green().bold(),
            reply.payload.len(),
            reply.from,
            String::from_utf8_lossy(&reply.payload)
        ),
        None => println!("{}", "No reply".yellow()),
    }
}

pub fn print_cancelled(cause: CancelCause, json: bool) {
    if json {
        emit_json(
            &json!({ "success": false, "cancelled": cause.to_string() }),
            true,
            "cancellation",
        );
    } else {
        println!("{} {cause}", "Cancelled:".yellow().bold());
    }
}

pub fn layout_json() -> Value {
    let fields: Vec<Value> = FIELD_TABLE
        .iter()
        .map(|field| {
            json!({
                "name": field.name,
                "offset": field.offset,
                "type": field.kind.as_str(),
                "width": field.width(),
            })
        })
        .collect();
    json!({ "frame_len": FRAME_LEN, "fields": fields })
}

pub fn print_layout(json: bool) {
    if json {
        emit_json(&layout_json(), true, "layout");
        return;
    }

    println!("{} ({FRAME_LEN} bytes)", "Forza Horizon 5 Data Out".bold());
    println!("{:>6}  {:<6}  {}", "offset".dimmed(), "type".dimmed(), "field".dimmed());
    for field in FIELD_TABLE {
        println!("{:>6}  {:<6}  {}", field.offset, field.kind.as_str(), field.name);
    }
}

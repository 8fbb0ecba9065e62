//! forzactl - Forza Horizon 5 telemetry tool
//!
//! Listens for "Data Out" telemetry, sends test traffic to a listener, and
//! prints the wire layout.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod error;
mod output;
mod synthetic;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{SendArgs, ServeArgs};

#[derive(Parser)]
#[command(name = "forzactl")]
#[command(about = "Forza Horizon 5 telemetry listener, sender and layout inspector")]
#[command(version)]
#[command(long_about = "
forzactl receives the fixed-layout UDP telemetry that Forza Horizon 5 emits
when \"Data Out\" is enabled, decodes every packet and prints it. It can also
stream test data (including synthetic telemetry) to any UDP endpoint.

Use --json for machine-readable output; streaming commands emit one JSON
object per line.
")]
struct Cli {
    /// Output in JSON format for machine parsing
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen for telemetry and print each frame
    Serve(ServeArgs),

    /// Send data to a UDP endpoint and wait for a reply
    Send(SendArgs),

    /// Print the packet layout
    Layout,
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("forzactl={log_level},forza_telemetry_udp={log_level}").into()
            }),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

async fn execute_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Serve(args) => commands::serve::execute(args, cli.json).await,
        Commands::Send(args) => commands::send::execute(args, cli.json).await,
        Commands::Layout => commands::layout::execute(cli.json),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }
            ExitCode::from(error::exit_code(&e))
        }
    }
}

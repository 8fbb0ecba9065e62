//! Error types for forzactl

use forza_telemetry_udp::TransportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Interrupted before completion")]
    Interrupted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::InvalidArgument(_) => 2,
            CliError::Transport(err) if err.is_initialization() => 3,
            CliError::Transport(err) if err.is_timeout() => 4,
            CliError::Transport(_) => 5,
            CliError::Interrupted => 130,
            CliError::IoError(_) | CliError::JsonError(_) => 1,
        }
    }
}

/// Exit status for any error surfaced from a command.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<CliError>())
        .map_or(1, CliError::exit_code)
}

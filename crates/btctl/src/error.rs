//! Error types for btctl

use bluetiger::{BtError, BtStatusCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Device error: {0}")]
    Device(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Driver library error: {0}")]
    Library(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Device(_) => 2,
            CliError::InvalidInput(_) | CliError::Json(_) | CliError::Yaml(_) => 3,
            CliError::Config(_) => 4,
            CliError::Library(_) => 5,
            CliError::Io(_) => 1,
        }
    }

    /// Wrap any error raised while loading configuration.
    pub fn config(err: impl std::fmt::Display) -> Self {
        CliError::Config(err.to_string())
    }
}

impl From<BtError> for CliError {
    fn from(err: BtError) -> Self {
        let message = err.to_string();
        match err {
            BtError::Status {
                code: BtStatusCode::ParamOutOfRange | BtStatusCode::NotSupported,
                ..
            }
            | BtError::InvalidText { .. }
            | BtError::InvalidEffect(_) => CliError::InvalidInput(message),
            BtError::Status { .. } | BtError::UnknownStatus { .. } | BtError::SessionClosed => {
                CliError::Device(message)
            }
            BtError::Library(_) | BtError::MissingSymbol(_) => CliError::Library(message),
            BtError::Config(_) | BtError::Yaml(_) | BtError::Json(_) => CliError::Config(message),
            BtError::Io(e) => CliError::Io(e),
        }
    }
}

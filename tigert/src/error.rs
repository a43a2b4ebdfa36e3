//! Error types for the tigert CLI.

use std::process::ExitStatus;

use thiserror::Error;
use tiger_rt::LayoutError;

/// Main error type for tigert commands.
#[derive(Error, Debug)]
pub enum TigertError {
    /// Invalid or unreadable configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid command input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The C compiler driver could not be started or failed.
    #[error("Link failed ({status}): {stderr}")]
    Link { status: String, stderr: String },

    /// The linked program could not be started.
    #[error("Command execution failed: {0}")]
    CommandExecution(String),

    /// Class file could not be laid out.
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TigertError {
    pub fn link_failed(status: ExitStatus, stderr: &[u8]) -> Self {
        let status = match status.code() {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        Self::Link {
            status,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        }
    }
}

/// Result type alias using TigertError.
pub type Result<T> = std::result::Result<T, TigertError>;

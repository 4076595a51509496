//! Error types for the regression driver
//!
//! Only fatal conditions live here. A result that does not match its
//! expectation is not an error: it is counted in the run summary.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the regression driver
#[derive(Error, Debug)]
pub enum Error {
    // === Build Errors ===
    #[error("Build tool '{name}' not found on PATH")]
    BuildToolNotFound { name: String },

    #[error("Build failed: `{command}` exited with {status}")]
    BuildFailed { command: String, status: String },

    // === Engine Errors ===
    #[error("Engine failed to start: {0}")]
    EngineStartFailed(String),

    #[error("Engine closed its output before answering test {test}")]
    EngineTerminated { test: usize },

    #[error("Test {test}: no result line from the engine within {secs} seconds")]
    ProbeTimeout { test: usize, secs: u64 },

    // === Fixture Errors ===
    #[error("Malformed expectation on fixture line {line}: '{text}' (expected <length>:<moves>)")]
    MalformedExpectation { line: usize, text: String },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },
}

impl Error {
    /// Create a build failed error from the rendered command line
    pub fn build_failed(command: &str, status: std::process::ExitStatus) -> Self {
        let status = match status.code() {
            Some(code) => format!("status {code}"),
            None => "no status (killed by signal)".to_string(),
        };
        Self::BuildFailed {
            command: command.to_string(),
            status,
        }
    }

    /// Create a file read error for `path`
    pub fn file_read(path: &std::path::Path, error: &io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Whether this error aborted the run before any test executed
    pub fn is_build_error(&self) -> bool {
        matches!(self, Self::BuildToolNotFound { .. } | Self::BuildFailed { .. })
    }
}

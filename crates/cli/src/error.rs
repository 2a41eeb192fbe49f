//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: LIC error (bad options, unknown field, non-finite data, worker failure)
//! - 11: I/O error (PNG write)
//! - 12: input error (bad colormap, bad JSON params)
//! - 13: serialization error

use lic_core::LicError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A configuration or computation error from the LIC crates.
    Lic(LicError),
    /// An I/O error (file write, snapshot rendering).
    Io(String),
    /// A user input error (bad colormap name, bad JSON params).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Lic(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Lic(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "cannot write output: {msg}"),
            CliError::Input(msg) | CliError::Serialization(msg) => f.write_str(msg),
        }
    }
}

impl From<LicError> for CliError {
    fn from(e: LicError) -> Self {
        match e {
            LicError::Io(msg) => CliError::Io(msg),
            other => CliError::Lic(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

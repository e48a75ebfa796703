//! CLI-level errors (wraps library errors)

use thiserror::Error;

use crate::builder::BuildError;
use crate::error::TreeError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Build(#[from] BuildError),

    #[error("{0}")]
    Tree(#[from] TreeError),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::Config(_) => crate::exitcode::CONFIG,
            CliError::Build(e) => match e {
                BuildError::Read { .. } => crate::exitcode::NOINPUT,
                BuildError::InvalidFormat { .. } => crate::exitcode::DATAERR,
                BuildError::Write(_) | BuildError::Tree(_) => crate::exitcode::SOFTWARE,
            },
            CliError::Tree(_) => crate::exitcode::SOFTWARE,
        }
    }
}

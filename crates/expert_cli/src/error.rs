//! Error types for the expert system command line.

use thiserror::Error;

/// A specialized `Result` type for command-line operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can stop the command line.
#[derive(Error, Debug)]
pub enum Error {
    /// The rule base could not be loaded or a command could not be parsed.
    #[error(transparent)]
    Logic(#[from] expert_logic::Error),

    /// An error that occurred while serializing outcomes.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An error from the underlying I/O system.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

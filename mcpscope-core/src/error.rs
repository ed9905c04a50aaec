//! Error types for mcpscope-core

use thiserror::Error;

/// Main error type for the mcpscope-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for mcpscope-core
pub type Result<T> = std::result::Result<T, Error>;

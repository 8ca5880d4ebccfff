//! Error types for the common crate
//!
//! This module defines the error type shared by the control plane crates.

use thiserror::Error;

/// Result type for control plane operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for control plane operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The model store could not be reached or rejected an operation
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The core service could not be reached or reported a failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Timeout error
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Returns true if the error came from the model store
    pub fn is_persistence(&self) -> bool {
        matches!(self, Error::Persistence(_))
    }

    /// Returns true if the error is an invalid argument error
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }

    /// Returns true if the error is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}

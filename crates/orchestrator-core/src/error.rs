//! Lifecycle errors

use thiserror::Error;

/// Failure of a lifecycle operation
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The core refused or could not be reached; nothing was persisted
    #[error("core error: {0}")]
    Core(String),

    /// The model store failed
    #[error(transparent)]
    Store(#[from] common::Error),
}

impl LifecycleError {
    /// Returns true if the failure came from the core
    pub fn is_core(&self) -> bool {
        matches!(self, LifecycleError::Core(_))
    }
}

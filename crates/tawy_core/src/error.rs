//! Error types for tawy_core

use thiserror::Error;

use crate::timer::TimerId;

/// Errors raised by the core runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A recurring timer needs a non-zero period
    #[error("recurring timer period must be greater than zero")]
    ZeroInterval,

    /// The timer id does not belong to this scheduler
    #[error("unknown timer: {0:?}")]
    UnknownTimer(TimerId),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

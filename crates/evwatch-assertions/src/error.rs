//! Assertion error types.

use evwatch_core::error::MonitorError;
use thiserror::Error;

/// Errors returned by event assertions.
#[derive(Debug, Error)]
pub enum AssertionError {
    /// The expectation did not hold.
    #[error("{0}")]
    Failed(String),

    /// The assertion itself was called with arguments it cannot evaluate.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The monitor could not answer the query.
    #[error(transparent)]
    Monitor(#[from] MonitorError),
}

impl AssertionError {
    /// Returns true if this is an expectation failure rather than a usage or
    /// monitor error.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

//! Monitor error types.

use thiserror::Error;

/// Which accessor of an event failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    /// The accessor that subscribes a handler.
    Add,
    /// The accessor that unsubscribes a handler.
    Remove,
}

impl std::fmt::Display for AccessorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Remove => f.write_str("remove"),
        }
    }
}

/// Failure reported by an event's add or remove accessor.
#[derive(Debug, Clone, Error)]
#[error("{kind} accessor failed: {message}")]
pub struct AccessorError {
    /// The accessor that failed.
    pub kind: AccessorKind,
    /// Description of the failure.
    pub message: String,
}

impl AccessorError {
    /// Creates an error for a failing `add` accessor.
    #[must_use]
    pub fn add(message: impl Into<String>) -> Self {
        Self {
            kind: AccessorKind::Add,
            message: message.into(),
        }
    }

    /// Creates an error for a failing `remove` accessor.
    #[must_use]
    pub fn remove(message: impl Into<String>) -> Self {
        Self {
            kind: AccessorKind::Remove,
            message: message.into(),
        }
    }
}

/// Errors raised while attaching, querying or detaching a monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The subject was dropped before the monitor could attach to it.
    #[error("cannot monitor the events of a subject that is no longer alive")]
    SubjectUnavailable,

    /// No recorder exists for the requested event.
    #[error("event \"{0}\" is not being monitored")]
    EventNotMonitored(String),

    /// An event accessor failed and the policy did not allow ignoring it.
    #[error("event \"{event}\": {source}")]
    Accessor {
        /// The event whose accessor failed.
        event: String,
        /// The accessor failure.
        #[source]
        source: AccessorError,
    },
}

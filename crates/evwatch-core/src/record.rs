//! Captured event occurrences.

use std::any::Any;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::arg::EventArg;

/// One captured invocation of a monitored event.
///
/// Records are created by the monitor's capture handler and never change
/// afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct EventRecord {
    event_name: String,
    sequence: u64,
    timestamp_utc: DateTime<Utc>,
    parameters: Vec<EventArg>,
}

impl EventRecord {
    pub(crate) fn new(
        event_name: String,
        sequence: u64,
        timestamp_utc: DateTime<Utc>,
        parameters: Vec<EventArg>,
    ) -> Self {
        Self {
            event_name,
            sequence,
            timestamp_utc,
            parameters,
        }
    }

    /// Name of the event that was raised.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Position of this occurrence among all occurrences on the monitor.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// When the occurrence was captured, according to the monitor's clock.
    #[must_use]
    pub fn timestamp_utc(&self) -> DateTime<Utc> {
        self.timestamp_utc
    }

    /// The arguments the event was raised with, in positional order.
    #[must_use]
    pub fn parameters(&self) -> &[EventArg] {
        &self.parameters
    }

    /// The first argument, which conventional events use for the sender.
    #[must_use]
    pub fn sender(&self) -> Option<&EventArg> {
        self.parameters.first()
    }

    /// Arguments of exactly type `T`, in positional order.
    pub fn args_of<T: Any>(&self) -> impl Iterator<Item = &T> {
        self.parameters.iter().filter_map(EventArg::downcast_ref::<T>)
    }
}

//! Monitor configuration.

use std::fmt;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};

/// What a monitor does when an event's `add` accessor fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokenAccessorAction {
    /// Abort attaching.
    Fail,
    /// Leave the event unmonitored.
    Skip,
    /// Keep monitoring the event. Occurrences are recorded if the accessor
    /// installed the handler before failing.
    Record,
}

/// Configuration snapshot taken by a monitor when it is attached.
#[derive(Clone)]
pub struct MonitorOptions {
    clock: Arc<dyn Clock>,
    ignore_accessor_exceptions: bool,
    record_broken_accessors: bool,
}

impl MonitorOptions {
    /// Options with the system clock and failing accessors propagated.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            ignore_accessor_exceptions: false,
            record_broken_accessors: false,
        }
    }

    /// Uses `clock` to timestamp recorded occurrences.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Skips events whose add or remove accessor fails instead of failing.
    #[must_use]
    pub fn ignoring_event_accessor_exceptions(mut self) -> Self {
        self.ignore_accessor_exceptions = true;
        self
    }

    /// When accessor failures are ignored, keeps monitoring events whose
    /// add accessor failed instead of skipping them.
    #[must_use]
    pub fn recording_events_with_broken_accessor(mut self) -> Self {
        self.record_broken_accessors = true;
        self
    }

    /// The clock used for timestamps.
    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Returns true if accessor failures are logged instead of returned.
    #[must_use]
    pub fn ignores_accessor_exceptions(&self) -> bool {
        self.ignore_accessor_exceptions
    }

    /// What to do with an event whose `add` accessor failed.
    #[must_use]
    pub fn broken_accessor_action(&self) -> BrokenAccessorAction {
        match (self.ignore_accessor_exceptions, self.record_broken_accessors) {
            (false, _) => BrokenAccessorAction::Fail,
            (true, false) => BrokenAccessorAction::Skip,
            (true, true) => BrokenAccessorAction::Record,
        }
    }
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MonitorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorOptions")
            .field("ignore_accessor_exceptions", &self.ignore_accessor_exceptions)
            .field("record_broken_accessors", &self.record_broken_accessors)
            .finish_non_exhaustive()
    }
}

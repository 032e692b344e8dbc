//! Per-event occurrence logs.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::arg::EventArg;
use crate::clock::Clock;
use crate::record::EventRecord;

/// State shared by every recorder of one monitor.
pub(crate) struct RecordingContext {
    next_sequence: AtomicU64,
    active: AtomicBool,
    clock: Arc<dyn Clock>,
}

impl RecordingContext {
    pub(crate) fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            next_sequence: AtomicU64::new(0),
            active: AtomicBool::new(true),
            clock,
        }
    }

    pub(crate) fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

/// Append-only log of the occurrences of one event.
pub struct EventRecorder {
    event_name: String,
    handler_type: String,
    records: Mutex<Vec<EventRecord>>,
    enabled: AtomicBool,
    context: Arc<RecordingContext>,
}

impl EventRecorder {
    pub(crate) fn new(
        event_name: impl Into<String>,
        handler_type: impl Into<String>,
        context: Arc<RecordingContext>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            handler_type: handler_type.into(),
            records: Mutex::new(Vec::new()),
            enabled: AtomicBool::new(true),
            context,
        }
    }

    /// Captures one occurrence of the event.
    ///
    /// The sequence number is taken while the log is locked, so the log stays
    /// in sequence order even when the event is raised from several threads.
    pub fn record(&self, parameters: &[EventArg]) {
        if !self.enabled.load(Ordering::SeqCst) || !self.context.is_active() {
            return;
        }
        let mut records = self.lock();
        let sequence = self.context.next_sequence.fetch_add(1, Ordering::SeqCst);
        let timestamp = self.context.clock.now();
        tracing::trace!(event = %self.event_name, sequence, "recorded event occurrence");
        records.push(EventRecord::new(
            self.event_name.clone(),
            sequence,
            timestamp,
            parameters.to_vec(),
        ));
    }

    /// Name of the recorded event.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Handler shape of the recorded event.
    #[must_use]
    pub fn handler_type(&self) -> &str {
        &self.handler_type
    }

    /// Snapshot of the recorded occurrences, oldest first.
    #[must_use]
    pub fn records(&self) -> Vec<EventRecord> {
        self.lock().clone()
    }

    /// Number of recorded occurrences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Stops this recorder for good, leaving the rest of the monitor
    /// recording. A disabled recorder draws no sequence numbers.
    pub(crate) fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Forgets every recorded occurrence.
    pub fn reset(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<EventRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRecorder")
            .field("event_name", &self.event_name)
            .field("handler_type", &self.handler_type)
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}

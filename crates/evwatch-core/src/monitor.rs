//! Attaching to a subject and recording what it raises.
//!
//! A monitor installs one capture handler per event of the subject (or of
//! one interface view of it). Every handler appends to its event's recorder
//! and draws its sequence number from a counter shared by the whole monitor,
//! so the relative order of different events is observable even when their
//! timestamps are identical.

use std::fmt;
use std::sync::{Arc, Weak};

use serde::Serialize;
use uuid::Uuid;

use crate::arg::EventArg;
use crate::error::MonitorError;
use crate::options::{BrokenAccessorAction, MonitorOptions};
use crate::record::EventRecord;
use crate::recorder::{EventRecorder, RecordingContext};
use crate::recording::{EventRecording, SubjectInfo};
use crate::source::{EventAccessor, EventDescriptor, EventHandler, EventSource, EventView, HandlerId};

/// Name and handler shape of a monitored event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitoredEvent {
    /// Event name.
    pub name: String,
    /// Handler shape.
    pub handler_type: String,
}

struct Subscription {
    event: String,
    id: HandlerId,
    accessor: Arc<dyn EventAccessor>,
}

/// Records every occurrence of the events of one subject.
///
/// Detaches its handlers when disposed or dropped.
pub struct EventMonitor {
    id: Uuid,
    subject: Weak<dyn EventSource>,
    subject_info: SubjectInfo,
    recorders: Vec<Arc<EventRecorder>>,
    subscriptions: Vec<Subscription>,
    context: Arc<RecordingContext>,
    options: MonitorOptions,
}

impl EventMonitor {
    /// Attaches to every event of `subject`.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Accessor` if an event's add accessor fails and
    /// the options do not ignore accessor failures.
    pub fn attach<S: EventSource>(
        subject: &Arc<S>,
        options: MonitorOptions,
    ) -> Result<Self, MonitorError> {
        Self::attach_view(subject, EventView::Subject, options)
    }

    /// Attaches to the events `subject` exposes through `interface`.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Accessor` if an event's add accessor fails and
    /// the options do not ignore accessor failures.
    pub fn attach_as<S: EventSource>(
        subject: &Arc<S>,
        interface: &str,
        options: MonitorOptions,
    ) -> Result<Self, MonitorError> {
        Self::attach_view(subject, EventView::Interface(interface), options)
    }

    /// Attaches to every event of a subject held weakly.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::SubjectUnavailable` if the subject was already
    /// dropped, or `MonitorError::Accessor` as for [`Self::attach`].
    pub fn attach_weak<S: EventSource>(
        subject: &Weak<S>,
        options: MonitorOptions,
    ) -> Result<Self, MonitorError> {
        let subject = subject.upgrade().ok_or(MonitorError::SubjectUnavailable)?;
        Self::attach(&subject, options)
    }

    /// Attaches to the events of `subject` visible through `view`.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Accessor` if an event's add accessor fails and
    /// the options do not ignore accessor failures. Handlers installed before
    /// the failure are detached again.
    pub fn attach_view<S: EventSource>(
        subject: &Arc<S>,
        view: EventView<'_>,
        options: MonitorOptions,
    ) -> Result<Self, MonitorError> {
        let erased: Arc<dyn EventSource> = Arc::clone(subject) as Arc<dyn EventSource>;
        let mut monitor = Self {
            id: Uuid::new_v4(),
            subject: Arc::downgrade(&erased),
            subject_info: SubjectInfo::new(subject, subject.describe()),
            recorders: Vec::new(),
            subscriptions: Vec::new(),
            context: Arc::new(RecordingContext::new(Arc::clone(options.clock()))),
            options,
        };

        for descriptor in subject.events().iter().filter(|d| view.includes(d)) {
            monitor.attach_event(descriptor)?;
        }

        tracing::debug!(
            monitor_id = %monitor.id,
            subject = %monitor.subject_info,
            events = monitor.recorders.len(),
            "monitor attached"
        );
        Ok(monitor)
    }

    fn attach_event(&mut self, descriptor: &EventDescriptor) -> Result<(), MonitorError> {
        let name = descriptor.name();
        if self.recorders.iter().any(|r| r.event_name() == name) {
            tracing::debug!(monitor_id = %self.id, event = name, "event already monitored");
            return Ok(());
        }

        let recorder = Arc::new(EventRecorder::new(
            name,
            descriptor.handler_type(),
            Arc::clone(&self.context),
        ));
        let capture = Arc::clone(&recorder);
        let handler: EventHandler = Arc::new(move |args: &[EventArg]| capture.record(args));
        let id = HandlerId::new();
        let accessor = Arc::clone(descriptor.accessor());
        let added = accessor.add(id, handler);

        // A failing accessor may still have installed the handler.
        self.subscriptions.push(Subscription {
            event: name.to_owned(),
            id,
            accessor,
        });

        match added {
            Ok(()) => {
                tracing::debug!(monitor_id = %self.id, event = name, "attached to event");
                self.recorders.push(recorder);
                Ok(())
            }
            Err(source) => match self.options.broken_accessor_action() {
                BrokenAccessorAction::Fail => Err(MonitorError::Accessor {
                    event: name.to_owned(),
                    source,
                }),
                BrokenAccessorAction::Skip => {
                    tracing::warn!(
                        monitor_id = %self.id,
                        event = name,
                        error = %source,
                        "ignoring broken event accessor; event is not monitored"
                    );
                    // The accessor may have installed the handler anyway.
                    recorder.disable();
                    Ok(())
                }
                BrokenAccessorAction::Record => {
                    tracing::warn!(
                        monitor_id = %self.id,
                        event = name,
                        error = %source,
                        "ignoring broken event accessor; event is still recorded"
                    );
                    self.recorders.push(recorder);
                    Ok(())
                }
            },
        }
    }

    /// Unique id of this monitor, used to correlate log output.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The subject, if it is still alive.
    #[must_use]
    pub fn subject(&self) -> Option<Arc<dyn EventSource>> {
        self.subject.upgrade()
    }

    /// Description and identity of the subject.
    #[must_use]
    pub fn subject_info(&self) -> &SubjectInfo {
        &self.subject_info
    }

    /// The configuration snapshot the monitor was attached with.
    #[must_use]
    pub fn options(&self) -> &MonitorOptions {
        &self.options
    }

    /// The monitored events, in discovery order.
    #[must_use]
    pub fn monitored_events(&self) -> Vec<MonitoredEvent> {
        self.recorders
            .iter()
            .map(|r| MonitoredEvent {
                name: r.event_name().to_owned(),
                handler_type: r.handler_type().to_owned(),
            })
            .collect()
    }

    /// Returns true if a recorder exists for `event_name`.
    #[must_use]
    pub fn is_monitoring(&self, event_name: &str) -> bool {
        self.recorder(event_name).is_some()
    }

    /// Every recorded occurrence of `event_name`.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::EventNotMonitored` if the subject has no such
    /// event or it was skipped because of a broken accessor.
    pub fn get_recording_for(&self, event_name: &str) -> Result<EventRecording, MonitorError> {
        let recorder = self
            .recorder(event_name)
            .ok_or_else(|| MonitorError::EventNotMonitored(event_name.to_owned()))?;
        Ok(EventRecording::new(
            recorder.event_name(),
            recorder.handler_type(),
            self.subject_info.clone(),
            recorder.records(),
        ))
    }

    /// Every recorded occurrence of every event, in raise order.
    #[must_use]
    pub fn occurred_events(&self) -> Vec<EventRecord> {
        let mut all: Vec<EventRecord> = self.recorders.iter().flat_map(|r| r.records()).collect();
        all.sort_by_key(EventRecord::sequence);
        all
    }

    /// Forgets every recorded occurrence. Handlers stay attached and the
    /// sequence keeps counting from where it was.
    pub fn clear(&self) {
        for recorder in &self.recorders {
            recorder.reset();
        }
    }

    /// Returns true once [`Self::dispose`] has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        !self.context.is_active()
    }

    /// Detaches every installed handler. Later occurrences are not recorded;
    /// the ones already recorded stay queryable. Calling it again does nothing.
    ///
    /// # Errors
    ///
    /// Returns `MonitorError::Accessor` for the first remove accessor that
    /// failed, unless the options ignore accessor failures. Every handler is
    /// still attempted.
    pub fn dispose(&mut self) -> Result<(), MonitorError> {
        self.context.deactivate();

        let mut first_failure = None;
        for subscription in self.subscriptions.drain(..) {
            match subscription.accessor.remove(subscription.id) {
                Ok(()) => {
                    tracing::debug!(monitor_id = %self.id, event = %subscription.event, "detached from event");
                }
                Err(source) if self.options.ignores_accessor_exceptions() => {
                    tracing::warn!(
                        monitor_id = %self.id,
                        event = %subscription.event,
                        error = %source,
                        "ignoring broken event accessor while detaching"
                    );
                }
                Err(source) => {
                    if first_failure.is_none() {
                        first_failure = Some(MonitorError::Accessor {
                            event: subscription.event,
                            source,
                        });
                    }
                }
            }
        }

        first_failure.map_or(Ok(()), Err)
    }

    fn recorder(&self, event_name: &str) -> Option<&Arc<EventRecorder>> {
        self.recorders.iter().find(|r| r.event_name() == event_name)
    }
}

impl Drop for EventMonitor {
    fn drop(&mut self) {
        if let Err(err) = self.dispose() {
            tracing::warn!(monitor_id = %self.id, error = %err, "failed to detach monitor");
        }
    }
}

impl fmt::Debug for EventMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventMonitor")
            .field("id", &self.id)
            .field("subject", &self.subject_info.description())
            .field("recorders", &self.recorders)
            .field("subscriptions", &self.subscriptions.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Starts monitoring a shared subject.
pub trait MonitorExt {
    /// Monitors every event with default options.
    ///
    /// # Errors
    ///
    /// See [`EventMonitor::attach`].
    fn monitor(&self) -> Result<EventMonitor, MonitorError> {
        self.monitor_with(MonitorOptions::default())
    }

    /// Monitors every event with `options`.
    ///
    /// # Errors
    ///
    /// See [`EventMonitor::attach`].
    fn monitor_with(&self, options: MonitorOptions) -> Result<EventMonitor, MonitorError>;

    /// Monitors the events exposed through `interface` with default options.
    ///
    /// # Errors
    ///
    /// See [`EventMonitor::attach_as`].
    fn monitor_as(&self, interface: &str) -> Result<EventMonitor, MonitorError> {
        self.monitor_as_with(interface, MonitorOptions::default())
    }

    /// Monitors the events exposed through `interface` with `options`.
    ///
    /// # Errors
    ///
    /// See [`EventMonitor::attach_as`].
    fn monitor_as_with(
        &self,
        interface: &str,
        options: MonitorOptions,
    ) -> Result<EventMonitor, MonitorError>;
}

impl<S: EventSource> MonitorExt for Arc<S> {
    fn monitor_with(&self, options: MonitorOptions) -> Result<EventMonitor, MonitorError> {
        EventMonitor::attach(self, options)
    }

    fn monitor_as_with(
        &self,
        interface: &str,
        options: MonitorOptions,
    ) -> Result<EventMonitor, MonitorError> {
        EventMonitor::attach_as(self, interface, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessorError;
    use crate::slot::EventSlot;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::clock::Clock;

    #[derive(Debug)]
    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Accessor whose add and remove can be made to fail.
    struct FlakyAccessor {
        slot: EventSlot,
        attach_then_fail: bool,
        fail_add: bool,
        fail_remove: AtomicBool,
    }

    impl EventAccessor for FlakyAccessor {
        fn add(&self, id: HandlerId, handler: EventHandler) -> Result<(), AccessorError> {
            if self.fail_add && !self.attach_then_fail {
                return Err(AccessorError::add("subscription refused"));
            }
            self.slot.add(id, handler)?;
            if self.fail_add {
                return Err(AccessorError::add("subscription refused after attaching"));
            }
            Ok(())
        }

        fn remove(&self, id: HandlerId) -> Result<(), AccessorError> {
            if self.fail_remove.load(Ordering::SeqCst) {
                return Err(AccessorError::remove("unsubscription refused"));
            }
            self.slot.remove(id)
        }
    }

    #[derive(Debug, Default)]
    struct Subject {
        first: EventSlot,
        second: EventSlot,
    }

    impl EventSource for Subject {
        fn events(&self) -> Vec<EventDescriptor> {
            vec![
                self.first
                    .descriptor("FirstEvent", "EventHandler")
                    .declared_by("IFirst"),
                self.second.descriptor("SecondEvent", "EventHandler"),
            ]
        }

        fn describe(&self) -> String {
            "Subject".to_owned()
        }
    }

    struct BrokenSubject {
        broken: Arc<FlakyAccessor>,
        working: EventSlot,
    }

    impl BrokenSubject {
        fn new(attach_then_fail: bool, fail_add: bool) -> Arc<Self> {
            Arc::new(Self {
                broken: Arc::new(FlakyAccessor {
                    slot: EventSlot::new(),
                    attach_then_fail,
                    fail_add,
                    fail_remove: AtomicBool::new(false),
                }),
                working: EventSlot::new(),
            })
        }
    }

    impl EventSource for BrokenSubject {
        fn events(&self) -> Vec<EventDescriptor> {
            vec![
                self.working.descriptor("WorkingEvent", "EventHandler"),
                EventDescriptor::new("BrokenEvent", "EventHandler", self.broken.clone()),
            ]
        }
    }

    fn frozen_options() -> MonitorOptions {
        let fixed_now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        MonitorOptions::new().with_clock(Arc::new(FixedClock(fixed_now)))
    }

    #[test]
    fn test_attach_monitors_every_event_in_discovery_order() {
        // Arrange
        let subject = Arc::new(Subject::default());

        // Act
        let monitor = subject.monitor().unwrap();

        // Assert
        let names: Vec<String> = monitor.monitored_events().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["FirstEvent", "SecondEvent"]);
        assert_eq!(subject.first.handler_count(), 1);
        assert_eq!(subject.second.handler_count(), 1);
    }

    #[test]
    fn test_attach_as_interface_limits_events() {
        let subject = Arc::new(Subject::default());

        let monitor = subject.monitor_as("IFirst").unwrap();

        assert!(monitor.is_monitoring("FirstEvent"));
        assert!(!monitor.is_monitoring("SecondEvent"));
        assert_eq!(subject.second.handler_count(), 0);
    }

    #[test]
    fn test_attach_weak_fails_for_dropped_subject() {
        let subject = Arc::new(Subject::default());
        let weak = Arc::downgrade(&subject);
        drop(subject);

        let result = EventMonitor::attach_weak(&weak, MonitorOptions::default());

        assert!(matches!(result, Err(MonitorError::SubjectUnavailable)));
    }

    #[test]
    fn test_sequence_spans_events_under_frozen_clock() {
        // Arrange
        let subject = Arc::new(Subject::default());
        let monitor = subject.monitor_with(frozen_options()).unwrap();

        // Act
        subject.first.raise(&[]);
        subject.second.raise(&[]);
        subject.first.raise(&[]);

        // Assert
        let occurred = monitor.occurred_events();
        let order: Vec<(&str, u64)> = occurred.iter().map(|r| (r.event_name(), r.sequence())).collect();
        assert_eq!(order, [("FirstEvent", 0), ("SecondEvent", 1), ("FirstEvent", 2)]);
        assert!(occurred.iter().all(|r| r.timestamp_utc() == occurred[0].timestamp_utc()));
    }

    #[test]
    fn test_get_recording_for_unknown_event_fails() {
        let subject = Arc::new(Subject::default());
        let monitor = subject.monitor().unwrap();

        let result = monitor.get_recording_for("NonExistingEvent");

        assert!(matches!(result, Err(MonitorError::EventNotMonitored(name)) if name == "NonExistingEvent"));
    }

    #[test]
    fn test_clear_drops_records_but_keeps_handlers_and_sequence() {
        // Arrange
        let subject = Arc::new(Subject::default());
        let monitor = subject.monitor().unwrap();
        subject.first.raise(&[]);

        // Act
        monitor.clear();
        subject.first.raise(&[]);

        // Assert
        let recording = monitor.get_recording_for("FirstEvent").unwrap();
        assert_eq!(recording.len(), 1);
        assert_eq!(recording.records()[0].sequence(), 1);
    }

    #[test]
    fn test_dispose_detaches_and_is_idempotent() {
        // Arrange
        let subject = Arc::new(Subject::default());
        let mut monitor = subject.monitor().unwrap();

        // Act
        monitor.dispose().unwrap();
        monitor.dispose().unwrap();
        subject.first.raise(&[]);

        // Assert
        assert!(monitor.is_disposed());
        assert_eq!(subject.first.handler_count(), 0);
        assert!(monitor.get_recording_for("FirstEvent").unwrap().is_empty());
    }

    #[test]
    fn test_drop_detaches_handlers() {
        let subject = Arc::new(Subject::default());
        let monitor = subject.monitor().unwrap();

        drop(monitor);

        assert_eq!(subject.first.handler_count(), 0);
    }

    #[test]
    fn test_monitor_does_not_keep_subject_alive() {
        let subject = Arc::new(Subject::default());
        let monitor = subject.monitor().unwrap();

        drop(subject);

        assert!(monitor.subject().is_none());
    }

    #[test]
    fn test_broken_add_accessor_fails_attach_by_default() {
        // Arrange
        let subject = BrokenSubject::new(false, true);

        // Act
        let result = subject.monitor();

        // Assert
        assert!(matches!(
            result,
            Err(MonitorError::Accessor { ref event, .. }) if event == "BrokenEvent"
        ));
        assert_eq!(subject.working.handler_count(), 0);
    }

    #[test]
    fn test_ignored_broken_accessor_leaves_event_unmonitored() {
        let subject = BrokenSubject::new(false, true);

        let monitor = subject
            .monitor_with(MonitorOptions::new().ignoring_event_accessor_exceptions())
            .unwrap();

        assert!(monitor.is_monitoring("WorkingEvent"));
        assert!(!monitor.is_monitoring("BrokenEvent"));
    }

    #[test]
    fn test_recording_broken_accessor_captures_occurrences() {
        // Arrange
        let subject = BrokenSubject::new(true, true);
        let monitor = subject
            .monitor_with(
                MonitorOptions::new()
                    .ignoring_event_accessor_exceptions()
                    .recording_events_with_broken_accessor(),
            )
            .unwrap();

        // Act
        subject.broken.slot.raise(&[EventArg::value(1_i32)]);

        // Assert
        assert_eq!(monitor.get_recording_for("BrokenEvent").unwrap().len(), 1);
    }

    #[test]
    fn test_broken_remove_accessor_fails_dispose_unless_ignored() {
        // Arrange
        let strict_subject = BrokenSubject::new(false, false);
        let lenient_subject = BrokenSubject::new(false, false);
        let mut strict = strict_subject.monitor().unwrap();
        let mut lenient = lenient_subject
            .monitor_with(MonitorOptions::new().ignoring_event_accessor_exceptions())
            .unwrap();
        strict_subject.broken.fail_remove.store(true, Ordering::SeqCst);
        lenient_subject.broken.fail_remove.store(true, Ordering::SeqCst);

        // Act
        let strict_result = strict.dispose();
        let lenient_result = lenient.dispose();

        // Assert
        assert!(matches!(strict_result, Err(MonitorError::Accessor { .. })));
        assert!(lenient_result.is_ok());
        assert_eq!(strict_subject.working.handler_count(), 0);
    }
}

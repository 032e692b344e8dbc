//! Assertions over everything a monitor recorded.

use evwatch_core::monitor::EventMonitor;
use evwatch_core::property_changed::{PROPERTY_CHANGED, property_changed_args};
use evwatch_core::record::EventRecord;

use crate::error::AssertionError;
use crate::event_assertion::EventAssertion;
use crate::message;
use crate::scope::{AssertionScope, Reporter};

/// Entry point for asserting on a monitor.
pub trait ShouldExt {
    /// Starts an assertion over the recorded events.
    fn should(&self) -> EventAssertions<'_>;
}

impl ShouldExt for EventMonitor {
    fn should(&self) -> EventAssertions<'_> {
        EventAssertions::new(self)
    }
}

/// Assertions over the events recorded by one monitor.
#[derive(Debug)]
pub struct EventAssertions<'a> {
    monitor: &'a EventMonitor,
    reporter: Reporter<'a>,
    reason: Option<String>,
}

impl<'a> EventAssertions<'a> {
    /// Asserts on `monitor`, failing immediately.
    #[must_use]
    pub fn new(monitor: &'a EventMonitor) -> Self {
        Self {
            monitor,
            reporter: Reporter::Immediate,
            reason: None,
        }
    }

    /// Explains the expectation in failure messages of assertions made
    /// through this value.
    #[must_use]
    pub fn because(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Collects failures into `scope` instead of returning them.
    #[must_use]
    pub fn within(mut self, scope: &'a AssertionScope) -> Self {
        self.reporter = Reporter::Scoped(scope);
        self
    }

    /// Asserts that `event_name` was raised at least once.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::InvalidArgument` for an empty event name,
    /// `AssertionError::Monitor` if the event is not monitored, and
    /// `AssertionError::Failed` if it was never raised.
    pub fn raise(&self, event_name: &str) -> Result<EventAssertion<'a>, AssertionError> {
        if event_name.is_empty() {
            return Err(AssertionError::InvalidArgument(
                "the name of the event to assert on cannot be empty".to_owned(),
            ));
        }
        let recording = self.monitor.get_recording_for(event_name)?;
        if recording.is_empty() {
            self.reporter.fail(format!(
                "Expected object {} to raise event \"{event_name}\"{}, but it did not.",
                self.subject(),
                self.reason_text(),
            ))?;
        }
        Ok(EventAssertion::new(recording, self.reporter, self.reason_text()))
    }

    /// Asserts that `event_name` was never raised.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::InvalidArgument` for an empty event name,
    /// `AssertionError::Monitor` if the event is not monitored, and
    /// `AssertionError::Failed` listing the occurrences if it was raised.
    pub fn not_raise(&self, event_name: &str) -> Result<(), AssertionError> {
        if event_name.is_empty() {
            return Err(AssertionError::InvalidArgument(
                "the name of the event to assert on cannot be empty".to_owned(),
            ));
        }
        let recording = self.monitor.get_recording_for(event_name)?;
        if !recording.is_empty() {
            self.reporter.fail(format!(
                "Expected object {} to not raise event \"{event_name}\"{}, but it did: {}",
                self.subject(),
                self.reason_text(),
                message::records(recording.records()),
            ))?;
        }
        Ok(())
    }

    /// Asserts that `PropertyChanged` was raised for `property`, or for any
    /// property when `None`. A notification without a property name covers
    /// every property.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::InvalidArgument` if `property` is not a
    /// simple name, `AssertionError::Monitor` if the subject has no
    /// `PropertyChanged` event, and `AssertionError::Failed` if no matching
    /// notification was raised.
    pub fn raise_property_change_for(
        &self,
        property: Option<&str>,
    ) -> Result<EventAssertion<'a>, AssertionError> {
        validate_property(property)?;
        let recording = self.monitor.get_recording_for(PROPERTY_CHANGED)?;

        if recording.is_empty() {
            self.reporter.fail(format!(
                "Expected object {} to raise event \"{PROPERTY_CHANGED}\" for property {}{}, but it did not raise that event at all.",
                self.subject(),
                describe_property(property),
                self.reason_text(),
            ))?;
            return Ok(EventAssertion::new(recording, self.reporter, self.reason_text()));
        }

        let narrowed = match property {
            None => recording.clone(),
            Some(property) => recording.filter(|record| {
                property_changed_args(record).is_some_and(|args| args.affects(property))
            }),
        };
        if narrowed.is_empty() {
            self.reporter.fail(format!(
                "Expected object {} to raise event \"{PROPERTY_CHANGED}\" for property {}{}, but it was only raised for {}.",
                self.subject(),
                describe_property(property),
                self.reason_text(),
                message::list(raised_properties(recording.records())),
            ))?;
        }
        Ok(EventAssertion::new(narrowed, self.reporter, self.reason_text()))
    }

    /// Asserts that `PropertyChanged` was never raised naming `property`, or
    /// never raised at all when `None`.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::InvalidArgument` if `property` is not a
    /// simple name, `AssertionError::Monitor` if the subject has no
    /// `PropertyChanged` event, and `AssertionError::Failed` if such a
    /// notification was raised.
    pub fn not_raise_property_change_for(&self, property: Option<&str>) -> Result<(), AssertionError> {
        validate_property(property)?;
        let recording = self.monitor.get_recording_for(PROPERTY_CHANGED)?;

        let raised = match property {
            None => !recording.is_empty(),
            Some(property) => recording.iter().any(|record| {
                property_changed_args(record).and_then(|args| args.property_name()) == Some(property)
            }),
        };
        if raised {
            self.reporter.fail(format!(
                "Did not expect object {} to raise the \"{PROPERTY_CHANGED}\" event for property {}{}, but it did.",
                self.subject(),
                describe_property(property),
                self.reason_text(),
            ))?;
        }
        Ok(())
    }

    fn subject(&self) -> &str {
        self.monitor.subject_info().description()
    }

    fn reason_text(&self) -> String {
        message::because(self.reason.as_deref())
    }
}

fn validate_property(property: Option<&str>) -> Result<(), AssertionError> {
    match property {
        Some(name) if !message::is_identifier(name) => Err(AssertionError::InvalidArgument(format!(
            "expected the name of a property, but found \"{name}\""
        ))),
        _ => Ok(()),
    }
}

fn describe_property(property: Option<&str>) -> String {
    property.map_or_else(|| "<any>".to_owned(), |name| format!("\"{name}\""))
}

/// Distinct property names the notifications were raised for, in order.
fn raised_properties(records: &[EventRecord]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records {
        let name = property_changed_args(record)
            .and_then(|args| args.property_name())
            .map_or_else(|| "<all>".to_owned(), |name| format!("\"{name}\""));
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

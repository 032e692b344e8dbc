//! Read-only views over recorded occurrences.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::arg::address_of;
use crate::record::EventRecord;

/// Identity and description of a monitored subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectInfo {
    description: String,
    #[serde(skip)]
    address: usize,
}

impl SubjectInfo {
    pub(crate) fn new<T: ?Sized>(subject: &Arc<T>, description: String) -> Self {
        Self {
            description,
            address: address_of(subject),
        }
    }

    /// Human-readable description of the subject.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true if `object` is the monitored subject.
    #[must_use]
    pub fn is<T: ?Sized>(&self, object: &Arc<T>) -> bool {
        self.address == address_of(object)
    }
}

impl fmt::Display for SubjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

/// The occurrences of one event, possibly narrowed by filters.
#[derive(Debug, Clone)]
pub struct EventRecording {
    event_name: String,
    event_handler_type: String,
    event_object: SubjectInfo,
    records: Vec<EventRecord>,
}

impl EventRecording {
    pub(crate) fn new(
        event_name: impl Into<String>,
        event_handler_type: impl Into<String>,
        event_object: SubjectInfo,
        records: Vec<EventRecord>,
    ) -> Self {
        Self {
            event_name: event_name.into(),
            event_handler_type: event_handler_type.into(),
            event_object,
            records,
        }
    }

    /// Name of the recorded event.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// Handler shape of the recorded event.
    #[must_use]
    pub fn event_handler_type(&self) -> &str {
        &self.event_handler_type
    }

    /// The monitored subject.
    #[must_use]
    pub fn event_object(&self) -> &SubjectInfo {
        &self.event_object
    }

    /// The occurrences in this view, in raise order.
    #[must_use]
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Iterates over the occurrences in this view.
    pub fn iter(&self) -> std::slice::Iter<'_, EventRecord> {
        self.records.iter()
    }

    /// Number of occurrences in this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the view holds no occurrence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The first occurrence, if any.
    #[must_use]
    pub fn first(&self) -> Option<&EventRecord> {
        self.records.first()
    }

    /// A view with only the occurrences matching `predicate`.
    #[must_use]
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&EventRecord) -> bool,
    {
        Self {
            event_name: self.event_name.clone(),
            event_handler_type: self.event_handler_type.clone(),
            event_object: self.event_object.clone(),
            records: self
                .records
                .iter()
                .filter(|record| predicate(record))
                .cloned()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EventRecording {
    type Item = &'a EventRecord;
    type IntoIter = std::slice::Iter<'a, EventRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

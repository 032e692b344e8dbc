//! The conventional property-change notification event.

use crate::record::EventRecord;

/// Name of the property-change notification event.
pub const PROPERTY_CHANGED: &str = "PropertyChanged";

/// Handler shape of [`PROPERTY_CHANGED`].
pub const PROPERTY_CHANGED_HANDLER: &str = "PropertyChangedEventHandler";

/// Argument of a [`PROPERTY_CHANGED`] event.
///
/// A missing or empty property name means every property changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PropertyChangedArgs {
    property_name: Option<String>,
}

impl PropertyChangedArgs {
    /// Notification for a single property.
    #[must_use]
    pub fn new(property_name: impl Into<String>) -> Self {
        Self {
            property_name: Some(property_name.into()),
        }
    }

    /// Notification that every property changed.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// The changed property, if a single one was named.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    /// Returns true if the notification covers every property.
    #[must_use]
    pub fn affects_all_properties(&self) -> bool {
        self.property_name.as_deref().is_none_or(str::is_empty)
    }

    /// Returns true if the notification covers `property`.
    #[must_use]
    pub fn affects(&self, property: &str) -> bool {
        self.affects_all_properties() || self.property_name.as_deref() == Some(property)
    }
}

/// The property-change argument of a recorded occurrence, if it has one.
#[must_use]
pub fn property_changed_args(record: &EventRecord) -> Option<&PropertyChangedArgs> {
    record.args_of::<PropertyChangedArgs>().next()
}

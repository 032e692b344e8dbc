//! Event introspection: how a subject exposes its events to a monitor.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::arg::EventArg;
use crate::error::AccessorError;

/// Callable installed on an event. Receives the positional arguments of one
/// invocation, whatever the event's shape.
pub type EventHandler = Arc<dyn Fn(&[EventArg]) + Send + Sync>;

/// Identity of an installed handler, chosen by the party that installs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    /// Creates a fresh, unique handler id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HandlerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Add and remove operations of a single event.
///
/// Implementations may fail. A failing `add` may or may not have installed
/// the handler before reporting the error; `remove` is called with the same
/// id either way.
pub trait EventAccessor: Send + Sync {
    /// Subscribes `handler` under `id`.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError` if the subject refuses the subscription.
    fn add(&self, id: HandlerId, handler: EventHandler) -> Result<(), AccessorError>;

    /// Unsubscribes the handler registered under `id`. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns `AccessorError` if the subject fails to unsubscribe.
    fn remove(&self, id: HandlerId) -> Result<(), AccessorError>;
}

/// Metadata and accessors of one event exposed by a subject.
#[derive(Clone)]
pub struct EventDescriptor {
    name: String,
    handler_type: String,
    parameter_types: Vec<&'static str>,
    declared_by: Vec<&'static str>,
    accessor: Arc<dyn EventAccessor>,
}

impl EventDescriptor {
    /// Creates a descriptor for the event `name`, whose handlers have the
    /// shape named by `handler_type`.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        handler_type: impl Into<String>,
        accessor: Arc<dyn EventAccessor>,
    ) -> Self {
        Self {
            name: name.into(),
            handler_type: handler_type.into(),
            parameter_types: Vec::new(),
            declared_by: Vec::new(),
            accessor,
        }
    }

    /// Sets the type names of the handler's positional parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameter_types: &[&'static str]) -> Self {
        self.parameter_types = parameter_types.to_vec();
        self
    }

    /// Marks the event as declared by `interface`. Call once per interface
    /// that exposes it, inherited interfaces included.
    #[must_use]
    pub fn declared_by(mut self, interface: &'static str) -> Self {
        self.declared_by.push(interface);
        self
    }

    /// Event name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the handler shape.
    #[must_use]
    pub fn handler_type(&self) -> &str {
        &self.handler_type
    }

    /// Type names of the handler's positional parameters.
    #[must_use]
    pub fn parameter_types(&self) -> &[&'static str] {
        &self.parameter_types
    }

    /// Returns true if `interface` declares this event.
    #[must_use]
    pub fn is_declared_by(&self, interface: &str) -> bool {
        self.declared_by.iter().any(|declared| *declared == interface)
    }

    /// The event's add/remove operations.
    #[must_use]
    pub fn accessor(&self) -> &Arc<dyn EventAccessor> {
        &self.accessor
    }
}

impl fmt::Debug for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDescriptor")
            .field("name", &self.name)
            .field("handler_type", &self.handler_type)
            .field("parameter_types", &self.parameter_types)
            .field("declared_by", &self.declared_by)
            .finish_non_exhaustive()
    }
}

/// A subject whose events can be monitored.
pub trait EventSource: Send + Sync + 'static {
    /// Every event the subject exposes, in declaration order.
    fn events(&self) -> Vec<EventDescriptor>;

    /// Human-readable description used in failure messages.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_owned()
    }
}

/// Which events of a subject a monitor attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventView<'a> {
    /// Every event the subject exposes.
    #[default]
    Subject,
    /// Only the events declared by the named interface.
    Interface(&'a str),
}

impl EventView<'_> {
    /// Returns true if `descriptor` is visible through this view.
    #[must_use]
    pub fn includes(&self, descriptor: &EventDescriptor) -> bool {
        match self {
            Self::Subject => true,
            Self::Interface(interface) => descriptor.is_declared_by(interface),
        }
    }
}

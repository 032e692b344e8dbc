//! Sample subjects: `EventSource` implementations exercised by tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use evwatch_core::arg::EventArg;
use evwatch_core::error::AccessorError;
use evwatch_core::property_changed::{PROPERTY_CHANGED, PROPERTY_CHANGED_HANDLER, PropertyChangedArgs};
use evwatch_core::slot::EventSlot;
use evwatch_core::source::{EventAccessor, EventDescriptor, EventHandler, EventSource, HandlerId};

/// Interface declaring `InterfaceEvent`.
pub const INTERFACE: &str = "IEventRaisingInterface";
/// Interface declaring `Interface2Event`.
pub const INTERFACE_2: &str = "IEventRaisingInterface2";
/// Interface declaring `Interface3Event`.
pub const INTERFACE_3: &str = "IEventRaisingInterface3";
/// Interface inheriting both [`INTERFACE`] and [`INTERFACE_3`].
pub const INHERITING_INTERFACE: &str = "IInheritingEventRaisingInterface";

fn sender_of<T>(me: &Weak<T>) -> EventArg
where
    T: std::fmt::Debug + Send + Sync + 'static,
{
    me.upgrade().map_or_else(EventArg::null, EventArg::object)
}

/// A subject with a single `PropertyChanged` event.
#[derive(Debug)]
pub struct PropertyChangedSubject {
    me: Weak<Self>,
    property_changed: EventSlot,
}

impl PropertyChangedSubject {
    /// Create a new shared subject.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            property_changed: EventSlot::new(),
        })
    }

    /// Raise `PropertyChanged` with the subject as sender. `None` notifies
    /// that every property changed.
    pub fn raise_property_changed(&self, property: Option<&str>) {
        self.raise_property_changed_from(sender_of(&self.me), property);
    }

    /// Raise `PropertyChanged` with an arbitrary sender.
    pub fn raise_property_changed_from(&self, sender: EventArg, property: Option<&str>) {
        let args = property.map_or_else(PropertyChangedArgs::all, PropertyChangedArgs::new);
        self.property_changed.raise(&[sender, EventArg::value(args)]);
    }

    /// Number of handlers currently attached to `PropertyChanged`.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.property_changed.handler_count()
    }
}

impl EventSource for PropertyChangedSubject {
    fn events(&self) -> Vec<EventDescriptor> {
        vec![
            self.property_changed
                .descriptor(PROPERTY_CHANGED, PROPERTY_CHANGED_HANDLER)
                .with_parameters(&["object", "PropertyChangedEventArgs"])
                .declared_by("INotifyPropertyChanged"),
        ]
    }

    fn describe(&self) -> String {
        "PropertyChangedSubject".to_owned()
    }
}

/// A subject whose event does not follow the `(sender, args)` shape.
#[derive(Debug, Default)]
pub struct NonConventionalSubject {
    non_conventional: EventSlot,
}

impl NonConventionalSubject {
    /// Create a new shared subject.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Raise `NonConventionalEvent(string, int, string)`.
    pub fn raise(&self, first: &str, second: i32, third: &str) {
        self.non_conventional.raise(&[
            EventArg::value(first.to_owned()),
            EventArg::value(second),
            EventArg::value(third.to_owned()),
        ]);
    }
}

impl EventSource for NonConventionalSubject {
    fn events(&self) -> Vec<EventDescriptor> {
        vec![
            self.non_conventional
                .descriptor("NonConventionalEvent", "NonConventionalEventHandler")
                .with_parameters(&["string", "int", "string"]),
        ]
    }

    fn describe(&self) -> String {
        "NonConventionalSubject".to_owned()
    }
}

/// A subject implementing several event-raising interfaces.
#[derive(Debug)]
pub struct EventRaisingClass {
    me: Weak<Self>,
    interface_event: EventSlot,
    interface2_event: EventSlot,
    interface3_event: EventSlot,
}

impl EventRaisingClass {
    /// Create a new shared subject.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            interface_event: EventSlot::new(),
            interface2_event: EventSlot::new(),
            interface3_event: EventSlot::new(),
        })
    }

    /// Raise `InterfaceEvent`.
    pub fn raise_interface_event(&self) {
        self.interface_event.raise(&[sender_of(&self.me), EventArg::null()]);
    }

    /// Raise `Interface2Event`.
    pub fn raise_interface2_event(&self) {
        self.interface2_event.raise(&[sender_of(&self.me), EventArg::null()]);
    }

    /// Raise `Interface3Event`.
    pub fn raise_interface3_event(&self) {
        self.interface3_event.raise(&[sender_of(&self.me), EventArg::null()]);
    }
}

impl EventSource for EventRaisingClass {
    fn events(&self) -> Vec<EventDescriptor> {
        vec![
            self.interface_event
                .descriptor("InterfaceEvent", "EventHandler")
                .with_parameters(&["object", "EventArgs"])
                .declared_by(INTERFACE)
                .declared_by(INHERITING_INTERFACE),
            self.interface2_event
                .descriptor("Interface2Event", "EventHandler")
                .with_parameters(&["object", "EventArgs"])
                .declared_by(INTERFACE_2),
            self.interface3_event
                .descriptor("Interface3Event", "EventHandler")
                .with_parameters(&["object", "EventArgs"])
                .declared_by(INTERFACE_3)
                .declared_by(INHERITING_INTERFACE),
        ]
    }

    fn describe(&self) -> String {
        "EventRaisingClass".to_owned()
    }
}

/// Payload type used for typed-argument filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct B {
    /// Payload value.
    pub value: i32,
}

/// Payload type unrelated to [`B`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct C {
    /// Payload value.
    pub value: i32,
}

/// A subject whose `Emitted` event carries a typed payload after the sender.
#[derive(Debug)]
pub struct TypedArgsSubject {
    me: Weak<Self>,
    emitted: EventSlot,
}

impl TypedArgsSubject {
    /// Create a new shared subject.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            me: me.clone(),
            emitted: EventSlot::new(),
        })
    }

    /// Raise `Emitted(sender, B)`.
    pub fn emit_b(&self, value: i32) {
        self.emitted
            .raise(&[sender_of(&self.me), EventArg::value(B { value })]);
    }

    /// Raise `Emitted(sender, C)`.
    pub fn emit_c(&self, value: i32) {
        self.emitted
            .raise(&[sender_of(&self.me), EventArg::value(C { value })]);
    }
}

impl EventSource for TypedArgsSubject {
    fn events(&self) -> Vec<EventDescriptor> {
        vec![
            self.emitted
                .descriptor("Emitted", "EmittedEventHandler")
                .with_parameters(&["object", "object"]),
        ]
    }

    fn describe(&self) -> String {
        "TypedArgsSubject".to_owned()
    }
}

/// Accessor that fails on add and, optionally, on remove.
#[derive(Debug)]
struct BrokenAccessor {
    slot: EventSlot,
    attach_before_failing: bool,
    fail_remove: AtomicBool,
}

impl EventAccessor for BrokenAccessor {
    fn add(&self, id: HandlerId, handler: EventHandler) -> Result<(), AccessorError> {
        if self.attach_before_failing {
            self.slot.add(id, handler)?;
        }
        Err(AccessorError::add("the add accessor of BrokenEvent is broken"))
    }

    fn remove(&self, id: HandlerId) -> Result<(), AccessorError> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(AccessorError::remove("the remove accessor of BrokenEvent is broken"));
        }
        self.slot.remove(id)
    }
}

/// A subject with one working event and one event whose add accessor fails.
#[derive(Debug)]
pub struct BrokenAccessorSubject {
    working: EventSlot,
    broken: Arc<BrokenAccessor>,
}

impl BrokenAccessorSubject {
    /// The broken add accessor fails without installing the handler.
    #[must_use]
    pub fn refusing() -> Arc<Self> {
        Self::build(false)
    }

    /// The broken add accessor installs the handler, then fails.
    #[must_use]
    pub fn attaching_then_failing() -> Arc<Self> {
        Self::build(true)
    }

    fn build(attach_before_failing: bool) -> Arc<Self> {
        Arc::new(Self {
            working: EventSlot::new(),
            broken: Arc::new(BrokenAccessor {
                slot: EventSlot::new(),
                attach_before_failing,
                fail_remove: AtomicBool::new(false),
            }),
        })
    }

    /// Make the broken event's remove accessor fail from now on.
    pub fn break_remove_accessor(&self) {
        self.broken.fail_remove.store(true, Ordering::SeqCst);
    }

    /// Raise `WorkingEvent`.
    pub fn raise_working(&self) {
        self.working.raise(&[EventArg::null(), EventArg::null()]);
    }

    /// Raise `BrokenEvent` to whatever handlers ended up attached.
    pub fn raise_broken(&self) {
        self.broken.slot.raise(&[EventArg::null(), EventArg::null()]);
    }

    /// Number of handlers attached to `WorkingEvent`.
    #[must_use]
    pub fn working_handler_count(&self) -> usize {
        self.working.handler_count()
    }

    /// Number of handlers attached to `BrokenEvent`.
    #[must_use]
    pub fn broken_handler_count(&self) -> usize {
        self.broken.slot.handler_count()
    }
}

impl EventSource for BrokenAccessorSubject {
    fn events(&self) -> Vec<EventDescriptor> {
        vec![
            self.working.descriptor("WorkingEvent", "EventHandler"),
            EventDescriptor::new("BrokenEvent", "EventHandler", self.broken.clone()),
        ]
    }

    fn describe(&self) -> String {
        "BrokenAccessorSubject".to_owned()
    }
}

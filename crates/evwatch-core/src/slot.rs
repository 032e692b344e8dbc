//! Field-like events that subjects embed.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::arg::EventArg;
use crate::error::AccessorError;
use crate::source::{EventAccessor, EventDescriptor, EventHandler, HandlerId};

#[derive(Default)]
struct SlotInner {
    handlers: Mutex<Vec<(HandlerId, EventHandler)>>,
}

/// A subscribable event: a list of handlers plus a way to raise them.
///
/// Cloning a slot yields another handle to the same handler list.
#[derive(Clone, Default)]
pub struct EventSlot {
    inner: Arc<SlotInner>,
}

impl EventSlot {
    /// Creates a slot with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Invokes every subscribed handler with `args`, in subscription order.
    ///
    /// Handlers run outside the slot's lock, so they may subscribe or
    /// unsubscribe while being invoked.
    pub fn raise(&self, args: &[EventArg]) {
        let handlers: Vec<EventHandler> = self
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();
        for handler in handlers {
            handler(args);
        }
    }

    /// Number of subscribed handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.lock().len()
    }

    /// Builds a descriptor for this slot under `name`.
    #[must_use]
    pub fn descriptor(
        &self,
        name: impl Into<String>,
        handler_type: impl Into<String>,
    ) -> EventDescriptor {
        EventDescriptor::new(name, handler_type, Arc::new(self.clone()))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(HandlerId, EventHandler)>> {
        self.inner
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventAccessor for EventSlot {
    fn add(&self, id: HandlerId, handler: EventHandler) -> Result<(), AccessorError> {
        self.lock().push((id, handler));
        Ok(())
    }

    fn remove(&self, id: HandlerId) -> Result<(), AccessorError> {
        self.lock().retain(|(existing, _)| *existing != id);
        Ok(())
    }
}

impl fmt::Debug for EventSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSlot")
            .field("handlers", &self.handler_count())
            .finish()
    }
}

//! Type-erased event arguments.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

type ArgValue = Arc<dyn Any + Send + Sync>;

/// One positional argument of a raised event.
///
/// The value is shared, so cloning an argument never clones the payload, and
/// an argument built from an existing `Arc` keeps that allocation's identity.
/// Sender comparisons rely on that identity.
#[derive(Clone)]
pub struct EventArg {
    value: Option<ArgValue>,
    type_name: &'static str,
    rendered: String,
}

impl EventArg {
    /// Wraps an owned value.
    #[must_use]
    pub fn value<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        Self::object(Arc::new(value))
    }

    /// Wraps a shared object, keeping its identity (e.g. the sender).
    #[must_use]
    pub fn object<T>(object: Arc<T>) -> Self
    where
        T: Any + Send + Sync + fmt::Debug,
    {
        let rendered = format!("{object:?}");
        let value: ArgValue = object;
        Self {
            value: Some(value),
            type_name: type_name::<T>(),
            rendered,
        }
    }

    /// An absent argument.
    #[must_use]
    pub fn null() -> Self {
        Self {
            value: None,
            type_name: "null",
            rendered: "<null>".to_owned(),
        }
    }

    /// Returns true if this argument carries no value.
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the value if it is exactly of type `T`.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_deref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Returns true if the value is exactly of type `T`.
    #[must_use]
    pub fn is<T: Any>(&self) -> bool {
        self.value.as_deref().is_some_and(|v| v.is::<T>())
    }

    /// Name of the type the argument was created from.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// `Debug` rendering captured when the argument was created.
    #[must_use]
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Returns true if this argument is the same allocation as `object`.
    #[must_use]
    pub fn is_same_object<T: ?Sized>(&self, object: &Arc<T>) -> bool {
        self.address() == Some(address_of(object))
    }

    /// Address of the shared value, if any.
    #[must_use]
    pub fn address(&self) -> Option<usize> {
        self.value.as_ref().map(address_of)
    }
}

/// Address of the data an `Arc` points to, ignoring any pointer metadata.
#[must_use]
pub fn address_of<T: ?Sized>(object: &Arc<T>) -> usize {
    Arc::as_ptr(object).cast::<()>().addr()
}

impl fmt::Debug for EventArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl Serialize for EventArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.rendered)
    }
}

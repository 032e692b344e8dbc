//! Fluent assertions over the events an [`EventMonitor`] recorded.
//!
//! ```
//! use evwatch_assertions::ShouldExt;
//! # use std::sync::Arc;
//! # use evwatch_core::arg::EventArg;
//! # use evwatch_core::monitor::MonitorExt;
//! # use evwatch_core::slot::EventSlot;
//! # use evwatch_core::source::{EventDescriptor, EventSource};
//! # #[derive(Default)]
//! # struct Door { opened: EventSlot }
//! # impl EventSource for Door {
//! #     fn events(&self) -> Vec<EventDescriptor> {
//! #         vec![self.opened.descriptor("Opened", "EventHandler")]
//! #     }
//! # }
//! let door = Arc::new(Door::default());
//! let monitor = door.monitor()?;
//!
//! door.opened.raise(&[EventArg::object(Arc::new(7_u32))]);
//!
//! monitor
//!     .should()
//!     .raise("Opened")?
//!     .with_args(vec![evwatch_assertions::arg!(|n: &u32| *n == 7)])?
//!     .contain_single()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! [`EventMonitor`]: evwatch_core::monitor::EventMonitor

pub mod error;
pub mod event_assertion;
pub mod event_assertions;
mod matching;
mod message;
pub mod predicate;
pub mod scope;

pub use error::AssertionError;
pub use event_assertion::EventAssertion;
pub use event_assertions::{EventAssertions, ShouldExt};
pub use predicate::ArgPredicate;
pub use scope::AssertionScope;

//! Shared test clocks, sample subjects and tracing setup for evwatch.

mod clock;
mod logging;
mod subjects;

pub use clock::{FixedClock, SteppingClock};
pub use logging::init_test_tracing;
pub use subjects::{
    B, BrokenAccessorSubject, C, EventRaisingClass, INHERITING_INTERFACE, INTERFACE,
    INTERFACE_2, INTERFACE_3, NonConventionalSubject, PropertyChangedSubject, TypedArgsSubject,
};

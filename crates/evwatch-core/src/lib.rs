//! evwatch core: event capture for test subjects.
//!
//! A subject describes its events through [`source::EventSource`]. An
//! [`monitor::EventMonitor`] attaches a capture handler to each of them and
//! records every occurrence with a per-monitor sequence number and a
//! timestamp taken from an injectable [`clock::Clock`]. Recorded occurrences
//! are queried through [`recording::EventRecording`].

pub mod arg;
pub mod clock;
pub mod error;
pub mod monitor;
pub mod options;
pub mod property_changed;
pub mod record;
pub mod recorder;
pub mod recording;
pub mod slot;
pub mod source;

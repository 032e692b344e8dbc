//! Narrowing the occurrences of one raised event.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use evwatch_core::arg::EventArg;
use evwatch_core::record::EventRecord;
use evwatch_core::recording::EventRecording;

use crate::error::AssertionError;
use crate::matching::assign_in_order;
use crate::message;
use crate::predicate::ArgPredicate;
use crate::scope::Reporter;

/// The occurrences of an event that passed every assertion so far.
///
/// Each narrowing step keeps only the matching occurrences and fails when
/// none are left.
#[derive(Debug)]
pub struct EventAssertion<'a> {
    recording: EventRecording,
    reporter: Reporter<'a>,
    because: String,
}

impl<'a> EventAssertion<'a> {
    pub(crate) fn new(recording: EventRecording, reporter: Reporter<'a>, because: String) -> Self {
        Self {
            recording,
            reporter,
            because,
        }
    }

    /// Keeps the occurrences whose sender is `expected`.
    ///
    /// The sender is the first argument, compared by identity.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::Failed` if no occurrence was sent by
    /// `expected`.
    pub fn with_sender<T>(self, expected: &Arc<T>) -> Result<Self, AssertionError>
    where
        T: fmt::Debug + ?Sized,
    {
        let narrowed = self
            .recording
            .filter(|record| record.sender().is_some_and(|sender| sender.is_same_object(expected)));

        if narrowed.is_empty() {
            let actual = self
                .recording
                .iter()
                .map(|record| record.sender().map_or("<no sender>", EventArg::rendered));
            self.reporter.fail(format!(
                "Expected sender {expected:?} for {}{}, but found {}.",
                self.describe_event(),
                self.because,
                message::list(actual),
            ))?;
        }
        Ok(self.narrowed(narrowed))
    }

    /// Keeps the occurrences with arguments of type `T` matching
    /// `predicates`.
    ///
    /// Predicates are paired with the `T`-typed arguments in order; arguments
    /// of other types and unpaired ones are skipped. Without predicates, any
    /// occurrence carrying a `T` is kept.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::InvalidArgument` if any occurrence has fewer
    /// `T`-typed arguments than there are predicates, and
    /// `AssertionError::Failed` if no occurrence matches.
    pub fn with_args<T: Any>(self, predicates: Vec<ArgPredicate<T>>) -> Result<Self, AssertionError> {
        let too_few = self
            .recording
            .iter()
            .map(|record| record.args_of::<T>().count())
            .find(|&typed| typed < predicates.len());
        if let Some(typed) = too_few {
            return Err(AssertionError::InvalidArgument(format!(
                "Expected {} to have at least {} parameters of type {}, but only found {typed}.",
                self.describe_event(),
                predicates.len(),
                type_name::<T>(),
            )));
        }

        let narrowed = self.recording.filter(|record| {
            let values: Vec<&T> = record.args_of::<T>().collect();
            !values.is_empty() && assign_in_order(&values, &predicates)
        });

        if narrowed.is_empty() {
            let matching = if predicates.is_empty() {
                String::new()
            } else {
                format!(
                    " that matches {}",
                    message::list(predicates.iter().map(|p| format!("({})", p.text())))
                )
            };
            self.reporter.fail(format!(
                "Expected {} to have some argument of type <{}>{matching}{}, but found none.",
                self.describe_event(),
                type_name::<T>(),
                self.because,
            ))?;
        }
        Ok(self.narrowed(narrowed))
    }

    /// Asserts how many occurrences are left.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::Failed` if the count differs.
    pub fn has_count(self, expected: usize) -> Result<Self, AssertionError> {
        let actual = self.recording.len();
        if actual != expected {
            self.reporter.fail(format!(
                "Expected {} to be raised {expected} time(s){}, but it was raised {actual} time(s).",
                self.describe_event(),
                self.because,
            ))?;
        }
        Ok(self)
    }

    /// Asserts exactly one occurrence is left.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::Failed` otherwise.
    pub fn contain_single(self) -> Result<Self, AssertionError> {
        let actual = self.recording.len();
        if actual != 1 {
            self.reporter.fail(format!(
                "Expected {} to be raised exactly once{}, but found {}.",
                self.describe_event(),
                self.because,
                message::records(self.recording.records()),
            ))?;
        }
        Ok(self)
    }

    /// The occurrences left.
    #[must_use]
    pub fn recording(&self) -> &EventRecording {
        &self.recording
    }

    /// The first occurrence left, if any.
    #[must_use]
    pub fn first(&self) -> Option<&EventRecord> {
        self.recording.first()
    }

    /// Ends the chain, keeping the occurrences left.
    #[must_use]
    pub fn into_recording(self) -> EventRecording {
        self.recording
    }

    fn describe_event(&self) -> String {
        format!(
            "event \"{}\" of object {}",
            self.recording.event_name(),
            self.recording.event_object(),
        )
    }

    fn narrowed(self, recording: EventRecording) -> Self {
        Self { recording, ..self }
    }
}

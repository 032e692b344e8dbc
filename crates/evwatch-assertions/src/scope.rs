//! Collecting failures from several assertions before reporting them.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::AssertionError;

/// Collects expectation failures instead of failing on the first one.
///
/// Usage errors and monitor errors are never deferred. Call
/// [`AssertionScope::finish`] to get the collected failures as one error;
/// dropping a scope that still holds failures panics with them, unless the
/// thread is already panicking.
#[derive(Debug, Default)]
pub struct AssertionScope {
    failures: Mutex<Vec<String>>,
}

impl AssertionScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if at least one failure was collected.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.lock().is_empty()
    }

    /// The failures collected so far, in the order they happened.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Ends the scope.
    ///
    /// # Errors
    ///
    /// Returns `AssertionError::Failed` with every collected failure, one
    /// per line.
    pub fn finish(self) -> Result<(), AssertionError> {
        let failures = std::mem::take(&mut *self.lock());
        if failures.is_empty() {
            Ok(())
        } else {
            Err(AssertionError::Failed(failures.join("\n")))
        }
    }

    pub(crate) fn push(&self, failure: String) {
        self.lock().push(failure);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.failures.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for AssertionScope {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let failures = std::mem::take(
            self.failures
                .get_mut()
                .unwrap_or_else(PoisonError::into_inner),
        );
        assert!(failures.is_empty(), "{}", failures.join("\n"));
    }
}

/// Where an assertion sends its failure.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) enum Reporter<'s> {
    #[default]
    Immediate,
    Scoped(&'s AssertionScope),
}

impl Reporter<'_> {
    /// Reports `message` as a failure. Returns it as an error when there is
    /// no scope to collect it.
    pub(crate) fn fail(self, message: String) -> Result<(), AssertionError> {
        tracing::debug!(failure = %message, "event assertion failed");
        match self {
            Self::Immediate => Err(AssertionError::Failed(message)),
            Self::Scoped(scope) => {
                scope.push(message);
                Ok(())
            }
        }
    }
}

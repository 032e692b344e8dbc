//! Argument predicates that remember their own source text.

use std::fmt;

type Test<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// A test applied to one event argument of type `T`.
///
/// The text is what failure messages show; [`arg!`](crate::arg) fills it in
/// from the closure's source.
pub struct ArgPredicate<T> {
    text: String,
    test: Option<Test<T>>,
}

impl<T> ArgPredicate<T> {
    /// Creates a predicate described by `text`.
    pub fn new<F>(text: impl Into<String>, test: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            text: text.into(),
            test: Some(Box::new(test)),
        }
    }

    /// A predicate that matches every value. Use it to skip a position.
    #[must_use]
    pub fn any() -> Self {
        Self {
            text: "<any>".to_owned(),
            test: None,
        }
    }

    /// The predicate's description.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Applies the predicate.
    #[must_use]
    pub fn matches(&self, value: &T) -> bool {
        self.test.as_ref().is_none_or(|test| test(value))
    }
}

impl<T> fmt::Debug for ArgPredicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ArgPredicate").field(&self.text).finish()
    }
}

/// Builds an [`ArgPredicate`] from a closure, keeping its source text.
///
/// ```
/// use evwatch_assertions::arg;
///
/// let predicate = arg!(|n: &i32| *n > 2);
/// assert!(predicate.matches(&3));
/// assert!(predicate.text().contains("> 2"));
/// ```
#[macro_export]
macro_rules! arg {
    ($($predicate:tt)+) => {
        $crate::predicate::ArgPredicate::new(stringify!($($predicate)+), $($predicate)+)
    };
}

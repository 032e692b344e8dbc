//! Failure message fragments.

use evwatch_core::record::EventRecord;

/// Formats the reason fragment appended to an expectation.
pub(crate) fn because(reason: Option<&str>) -> String {
    match reason.map(str::trim) {
        None | Some("") => String::new(),
        Some(reason) if reason.starts_with("because") => format!(" {reason}"),
        Some(reason) => format!(" because {reason}"),
    }
}

/// Renders items as `{a, b, c}`.
pub(crate) fn list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined: Vec<String> = items.into_iter().map(|s| s.as_ref().to_owned()).collect();
    format!("{{{}}}", joined.join(", "))
}

/// Renders recorded occurrences as JSON.
pub(crate) fn records(records: &[EventRecord]) -> String {
    serde_json::to_string(records).unwrap_or_else(|err| format!("<{err}>"))
}

/// Returns true if `name` can name a property.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|c| c == '_' || c.is_alphanumeric())
}

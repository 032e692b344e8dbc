//! Matching argument predicates against the typed arguments of one record.

use crate::predicate::ArgPredicate;

/// Returns true if every predicate can be paired with a distinct value, the
/// pairs keeping the order of both lists, and each predicate matching its
/// value. Values left unpaired are ignored.
pub(crate) fn assign_in_order<T>(values: &[&T], predicates: &[ArgPredicate<T>]) -> bool {
    let Some((first, rest)) = predicates.split_first() else {
        return true;
    };
    if values.len() < predicates.len() {
        return false;
    }
    values
        .iter()
        .enumerate()
        .any(|(i, value)| first.matches(value) && assign_in_order(&values[i + 1..], rest))
}

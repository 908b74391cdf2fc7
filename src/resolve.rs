//! Tolerant field lookup across prioritized physical names.
//!
//! Resolution is exact-key, first-match-wins: the first alias present in the
//! record with a non-null value is returned. Alias order is significant.

use crate::record::{FieldValue, SourceRecord};

/// Resolve a logical field against a record.
///
/// Returns `None` when the record is absent, the alias list is empty, or no
/// alias matches a non-null value.
pub fn resolve<'r, S: AsRef<str>>(
    record: Option<&'r SourceRecord>,
    aliases: &[S],
) -> Option<&'r FieldValue> {
    let record = record?;
    aliases
        .iter()
        .filter_map(|name| record.get(name.as_ref()))
        .find(|value| !value.is_null())
}

/// Resolve a field and render it as text.
pub fn resolve_text<S: AsRef<str>>(record: Option<&SourceRecord>, aliases: &[S]) -> Option<String> {
    resolve(record, aliases).and_then(FieldValue::to_text)
}

/// Resolve a link field to the id of the first linked record.
pub fn resolve_link<'r, S: AsRef<str>>(
    record: Option<&'r SourceRecord>,
    aliases: &[S],
) -> Option<&'r str> {
    resolve(record, aliases).and_then(FieldValue::first_id)
}

/// Resolve a toggle field. Missing toggles are off.
pub fn resolve_truthy<S: AsRef<str>>(record: Option<&SourceRecord>, aliases: &[S]) -> bool {
    resolve(record, aliases).is_some_and(FieldValue::is_truthy)
}

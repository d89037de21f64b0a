//! Field-level value comparison with type coercion.
//!
//! Decides, per field, whether an incoming normalized value equals the
//! value currently stored on the remote record. Dispatch is on the tag
//! pair; incoming text is coerced toward the existing value's kind, never
//! the other way around.

use super::mapper::parse_datetime;
use crate::client::FieldValue;

/// Result of comparing one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldComparison {
    /// Values are equal after coercion.
    Equal,
    /// Values genuinely differ; the record needs an update.
    Differs,
    /// Field takes no part in the diff: incoming is unset, the record
    /// doesn't carry the field, or a date coercion failed.
    Skipped,
}

impl FieldComparison {
    pub fn is_difference(self) -> bool {
        self == FieldComparison::Differs
    }
}

/// Compare an incoming normalized value against a record's current value.
///
/// `existing` is `None` when the record doesn't carry the field at all.
///
/// Policy, in order:
/// - incoming `Null` is "unset by the input" and is skipped — absent CSV
///   data never erases existing remote data;
/// - a missing key on the existing record is skipped, not a difference;
/// - existing numeric + incoming text: coerce text to a number; a failed
///   coercion counts as a difference so the subsequent update attempt
///   surfaces the bad value;
/// - existing date + incoming text: parse the text; a failed parse is
///   logged and skipped — it does not count as a difference;
/// - existing boolean + incoming text: case-insensitive true/false;
/// - same-tag values compare by value equality; remaining cross-tag pairs
///   compare canonical renderings.
pub fn compare_field(
    field: &str,
    incoming: &FieldValue,
    existing: Option<&FieldValue>,
) -> FieldComparison {
    if incoming.is_null() {
        return FieldComparison::Skipped;
    }
    let Some(existing) = existing else {
        return FieldComparison::Skipped;
    };

    let equal = match (incoming, existing) {
        (FieldValue::Text(raw), FieldValue::Number(n)) => match raw.trim().parse::<f64>() {
            Ok(parsed) => parsed == *n,
            Err(_) => {
                tracing::debug!(
                    field = %field,
                    raw = %raw,
                    "Incoming value is not numeric; treating as difference"
                );
                false
            }
        },
        (FieldValue::Text(raw), FieldValue::DateTime(dt)) => match parse_datetime(raw) {
            Some(parsed) => parsed == *dt,
            None => {
                tracing::warn!(
                    field = %field,
                    raw = %raw,
                    "Incoming value is not a date; field skipped in diff"
                );
                return FieldComparison::Skipped;
            }
        },
        (FieldValue::Text(raw), FieldValue::Boolean(b)) => {
            raw.trim().eq_ignore_ascii_case(if *b { "true" } else { "false" })
        }
        (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
        (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
        (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a == b,
        (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a == b,
        // Incoming non-null vs. existing null: the input sets a value the
        // record doesn't have.
        (_, FieldValue::Null) => false,
        (a, b) => a.to_string() == b.to_string(),
    };

    if equal {
        FieldComparison::Equal
    } else {
        FieldComparison::Differs
    }
}

//! Remote list data model.
//!
//! `FieldValue` is the tagged value shared by the whole pipeline: the CSV
//! mapper produces it, the comparator dispatches on it, and the REST
//! client serializes it straight into list-item JSON. Deserialization is
//! untagged, so plain JSON scalars land on the right variant without a
//! wrapper object.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical rendering for `FieldValue::DateTime`.
const DATETIME_CANONICAL: &str = "%Y-%m-%dT%H:%M:%S";

/// One typed field value on a list record.
///
/// Variant order matters for untagged deserialization: `DateTime` is
/// tried before `Text` so ISO-8601 strings coming back from the store
/// keep their date tag instead of degrading to text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Number(f64),
    DateTime(NaiveDateTime),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    /// Canonical rendering used for cross-tag comparison and filter
    /// literals. Dates always render in ISO-8601 seconds precision.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Boolean(b) => write!(f, "{}", b),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_CANONICAL)),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Field name → value mapping, as stored on a record or sent in a payload.
pub type FieldSet = BTreeMap<String, FieldValue>;

/// One record as returned by the remote list store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Store-assigned integer id, the handle for updates.
    pub id: i64,
    /// Store-assigned stable identifier, opaque to us.
    pub unique_id: String,
    pub fields: FieldSet,
}

/// Exact-match identity predicate: primary AND secondary field.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchPredicate {
    pub primary_field: String,
    pub primary_value: String,
    pub secondary_field: String,
    pub secondary_value: String,
}

impl MatchPredicate {
    /// Render the predicate as a filter expression.
    ///
    /// Values are embedded verbatim, single quotes doubled. No other
    /// normalization: the store decides equality on its side.
    pub fn to_filter_string(&self) -> String {
        format!(
            "{} eq '{}' and {} eq '{}'",
            self.primary_field,
            escape_literal(&self.primary_value),
            self.secondary_field,
            escape_literal(&self.secondary_value),
        )
    }

    /// True when the record satisfies the predicate, comparing each
    /// field's canonical rendering against the raw value.
    pub fn matches(&self, record: &RemoteRecord) -> bool {
        let field_equals = |field: &str, value: &str| {
            record
                .fields
                .get(field)
                .is_some_and(|v| v.to_string() == value)
        };
        field_equals(&self.primary_field, &self.primary_value)
            && field_equals(&self.secondary_field, &self.secondary_value)
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}

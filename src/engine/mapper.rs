//! Field mapper: projects a raw CSV row onto remote fields.
//!
//! Applies the configured remote-field → CSV-column mapping, the explicit
//! `NULL` cell sentinel, and date normalization. A single bad field never
//! fails the row; only a malformed mapping (missing identity columns)
//! fails construction.

use super::error::EngineError;
use super::types::NormalizedRow;
use crate::client::FieldValue;
use crate::config::SyncConfig;
use crate::source::RawRow;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

/// Literal cell content meaning "explicitly absent".
const NULL_SENTINEL: &str = "NULL";

/// Accepted input formats, tried in order. Date-only forms get midnight.
/// This is the single fixed parse strategy; there is no autodetection
/// beyond this list.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S", "%m/%d/%Y %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a raw string as a date/time using the fixed strategy.
pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Per-row projection from CSV record to normalized remote fields.
pub struct FieldMapper {
    /// Remote field name → CSV column; `None` means declared but unmapped.
    mappings: BTreeMap<String, Option<String>>,
    /// Field treated as a date regardless of its name.
    due_date_field: Option<String>,
    primary_column: String,
    secondary_column: String,
}

impl FieldMapper {
    /// Build a mapper from configuration.
    ///
    /// Fails when the primary or secondary identity field has no CSV
    /// column: that is a configuration error surfaced before any row is
    /// processed, not a per-row error.
    pub fn new(config: &SyncConfig) -> Result<Self, EngineError> {
        let mappings = config.field_mappings();

        let identity_column = |field: &str| -> Result<String, EngineError> {
            mappings
                .get(field)
                .and_then(|column| column.clone())
                .ok_or_else(|| EngineError::MissingIdentityMapping(field.to_string()))
        };
        let primary_column = identity_column(&config.identity.primary_field)?;
        let secondary_column = identity_column(&config.identity.secondary_field)?;

        let due_date_field = if config.rules.due_date_field.is_empty() {
            None
        } else {
            Some(config.rules.due_date_field.clone())
        };

        Ok(Self {
            mappings,
            due_date_field,
            primary_column,
            secondary_column,
        })
    }

    /// CSV column backing the primary identity field.
    pub fn primary_column(&self) -> &str {
        &self.primary_column
    }

    /// CSV column backing the secondary identity field.
    pub fn secondary_column(&self) -> &str {
        &self.secondary_column
    }

    /// True when the field is normalized as a date.
    fn is_date_field(&self, field: &str) -> bool {
        field.ends_with("Date") || self.due_date_field.as_deref() == Some(field)
    }

    /// Project one raw row onto the remote field set.
    ///
    /// Unparseable date cells are logged at ERROR level and mapped to
    /// `Null`; the row is never aborted here.
    pub fn map(&self, row: &RawRow) -> NormalizedRow {
        let mut normalized = NormalizedRow::new();

        for (field, column) in &self.mappings {
            let Some(column) = column else {
                // Declared but unmapped: ignored for this run.
                continue;
            };

            let raw = row.get(column).unwrap_or_default();
            if raw.trim().is_empty() || raw == NULL_SENTINEL {
                normalized.insert(field.clone(), FieldValue::Null);
                continue;
            }

            let value = if self.is_date_field(field) {
                match parse_datetime(raw) {
                    Some(dt) => FieldValue::DateTime(dt),
                    None => {
                        tracing::error!(
                            field = %field,
                            raw = %raw,
                            line = row.line,
                            "Failed to parse date value; field dropped to null"
                        );
                        FieldValue::Null
                    }
                }
            } else {
                FieldValue::Text(raw.to_string())
            };

            normalized.insert(field.clone(), value);
        }

        normalized
    }
}

//! Reconciliation engine - the per-row create-or-update state machine.
//!
//! Per row: map → match → diff each matched record → create or update →
//! structured outcome. Row failures are isolated: any error escaping row
//! processing is caught at the row boundary, logged with the row's
//! identity values, and converted into `RowOutcome::Failed` — one bad row
//! never stops the batch.

pub mod compare;
pub mod error;
pub mod mapper;
pub mod matcher;
pub mod types;

pub use compare::{compare_field, FieldComparison};
pub use error::EngineError;
pub use mapper::FieldMapper;
pub use matcher::RecordMatcher;
pub use types::{NormalizedRow, RowOutcome, RunReport, RunSummary};

use crate::client::{FieldValue, RemoteListClient, RemoteRecord};
use crate::config::{RuleConfig, SyncConfig};
use crate::source::{RawRow, SourceError};
use std::sync::Arc;

/// Drives reconciliation for a whole CSV batch.
///
/// Rows are processed strictly in input order, one at a time, each fully
/// resolved (including network round-trips) before the next begins.
pub struct ReconciliationEngine {
    client: Arc<dyn RemoteListClient>,
    mapper: FieldMapper,
    matcher: RecordMatcher,
    rules: RuleConfig,
}

impl ReconciliationEngine {
    /// Build an engine from validated configuration.
    ///
    /// Fails when the identity fields are unmapped; that aborts the run
    /// before any row is processed.
    pub fn new(client: Arc<dyn RemoteListClient>, config: &SyncConfig) -> Result<Self, EngineError> {
        Ok(Self {
            client,
            mapper: FieldMapper::new(config)?,
            matcher: RecordMatcher::new(config),
            rules: config.rules.clone(),
        })
    }

    /// Process every row, producing one outcome per row in input order.
    pub async fn run(
        &self,
        rows: impl IntoIterator<Item = Result<RawRow, SourceError>>,
    ) -> RunReport {
        let mut report = RunReport::default();

        for (index, row) in rows.into_iter().enumerate() {
            let outcome = match row {
                Ok(row) => self.process_row(&row).await,
                Err(e) => {
                    tracing::warn!(row = index + 1, error = %e, "Skipping malformed row");
                    RowOutcome::SkippedInvalidRow
                }
            };
            tracing::debug!(row = index + 1, outcome = outcome.label(), "Row resolved");
            report.push(outcome);
        }

        let summary = report.summary();
        tracing::info!(
            created = summary.created,
            updated = summary.updated,
            unchanged = summary.unchanged,
            skipped = summary.skipped,
            failed = summary.failed,
            "Reconciliation run complete"
        );
        report
    }

    /// Resolve one row to its terminal outcome, absorbing row-scoped errors.
    pub async fn process_row(&self, row: &RawRow) -> RowOutcome {
        // Identity values come from the raw row via the configured CSV
        // columns and are used verbatim as query literals.
        let primary = row.get(self.mapper.primary_column()).unwrap_or_default();
        let secondary = row.get(self.mapper.secondary_column()).unwrap_or_default();

        if identity_missing(primary) && identity_missing(secondary) {
            tracing::warn!(line = row.line, "Row has no identity values; skipping");
            return RowOutcome::SkippedInvalidRow;
        }

        match self.reconcile_row(row, primary, secondary).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    line = row.line,
                    primary = %primary,
                    secondary = %secondary,
                    error = %e,
                    "Row processing failed"
                );
                RowOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn reconcile_row(
        &self,
        row: &RawRow,
        primary: &str,
        secondary: &str,
    ) -> Result<RowOutcome, EngineError> {
        let normalized = self.mapper.map(row);
        let matches = self
            .matcher
            .find(self.client.as_ref(), primary, secondary)
            .await?;

        if matches.is_empty() {
            if !self.rules.create_missing {
                tracing::info!(primary = %primary, secondary = %secondary, "No match; creation disabled");
                return Ok(RowOutcome::SkippedNoMatch);
            }
            let record = self.client.create(self.matcher.list_name(), &normalized).await?;
            tracing::info!(primary = %primary, secondary = %secondary, id = record.id, "Record created");
            return Ok(RowOutcome::Created { id: record.id });
        }

        self.reconcile_matches(&normalized, &matches, primary, secondary)
            .await
    }

    /// Diff and update every matched record independently.
    ///
    /// A per-record update failure does not abort the remaining matched
    /// records. Aggregation across records: any failure wins, then any
    /// successful update, then unchanged.
    async fn reconcile_matches(
        &self,
        normalized: &NormalizedRow,
        matches: &[RemoteRecord],
        primary: &str,
        secondary: &str,
    ) -> Result<RowOutcome, EngineError> {
        let mut updated_id = None;
        let mut failure: Option<String> = None;

        for record in matches {
            if !self.record_differs(normalized, record) {
                tracing::debug!(id = record.id, "Record already up to date");
                continue;
            }

            let payload = self.build_update_payload(normalized, record);
            match self.client.update(self.matcher.list_name(), record.id, &payload).await {
                Ok(true) => {
                    tracing::info!(id = record.id, primary = %primary, "Record updated");
                    updated_id.get_or_insert(record.id);
                }
                Ok(false) => {
                    tracing::error!(id = record.id, primary = %primary, "Update not acknowledged");
                    failure
                        .get_or_insert_with(|| format!("update of record {} not acknowledged", record.id));
                }
                Err(e) => {
                    tracing::error!(
                        id = record.id,
                        primary = %primary,
                        secondary = %secondary,
                        error = %e,
                        "Update failed"
                    );
                    failure.get_or_insert_with(|| format!("update of record {}: {}", record.id, e));
                }
            }
        }

        if let Some(reason) = failure {
            Ok(RowOutcome::Failed { reason })
        } else if let Some(id) = updated_id {
            Ok(RowOutcome::Updated { id })
        } else {
            Ok(RowOutcome::Unchanged { id: matches[0].id })
        }
    }

    /// True when any mapped field genuinely differs from the record.
    ///
    /// Scanning stops at the first real difference; the update always
    /// carries the full mapped field set, so which field differed is not
    /// otherwise observable.
    fn record_differs(&self, normalized: &NormalizedRow, record: &RemoteRecord) -> bool {
        normalized.iter().any(|(field, incoming)| {
            compare_field(field, incoming, record.fields.get(field)).is_difference()
        })
    }

    /// Full-field-set update payload, with the ownership side rule applied.
    ///
    /// When the configured ownership field's existing value differs from
    /// the incoming one, the stale flag field is forced to `false` in the
    /// payload, signaling downstream systems that dependent state is stale.
    fn build_update_payload(
        &self,
        normalized: &NormalizedRow,
        record: &RemoteRecord,
    ) -> NormalizedRow {
        let mut payload = normalized.clone();

        if !self.rules.ownership_change_field.is_empty() {
            let field = &self.rules.ownership_change_field;
            let incoming = normalized.get(field).unwrap_or(&FieldValue::Null);
            if compare_field(field, incoming, record.fields.get(field)).is_difference() {
                tracing::info!(
                    id = record.id,
                    field = %field,
                    flag = %self.rules.stale_flag_field,
                    "Ownership changed; forcing stale flag off"
                );
                payload.insert(
                    self.rules.stale_flag_field.clone(),
                    FieldValue::Boolean(false),
                );
            }
        }

        payload
    }
}

/// Empty, whitespace, or the explicit `NULL` sentinel.
fn identity_missing(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == "NULL"
}

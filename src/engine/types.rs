//! Row outcome and run report types.

use crate::client::FieldSet;
use serde::Serialize;

/// Mapping of remote field name → normalized value for one CSV row.
///
/// Produced by the field mapper; transient and row-scoped. Every mapping
/// key with a non-empty CSV column appears; empty/missing/`NULL` cells and
/// unparseable date cells appear as `FieldValue::Null`.
pub type NormalizedRow = FieldSet;

/// Terminal state of one input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RowOutcome {
    /// No match existed; a record was created.
    Created { id: i64 },
    /// At least one matched record was updated.
    Updated { id: i64 },
    /// Every matched record already equaled the row post-coercion.
    Unchanged { id: i64 },
    /// No match existed and record creation is disabled.
    SkippedNoMatch,
    /// Row was malformed or carried no identity values.
    SkippedInvalidRow,
    /// A row-scoped operation failed; the batch continued.
    Failed { reason: String },
}

impl RowOutcome {
    /// Short label for logs and the summary table.
    pub fn label(&self) -> &'static str {
        match self {
            RowOutcome::Created { .. } => "created",
            RowOutcome::Updated { .. } => "updated",
            RowOutcome::Unchanged { .. } => "unchanged",
            RowOutcome::SkippedNoMatch => "skipped_no_match",
            RowOutcome::SkippedInvalidRow => "skipped_invalid_row",
            RowOutcome::Failed { .. } => "failed",
        }
    }
}

/// Outcome counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged + self.skipped + self.failed
    }
}

/// Ordered per-row outcomes of a completed run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<RowOutcome>,
}

impl RunReport {
    pub fn push(&mut self, outcome: RowOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for outcome in &self.outcomes {
            match outcome {
                RowOutcome::Created { .. } => summary.created += 1,
                RowOutcome::Updated { .. } => summary.updated += 1,
                RowOutcome::Unchanged { .. } => summary.unchanged += 1,
                RowOutcome::SkippedNoMatch | RowOutcome::SkippedInvalidRow => summary.skipped += 1,
                RowOutcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let mut report = RunReport::default();
        report.push(RowOutcome::Created { id: 1 });
        report.push(RowOutcome::Updated { id: 2 });
        report.push(RowOutcome::Unchanged { id: 2 });
        report.push(RowOutcome::SkippedInvalidRow);
        report.push(RowOutcome::SkippedNoMatch);
        report.push(RowOutcome::Failed {
            reason: "boom".into(),
        });

        let summary = report.summary();
        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total(), 6);
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let json = serde_json::to_string(&RowOutcome::Created { id: 7 }).unwrap();
        assert_eq!(json, "{\"outcome\":\"created\",\"id\":7}");
    }
}

//! Output formatting helpers for CLI commands

use crate::engine::{RunReport, RunSummary};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Format the run summary as a table
pub fn format_summary_table(summary: &RunSummary) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Outcome", "Rows"]);

    table.add_row(vec![
        Cell::new("Created".green().to_string()),
        Cell::new(summary.created),
    ]);
    table.add_row(vec![
        Cell::new("Updated".cyan().to_string()),
        Cell::new(summary.updated),
    ]);
    table.add_row(vec![
        Cell::new("Unchanged"),
        Cell::new(summary.unchanged),
    ]);
    table.add_row(vec![
        Cell::new("Skipped".yellow().to_string()),
        Cell::new(summary.skipped),
    ]);
    table.add_row(vec![
        Cell::new("Failed".red().to_string()),
        Cell::new(summary.failed),
    ]);
    table.add_row(vec![Cell::new("Total"), Cell::new(summary.total())]);

    table.to_string()
}

/// Format the full report as JSON
pub fn format_report_json(report: &RunReport) -> String {
    serde_json::to_string_pretty(&json!({
        "summary": report.summary(),
        "rows": report.outcomes,
    }))
    .unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RowOutcome;

    #[test]
    fn test_summary_table_contains_counts() {
        let mut report = RunReport::default();
        report.push(RowOutcome::Created { id: 1 });
        report.push(RowOutcome::Unchanged { id: 2 });

        let table = format_summary_table(&report.summary());
        assert!(table.contains("Created"));
        assert!(table.contains("Total"));
    }

    #[test]
    fn test_report_json_shape() {
        let mut report = RunReport::default();
        report.push(RowOutcome::Failed {
            reason: "boom".into(),
        });

        let json: serde_json::Value =
            serde_json::from_str(&format_report_json(&report)).unwrap();
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["rows"][0]["outcome"], "failed");
    }
}

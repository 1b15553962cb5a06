//! Report generation for completed runs.
//!
//! Renders the merged analyzer snapshots into Markdown or JSON. This is
//! a pure projection of the result accessor's output; nothing here
//! mutates analyzer state.

use crate::counter::StoreSnapshot;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Metadata about one completed run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub course: String,
    pub period: String,
    pub generated_at: DateTime<Utc>,
    pub analyzer_count: usize,
    pub assignments: usize,
    pub rooms: usize,
    pub submissions: usize,
    pub comments: usize,
    pub duration_seconds: f64,
}

/// The complete statistics report.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub metadata: ReportMetadata,
    /// Analyzer name -> entry -> subcategory -> count.
    pub analyzers: BTreeMap<String, StoreSnapshot>,
}

/// Serialize the report as pretty-printed JSON.
pub fn generate_json_report(report: &StatsReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report as JSON")
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &StatsReport) -> String {
    let mut output = String::new();

    output.push_str("# Gradewalk Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    for (name, snapshot) in &report.analyzers {
        output.push_str(&generate_analyzer_section(name, snapshot));
    }

    output.push_str(&generate_footer());
    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Course:** {} ({})\n",
        metadata.course, metadata.period
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Analyzers:** {}\n", metadata.analyzer_count));
    section.push_str(&format!("- **Assignments:** {}\n", metadata.assignments));
    if metadata.rooms > 0 {
        section.push_str(&format!("- **Rooms:** {}\n", metadata.rooms));
    }
    section.push_str(&format!("- **Submissions:** {}\n", metadata.submissions));
    section.push_str(&format!("- **Comments:** {}\n", metadata.comments));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// One section per analyzer: a table with entries as rows and the union
/// of subcategories as columns, plus a per-entry total.
fn generate_analyzer_section(name: &str, snapshot: &StoreSnapshot) -> String {
    let mut section = String::new();

    section.push_str(&format!("## `{}`\n\n", name));

    if snapshot.is_empty() {
        section.push_str("_No data recorded._\n\n");
        return section;
    }

    let subcategories: BTreeSet<&str> = snapshot
        .values()
        .flat_map(|subcats| subcats.keys().map(String::as_str))
        .collect();

    section.push_str("| Entry |");
    for subcat in &subcategories {
        section.push_str(&format!(" {} |", subcat));
    }
    section.push_str(" Total |\n");

    section.push_str("|---|");
    for _ in &subcategories {
        section.push_str("---|");
    }
    section.push_str("---|\n");

    for (entry, counts) in snapshot {
        section.push_str(&format!("| {} |", entry));
        let mut total = 0;
        for subcat in &subcategories {
            let value = counts.get(*subcat).copied().unwrap_or(0);
            total += value;
            section.push_str(&format!(" {} |", value));
        }
        section.push_str(&format!(" {} |\n", total));
    }

    section.push('\n');
    section
}

fn generate_footer() -> String {
    format!(
        "---\n\n_Generated by Gradewalk v{}_\n",
        env!("CARGO_PKG_VERSION")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> StatsReport {
        let mut snapshot = StoreSnapshot::new();
        snapshot
            .entry("alice".to_string())
            .or_default()
            .insert("hw01".to_string(), 4);
        snapshot
            .entry("alice".to_string())
            .or_default()
            .insert("hw02".to_string(), 2);
        snapshot
            .entry("bob".to_string())
            .or_default()
            .insert("hw01".to_string(), 1);

        let mut analyzers = BTreeMap::new();
        analyzers.insert("submissions.graded".to_string(), snapshot);
        analyzers.insert("comments.counter".to_string(), StoreSnapshot::new());

        StatsReport {
            metadata: ReportMetadata {
                course: "COS126".to_string(),
                period: "S2026".to_string(),
                generated_at: Utc::now(),
                analyzer_count: 2,
                assignments: 2,
                rooms: 0,
                submissions: 3,
                comments: 7,
                duration_seconds: 1.5,
            },
            analyzers,
        }
    }

    #[test]
    fn test_markdown_report_contents() {
        let markdown = generate_markdown_report(&sample_report());

        assert!(markdown.contains("# Gradewalk Report"));
        assert!(markdown.contains("- **Course:** COS126 (S2026)"));
        assert!(markdown.contains("## `submissions.graded`"));
        // alice: hw01=4, hw02=2, total 6
        assert!(markdown.contains("| alice | 4 | 2 | 6 |"));
        // bob has no hw02 entry; rendered as zero
        assert!(markdown.contains("| bob | 1 | 0 | 1 |"));
        // empty analyzer sections still appear
        assert!(markdown.contains("_No data recorded._"));
    }

    #[test]
    fn test_markdown_omits_rooms_when_zero() {
        let markdown = generate_markdown_report(&sample_report());
        assert!(!markdown.contains("**Rooms:**"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let json = generate_json_report(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["course"], "COS126");
        assert_eq!(
            value["analyzers"]["submissions.graded"]["alice"]["hw01"],
            4
        );
    }
}

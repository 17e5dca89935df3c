//! Markdown and JSON report generation.
//!
//! This module renders the computed statistics of a run into a
//! human-readable Markdown document or a JSON dump.

use crate::models::{ColumnSummary, CorrelationEntry, CorrelationMatrix, Report, ReportMetadata};
use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Employee Performance Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str(&generate_table_of_contents(report));

    for summary in &report.summaries {
        output.push_str(&generate_summary_section(summary));
    }

    output.push_str(&generate_counts_section(&report.employees_by_department));

    output.push_str(&generate_correlation_section(
        &report.correlations,
        &report.correlation_matrix,
    ));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push_str(&format!(
        "- **Departments:** {}\n",
        metadata.department_count
    ));
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &Report) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    for summary in &report.summaries {
        toc.push_str(&format!(
            "- [Statistics by {}](#statistics-by-{})\n",
            summary.column,
            summary.column.name().replace('_', "-")
        ));
    }
    toc.push_str("- [Employees by Department](#employees-by-department)\n");
    toc.push_str("- [Correlations](#correlations)\n");
    toc.push('\n');

    toc
}

/// Generate the per-department statistics table for one column.
fn generate_summary_section(summary: &ColumnSummary) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Statistics by {}\n\n", summary.column));
    section.push_str("| Department | Count | Mean | Median | Std. Deviation |\n");
    section.push_str("|:---|:---:|---:|---:|---:|\n");

    for row in &summary.rows {
        section.push_str(&format!(
            "| {} | {} | {:.2} | {:.2} | {:.2} |\n",
            department_label(&row.department),
            row.count,
            row.mean,
            row.median,
            row.stddev
        ));
    }
    section.push('\n');

    section
}

/// Generate the head-count table.
fn generate_counts_section(counts: &BTreeMap<String, usize>) -> String {
    let mut section = String::new();

    section.push_str("## Employees by Department\n\n");
    section.push_str("| Department | Employees |\n");
    section.push_str("|:---|:---:|\n");

    for (department, count) in counts {
        section.push_str(&format!("| {} | {} |\n", department_label(department), count));
    }
    section.push_str(&format!(
        "| **Total** | **{}** |\n\n",
        counts.values().sum::<usize>()
    ));

    section
}

/// Generate the correlation section.
fn generate_correlation_section(
    correlations: &[CorrelationEntry],
    matrix: &CorrelationMatrix,
) -> String {
    let mut section = String::new();

    section.push_str("## Correlations\n\n");

    for entry in correlations {
        section.push_str(&format!(
            "- **{}** vs **{}**: {:.4}\n",
            entry.column_a, entry.column_b, entry.coefficient
        ));
    }
    if !correlations.is_empty() {
        section.push('\n');
    }

    if !matrix.columns.is_empty() {
        section.push_str("### Correlation Matrix\n\n");

        section.push_str("| |");
        for column in &matrix.columns {
            section.push_str(&format!(" {} |", column));
        }
        section.push('\n');
        section.push_str("|:---|");
        section.push_str(&"---:|".repeat(matrix.columns.len()));
        section.push('\n');

        for (i, row_column) in matrix.columns.iter().enumerate() {
            section.push_str(&format!("| **{}** |", row_column));
            for cell in matrix.cells.iter().skip(i * matrix.columns.len()).take(matrix.columns.len()) {
                section.push_str(&format!(" {:.3} |", cell));
            }
            section.push('\n');
        }
        section.push('\n');
    }

    section
}

/// Empty department keys still need a visible table cell.
fn department_label(department: &str) -> &str {
    if department.is_empty() {
        "*(empty)*"
    } else {
        department
    }
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by perfstats*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write text output to a file.
pub fn write_output(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

//! Statistics reports over a results file.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::OutputError;
use crate::core::result::ClassificationResult;
use crate::matching::aggregate::{summarize, EvalueBucket, Statistics, SUMMARY_TOP_N};
use crate::utils::format::format_evalue;

/// Rows listed in the detailed section of a text report
pub const TEXT_REPORT_ROWS: usize = 100;

const TOOL_NAME: &str = "cog-classifier";

/// Report file format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Json,
    Txt,
}

#[derive(Serialize)]
struct ReportMetadata {
    generated_on: String,
    tool: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    metadata: ReportMetadata,
    summary: &'a Statistics,
    results: &'a [ClassificationResult],
}

/// Write a statistics report for `results`, keeping `top_n` COGs
///
/// # Errors
///
/// Returns an error if the report cannot be written.
pub fn generate_report(
    results: &[ClassificationResult],
    path: &Path,
    format: ReportFormat,
    top_n: usize,
) -> Result<Statistics, OutputError> {
    let statistics = summarize(results, top_n);
    let mut writer = BufWriter::new(File::create(path)?);

    match format {
        ReportFormat::Json => write_json_report(&mut writer, results, &statistics)?,
        ReportFormat::Txt => writer.write_all(render_text_report(results, &statistics).as_bytes())?,
    }
    writer.flush()?;

    info!("Report written to {}", path.display());
    Ok(statistics)
}

fn write_json_report<W: Write>(
    writer: W,
    results: &[ClassificationResult],
    statistics: &Statistics,
) -> Result<(), OutputError> {
    let report = JsonReport {
        metadata: ReportMetadata {
            generated_on: chrono::Utc::now().to_rfc3339(),
            tool: TOOL_NAME,
            version: env!("CARGO_PKG_VERSION"),
        },
        summary: statistics,
        results,
    };
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Render the plain-text report
#[allow(clippy::too_many_lines)] // Linear report layout
pub fn render_text_report(results: &[ClassificationResult], statistics: &Statistics) -> String {
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "COG CLASSIFICATION REPORT");
    let _ = writeln!(out, "{}", "=".repeat(50));
    let _ = writeln!(
        out,
        "Generated on: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "{}", "-".repeat(20));
    let _ = writeln!(out, "Total sequences: {}", statistics.total_sequences);
    let _ = writeln!(out, "Classified: {}", statistics.classified);
    let _ = writeln!(out, "Unclassified: {}", statistics.unclassified);
    let _ = writeln!(out, "Errors: {}", statistics.errors);
    let _ = writeln!(out, "Success rate: {:.1}%", statistics.classification_rate);
    let _ = writeln!(out);

    let _ = writeln!(out, "FUNCTIONAL CATEGORY DISTRIBUTION");
    let _ = writeln!(out, "{}", "-".repeat(35));
    let mut categories: Vec<_> = statistics.category_distribution.iter().collect();
    categories.sort_by(|a, b| a.0.cmp(&b.0));
    for (category, count) in categories {
        let _ = writeln!(
            out,
            "{category}: {count} ({:.1}%)",
            statistics.share_of_classified(count)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "TOP COG ASSIGNMENTS");
    let _ = writeln!(out, "{}", "-".repeat(20));
    for (cog_id, count) in statistics.top_cogs.iter().take(SUMMARY_TOP_N) {
        let _ = writeln!(
            out,
            "{cog_id}: {count} ({:.1}%)",
            statistics.share_of_classified(count)
        );
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "E-VALUE DISTRIBUTION");
    let _ = writeln!(out, "{}", "-".repeat(20));
    for (bucket, count) in statistics.evalue_distribution.buckets() {
        if bucket == EvalueBucket::Other {
            let _ = writeln!(out, "{}: {count}", bucket.label());
        } else {
            let _ = writeln!(out, "<= {}: {count}", bucket.label());
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "DETAILED RESULTS");
    let _ = writeln!(out, "{}", "-".repeat(16));
    let _ = writeln!(
        out,
        "{:<20} {:<10} {:<8} {:<12} {:<8} {:<50}",
        "Sequence ID", "COG ID", "Category", "E-value", "Identity", "Description"
    );
    let _ = writeln!(out, "{}", "-".repeat(108));

    for result in results.iter().take(TEXT_REPORT_ROWS) {
        let id = truncate(result.sequence_id(), 19);
        let line = if let Some(error) = result.error_message() {
            format!(
                "{id:<20} {:<10} {:<8} {:<12} {:<8} {}",
                "ERROR",
                "",
                "",
                "",
                truncate(error, 50)
            )
        } else if let Some(hit) = result.best_hit() {
            let identity = hit
                .hit
                .identity_pct
                .value()
                .map_or_else(|| hit.hit.identity_pct.to_string(), |v| format!("{v:.1}%"));
            let evalue = hit
                .hit
                .evalue
                .value()
                .map_or_else(|| hit.hit.evalue.to_string(), |v| format_evalue(*v));
            format!(
                "{id:<20} {:<10} {:<8} {:<12} {:<8} {}",
                truncate(&hit.cog_id, 9),
                truncate(&hit.category_code, 7),
                truncate(&evalue, 11),
                truncate(&identity, 7),
                truncate(&hit.cog_description, 49)
            )
        } else {
            format!(
                "{id:<20} {:<10} {:<8} {:<12} {:<8} No significant hits found",
                "NO_HIT", "", "", ""
            )
        };
        let _ = writeln!(out, "{}", line.trim_end());
    }

    if results.len() > TEXT_REPORT_ROWS {
        let _ = writeln!(
            out,
            "\n... and {} more results",
            results.len() - TEXT_REPORT_ROWS
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "-".repeat(50));
    let _ = writeln!(out, "Report generated by {TOOL_NAME}");
    out
}

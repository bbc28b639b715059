use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::output::read_results_json;
use crate::output::report::{generate_report, ReportFormat};
use crate::pipeline::config::ClassifierConfig;

#[derive(Args)]
pub struct ReportArgs {
    /// Classification results file (JSON)
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Output report file
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value = "json")]
    pub format: ReportFormat,

    /// Number of top COGs to include (default 20)
    #[arg(long)]
    pub top: Option<usize>,
}

/// Execute report subcommand
///
/// # Errors
///
/// Returns an error if the results cannot be read or the report cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ReportArgs, verbose: bool) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file '{}' not found", args.input.display());
    }

    let results = read_results_json(&args.input)
        .with_context(|| format!("Failed to read results from '{}'", args.input.display()))?;
    if verbose {
        eprintln!("Loaded {} results", results.len());
    }

    let top_n = args
        .top
        .unwrap_or_else(|| ClassifierConfig::default().output.report_top_n);
    let statistics = generate_report(&results, &args.output, args.format, top_n)?;

    println!("Report generated: {}", args.output.display());
    if verbose {
        println!(
            "{} of {} sequences classified ({:.1}%)",
            statistics.classified, statistics.total_sequences, statistics.classification_rate
        );
    }
    Ok(())
}

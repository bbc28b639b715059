use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;

use crate::catalog::layout::{ReferenceData, ReferenceLayout};
use crate::matching::aggregate::{summarize, Statistics};
use crate::output::{write_results, write_results_file, ResultFormat};
use crate::parsing::fasta::{is_fasta_file, read_sequences, validate_sequences};
use crate::pipeline::classifier::Classifier;
use crate::pipeline::config::ClassifierConfig;
use crate::search::blastp::BlastpTool;

#[derive(Args)]
pub struct ClassifyArgs {
    /// Input FASTA file with protein sequences (optionally gzipped)
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Output file (results are written to stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to the configured format, json)
    #[arg(long, value_enum)]
    pub format: Option<ResultFormat>,

    /// E-value threshold for the search (default 1e-5)
    #[arg(long)]
    pub evalue: Option<f64>,

    /// Maximum number of target sequences per query (default 10)
    #[arg(long)]
    pub max_targets: Option<usize>,

    /// Threads used by each search (default 4)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Number of sequences searched concurrently (default 1)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ClassifyArgs {
    fn config(&self) -> anyhow::Result<ClassifierConfig> {
        let mut config = match &self.config {
            Some(path) => ClassifierConfig::load_from_file(path)?,
            None => ClassifierConfig::default(),
        };

        if let Some(evalue) = self.evalue {
            config.search.evalue = evalue;
        }
        if let Some(max_targets) = self.max_targets {
            config.search.max_targets = max_targets;
        }
        if let Some(threads) = self.threads {
            config.search.threads = threads;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Execute classify subcommand
///
/// # Errors
///
/// Returns an error if the configuration or input is invalid, the reference
/// data is not ready, or the results cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ClassifyArgs, layout: ReferenceLayout, verbose: bool) -> anyhow::Result<()> {
    let config = args.config()?;
    let format = match args.format {
        Some(format) => format,
        None => config.default_format()?,
    };

    if !args.input.exists() {
        anyhow::bail!("Input file '{}' not found", args.input.display());
    }
    if !is_fasta_file(&args.input) {
        eprintln!(
            "Warning: '{}' does not have a FASTA extension (.fa, .fasta, .faa)",
            args.input.display()
        );
    }
    let sequences = read_sequences(&args.input)
        .with_context(|| format!("Invalid FASTA file '{}'", args.input.display()))?;

    let issues = validate_sequences(&sequences);
    if !issues.is_empty() {
        eprintln!("Warning: {} sequences have composition issues", issues.len());
        if verbose {
            for (id, problems) in &issues {
                eprintln!("  {id}: {}", problems.join(", "));
            }
        }
    }

    let data = ReferenceData::new(layout);
    if !data.is_ready() {
        let missing: Vec<String> = data
            .layout()
            .missing_files()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        anyhow::bail!(
            "COG reference data in '{}' is not ready (missing: {}). Place the NCBI files there and run 'cog-classifier prepare'.",
            data.layout().data_dir().display(),
            if missing.is_empty() {
                "search index".to_string()
            } else {
                missing.join(", ")
            }
        );
    }
    let store = data.load()?;

    let tool = Arc::new(BlastpTool::new(
        data.layout().search_index(),
        config.search.clone(),
    ));
    let classifier = Classifier::new(store, tool, &config);

    eprintln!(
        "Classifying {} sequences from {}...",
        sequences.len(),
        args.input.display()
    );
    let runtime = tokio::runtime::Runtime::new()?;
    let results = runtime.block_on(classifier.classify_batch(&sequences));

    let statistics = summarize(&results, config.output.summary_top_n);
    match &args.output {
        Some(path) => {
            write_results_file(path, &results, format)?;
            print_summary(&statistics, false);
            println!("\nResults saved to: {}", path.display());
        }
        None => {
            write_results(BufWriter::new(std::io::stdout().lock()), &results, format)?;
            print_summary(&statistics, true);
        }
    }

    Ok(())
}

fn print_summary(statistics: &Statistics, to_stderr: bool) {
    let mut lines = vec![
        "\nClassification Summary:".to_string(),
        format!("  Total sequences: {}", statistics.total_sequences),
        format!("  Classified: {}", statistics.classified),
        format!("  Unclassified: {}", statistics.unclassified),
        format!("  Errors: {}", statistics.errors),
        format!("  Success rate: {:.1}%", statistics.classification_rate),
    ];
    if !statistics.top_cogs.is_empty() {
        lines.push("  Top COGs:".to_string());
        for (cog_id, count) in statistics.top_cogs.iter() {
            lines.push(format!("    {cog_id}: {count}"));
        }
    }

    for line in lines {
        if to_stderr {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }
}

//! Command-line interface for cog-classifier.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **classify**: Classify protein sequences from a FASTA file
//! - **report**: Generate a statistics report from a results file
//! - **info**: Show BLAST+ and reference data status
//! - **prepare**: Decompress the reference FASTA and build the search index
//! - **search**: Search COG definitions
//!
//! ## Usage
//!
//! ```text
//! # Build the search index once the NCBI files are in ./data
//! cog-classifier prepare
//!
//! # Classify sequences
//! cog-classifier classify -i proteins.faa -o results.json
//!
//! # Tabular output with four concurrent searches
//! cog-classifier classify -i proteins.faa -o results.tsv --format tsv --concurrency 4
//!
//! # Text report
//! cog-classifier report -i results.json -o report.txt --format txt
//!
//! # Look up COGs by description
//! cog-classifier search ribosomal --field description
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::catalog::layout::ReferenceLayout;

pub mod classify;
pub mod info;
pub mod prepare;
pub mod report;
pub mod search;

#[derive(Parser)]
#[command(name = "cog-classifier")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Classify protein sequences against the NCBI COG database")]
#[command(
    long_about = "cog-classifier assigns protein sequences to Clusters of Orthologous Genes (COGs).\n\nEach sequence is searched against the COG reference proteins with blastp and the best hit is resolved to:\n- its COG id and description\n- its functional category\n\nThe NCBI reference files (cog-20.def.tab, cog-20.cog.csv, cog-20.fa.gz, fun-20.tab) must be placed in the data directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the COG reference files and search index
    #[arg(long, global = true, env = "COG_DATA_DIR", default_value = "./data")]
    pub data_dir: PathBuf,
}

impl Cli {
    pub fn layout(&self) -> ReferenceLayout {
        ReferenceLayout::new(&self.data_dir)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify protein sequences from a FASTA file
    Classify(classify::ClassifyArgs),

    /// Generate a statistics report from a JSON results file
    Report(report::ReportArgs),

    /// Show BLAST+ availability and reference data status
    Info,

    /// Decompress the reference FASTA and build the search index
    Prepare(prepare::PrepareArgs),

    /// Search COG definitions
    Search(search::SearchArgs),
}

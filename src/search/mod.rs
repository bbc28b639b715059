//! External similarity-search tools.
//!
//! The search engine is a black box that takes a query FASTA and returns
//! tabular hits in the column order of
//! [`OUTFMT_COLUMNS`](crate::parsing::blast::OUTFMT_COLUMNS). [`SearchTool`]
//! is the seam between the classifier and that process, so the classifier
//! can be driven by a stand-in in tests.

use std::path::Path;

use thiserror::Error;

pub mod blastp;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("{program} not found. Please install BLAST+ and make sure it is on PATH")]
    NotFound { program: String },

    #[error("{program} failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("{program} timed out after {secs} s")]
    TimedOut { program: String, secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A similarity search over the reference protein index
pub trait SearchTool: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Search the sequences in `query_fasta` and return the raw tabular output
    ///
    /// # Errors
    ///
    /// Returns `SearchError` if the tool cannot be run, fails, or times out.
    fn search(&self, query_fasta: &Path) -> Result<String, SearchError>;
}

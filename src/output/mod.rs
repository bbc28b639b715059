//! Writers and readers for classification results.
//!
//! Results are written either as a pretty-printed JSON array of
//! [`ClassificationResult`] or as a flat CSV/TSV projection with one row per
//! sequence:
//!
//! | Column | Classified | No hit | Error |
//! |--------|------------|--------|-------|
//! | `sequence_id`, `length` | value | value | value |
//! | the eight best-hit columns | value | `NO_HIT` | `ERROR` |

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::core::hit::{AnnotatedHit, Field};
use crate::core::result::ClassificationResult;
use crate::pipeline::config::ConfigurationError;

pub mod report;

/// Placeholder written in every best-hit column of a failed sequence
pub const ERROR_SENTINEL: &str = "ERROR";

/// Placeholder written in every best-hit column of a sequence without hits
pub const NO_HIT_SENTINEL: &str = "NO_HIT";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Results file format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ResultFormat {
    #[default]
    Json,
    Csv,
    Tsv,
}

impl ResultFormat {
    /// Field delimiter for the tabular formats
    pub fn delimiter(self) -> Option<u8> {
        match self {
            Self::Json => None,
            Self::Csv => Some(b','),
            Self::Tsv => Some(b'\t'),
        }
    }
}

impl std::fmt::Display for ResultFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

impl FromStr for ResultFormat {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(ConfigurationError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// One row of the tabular projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabularRow {
    pub sequence_id: String,
    pub length: usize,
    pub cog_id: String,
    pub cog_name: String,
    pub category: String,
    pub category_name: String,
    pub evalue: String,
    pub bit_score: String,
    pub identity: String,
    pub coverage: String,
}

fn format_evalue_column(evalue: &Field<f64>) -> String {
    match evalue {
        Field::Value(v) => format!("{v:e}"),
        Field::Raw(s) => s.clone(),
    }
}

impl TabularRow {
    fn placeholder(result: &ClassificationResult, sentinel: &str) -> Self {
        Self {
            sequence_id: result.sequence_id().to_string(),
            length: result.length(),
            cog_id: sentinel.to_string(),
            cog_name: sentinel.to_string(),
            category: sentinel.to_string(),
            category_name: sentinel.to_string(),
            evalue: sentinel.to_string(),
            bit_score: sentinel.to_string(),
            identity: sentinel.to_string(),
            coverage: sentinel.to_string(),
        }
    }

    fn from_hit(result: &ClassificationResult, hit: &AnnotatedHit) -> Self {
        Self {
            sequence_id: result.sequence_id().to_string(),
            length: result.length(),
            cog_id: hit.cog_id.clone(),
            cog_name: hit.cog_description.clone(),
            category: hit.category_code.clone(),
            category_name: hit.category_name.clone(),
            evalue: format_evalue_column(&hit.hit.evalue),
            bit_score: hit.hit.bit_score.to_string(),
            identity: hit.hit.identity_pct.to_string(),
            coverage: hit.hit.coverage_pct.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.cog_id == ERROR_SENTINEL
    }

    pub fn is_no_hit(&self) -> bool {
        self.cog_id == NO_HIT_SENTINEL
    }
}

impl From<&ClassificationResult> for TabularRow {
    fn from(result: &ClassificationResult) -> Self {
        if result.error_message().is_some() {
            return Self::placeholder(result, ERROR_SENTINEL);
        }
        match result.best_hit() {
            Some(hit) => Self::from_hit(result, hit),
            None => Self::placeholder(result, NO_HIT_SENTINEL),
        }
    }
}

/// Write results as a pretty-printed JSON array
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json<W: Write>(writer: W, results: &[ClassificationResult]) -> Result<(), OutputError> {
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, results)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Write the tabular projection of results with a header row
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_tabular<W: Write>(
    writer: W,
    results: &[ClassificationResult],
    delimiter: u8,
) -> Result<(), OutputError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    for result in results {
        writer.serialize(TabularRow::from(result))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write results in the given format
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_results<W: Write>(
    writer: W,
    results: &[ClassificationResult],
    format: ResultFormat,
) -> Result<(), OutputError> {
    match format.delimiter() {
        None => write_json(writer, results),
        Some(delimiter) => write_tabular(writer, results, delimiter),
    }
}

/// Write results to a file in the given format
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_results_file(
    path: &Path,
    results: &[ClassificationResult],
    format: ResultFormat,
) -> Result<(), OutputError> {
    let file = BufWriter::new(File::create(path)?);
    write_results(file, results, format)?;
    info!("Wrote {} results to {} ({format})", results.len(), path.display());
    Ok(())
}

/// Read a tabular projection back into rows
///
/// # Errors
///
/// Returns an error if a row cannot be read or has the wrong shape.
pub fn read_tabular<R: Read>(reader: R, delimiter: u8) -> Result<Vec<TabularRow>, OutputError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);
    let rows = reader.deserialize().collect::<Result<Vec<TabularRow>, _>>()?;
    Ok(rows)
}

/// Read a JSON results file written by [`write_json`]
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_results_json(path: &Path) -> Result<Vec<ClassificationResult>, OutputError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

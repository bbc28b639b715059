//! Reader and writer for protein FASTA files using noodles.
//!
//! Query sequences are read into `sequence_id → residues` records; residues are
//! uppercased and characters outside [`VALID_RESIDUES`] are dropped with a
//! warning. Gzip/bgzip-compressed input is decompressed transparently.
//!
//! Supported extensions:
//! - `.fa`, `.fasta`, `.faa` (uncompressed)
//! - any of the above with `.gz` or `.bgz` (compressed)

use std::collections::HashMap;
use std::ffi::OsStr;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use noodles::fasta;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::matching::resolver::extract_protein_id;
use crate::utils::validation::{clean_residues, sequence_issues, VALID_RESIDUES};

/// Residues per line when writing FASTA
pub const LINE_WIDTH: usize = 80;

#[derive(Error, Debug)]
pub enum FastaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FASTA: {0}")]
    InvalidFormat(String),

    #[error("No sequences found in {0}")]
    Empty(String),

    #[error("Empty sequence found for '{0}'")]
    EmptySequence(String),
}

/// A query protein sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuerySequence {
    pub id: String,
    pub residues: String,
}

impl QuerySequence {
    pub fn new(id: impl Into<String>, residues: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            residues: residues.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

/// Check if the path has a FASTA extension
pub fn is_fasta_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    let stripped = path_str
        .strip_suffix(".gz")
        .or_else(|| path_str.strip_suffix(".bgz"))
        .unwrap_or(&path_str);

    matches!(
        Path::new(stripped)
            .extension()
            .and_then(OsStr::to_str),
        Some("fa" | "fasta" | "faa")
    )
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

fn open_reader(path: &Path) -> Result<Box<dyn BufRead>, FastaError> {
    let file = std::fs::File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Read all sequences from a FASTA file, in file order
///
/// # Errors
///
/// Returns `FastaError::Io` if the file cannot be read, `FastaError::InvalidFormat`
/// if a record is malformed, `FastaError::EmptySequence` if a record has no
/// valid residues, or `FastaError::Empty` if no records are found.
pub fn read_sequences(path: &Path) -> Result<Vec<QuerySequence>, FastaError> {
    let mut reader = fasta::io::Reader::new(open_reader(path)?);
    let sequences = read_records(&mut reader)?;

    if sequences.is_empty() {
        return Err(FastaError::Empty(path.display().to_string()));
    }

    info!("Parsed {} sequences from {}", sequences.len(), path.display());
    Ok(sequences)
}

/// Read sequences from FASTA text
///
/// # Errors
///
/// Returns `FastaError::InvalidFormat` if a record is malformed, or
/// `FastaError::EmptySequence` if a record has no valid residues.
pub fn parse_sequences(text: &str) -> Result<Vec<QuerySequence>, FastaError> {
    let mut reader = fasta::io::Reader::new(text.as_bytes());
    read_records(&mut reader)
}

fn read_records<R: BufRead>(
    reader: &mut fasta::io::Reader<R>,
) -> Result<Vec<QuerySequence>, FastaError> {
    let mut sequences: Vec<QuerySequence> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| FastaError::InvalidFormat(format!("Failed to parse FASTA record: {e}")))?;

        let id = String::from_utf8_lossy(record.name()).to_string();
        let raw = String::from_utf8_lossy(record.sequence().as_ref()).to_string();
        let (residues, invalid) = clean_residues(&raw);
        if !invalid.is_empty() {
            warn!(
                "Removed invalid characters {:?} from {id} (allowed: {VALID_RESIDUES})",
                invalid
            );
        }
        if residues.is_empty() {
            return Err(FastaError::EmptySequence(id));
        }

        let sequence = QuerySequence::new(id, residues);
        if let Some(&index) = positions.get(&sequence.id) {
            warn!("Duplicate sequence id {}; keeping the last record", sequence.id);
            sequences[index] = sequence;
        } else {
            positions.insert(sequence.id.clone(), sequences.len());
            sequences.push(sequence);
        }
    }

    Ok(sequences)
}

/// Per-sequence composition issues, keyed by sequence id
pub fn validate_sequences(sequences: &[QuerySequence]) -> Vec<(String, Vec<String>)> {
    sequences
        .iter()
        .filter_map(|s| {
            let issues = sequence_issues(&s.residues);
            (!issues.is_empty()).then(|| (s.id.clone(), issues))
        })
        .collect()
}

/// Write sequences as FASTA, wrapping residues at [`LINE_WIDTH`]
///
/// # Errors
///
/// Returns an I/O error if writing fails.
pub fn write_sequences<W: Write>(writer: &mut W, sequences: &[QuerySequence]) -> std::io::Result<()> {
    for sequence in sequences {
        writeln!(writer, ">{}", sequence.id)?;
        for chunk in sequence.residues.as_bytes().chunks(LINE_WIDTH) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }
    writer.flush()
}

/// Write a single query to a FASTA file for the search tool
///
/// # Errors
///
/// Returns an I/O error if the file cannot be written.
pub fn write_query(path: &Path, sequence: &QuerySequence) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_sequences(&mut file, std::slice::from_ref(sequence))
}

/// Protein ids extracted from the headers of a reference FASTA file
///
/// # Errors
///
/// Returns `FastaError` if the file cannot be read or parsed.
pub fn read_reference_ids(path: &Path) -> Result<Vec<String>, FastaError> {
    let mut reader = fasta::io::Reader::new(open_reader(path)?);
    let mut ids = Vec::new();

    for result in reader.records() {
        let record = result
            .map_err(|e| FastaError::InvalidFormat(format!("Failed to parse FASTA record: {e}")))?;
        let definition = record.definition().to_string();
        let header = definition.trim_start_matches('>');
        if let Some(id) = extract_protein_id(header) {
            ids.push(id);
        }
    }

    Ok(ids)
}

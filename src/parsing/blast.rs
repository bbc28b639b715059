//! Parser for tabular similarity-search output.
//!
//! The search tool is run with a custom `-outfmt 6` column list (see
//! [`OUTFMT_COLUMNS`]). Numeric columns that fail to parse are retained as raw
//! text, so a row is only dropped when it has too few columns.

use std::path::Path;

use tracing::debug;

use crate::core::hit::{Field, RawHit};

/// Column order requested from the search tool
pub const OUTFMT_COLUMNS: [&str; 13] = [
    "qseqid", "sseqid", "pident", "length", "mismatch", "gapopen", "qstart", "qend", "sstart",
    "send", "evalue", "bitscore", "qcovs",
];

/// The `-outfmt` argument matching [`OUTFMT_COLUMNS`]
#[must_use]
pub fn outfmt_argument() -> String {
    format!("6 {}", OUTFMT_COLUMNS.join(" "))
}

/// Parse one tab-separated row; `None` if it has fewer than 13 columns
#[must_use]
pub fn parse_hit_line(line: &str) -> Option<RawHit> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < OUTFMT_COLUMNS.len() {
        return None;
    }

    Some(RawHit {
        query_id: fields[0].trim().to_string(),
        subject_id: fields[1].trim().to_string(),
        identity_pct: Field::parse(fields[2]),
        alignment_length: Field::parse(fields[3]),
        mismatches: Field::parse(fields[4]),
        gap_opens: Field::parse(fields[5]),
        query_start: Field::parse(fields[6]),
        query_end: Field::parse(fields[7]),
        subject_start: Field::parse(fields[8]),
        subject_end: Field::parse(fields[9]),
        evalue: Field::parse(fields[10]),
        bit_score: Field::parse(fields[11]),
        coverage_pct: Field::parse(fields[12]),
    })
}

/// Parse search output text, preserving the tool's row order
#[must_use]
pub fn parse_hits(text: &str) -> Vec<RawHit> {
    let mut hits = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        match parse_hit_line(line) {
            Some(hit) => hits.push(hit),
            None => debug!("Ignoring search output line {} with too few columns", i + 1),
        }
    }

    hits
}

/// Parse a search output file
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn parse_hits_file(path: &Path) -> std::io::Result<Vec<RawHit>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_hits(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTPUT: &str = "\
# BLASTP 2.15.0+
q1\tref|NP_214052.1|\t85.5\t420\t60\t1\t1\t420\t5\t424\t1e-150\t520\t98
q1\tgb|AAC73113.1|\t40.2\t300\t170\t8\t10\t300\t2\t295\t2e-30\t120\t70
";

    #[test]
    fn test_outfmt_argument() {
        let arg = outfmt_argument();
        assert!(arg.starts_with("6 qseqid sseqid"));
        assert!(arg.ends_with("bitscore qcovs"));
    }

    #[test]
    fn test_parse_hits() {
        let hits = parse_hits(OUTPUT);
        assert_eq!(hits.len(), 2);

        let first = &hits[0];
        assert_eq!(first.query_id, "q1");
        assert_eq!(first.subject_id, "ref|NP_214052.1|");
        assert_eq!(first.identity_pct, Field::Value(85.5));
        assert_eq!(first.alignment_length, Field::Value(420));
        assert_eq!(first.evalue, Field::Value(1e-150));
        assert_eq!(first.coverage_pct, Field::Value(98.0));
        assert_eq!(hits[1].subject_id, "gb|AAC73113.1|");
    }

    #[test]
    fn test_bad_numeric_field_keeps_row() {
        let line = "q1\ts1\t90.0\tN/A\t0\t0\t1\t10\t1\t10\t1e-5\t50\t100";
        let hit = parse_hit_line(line).unwrap();
        assert_eq!(hit.alignment_length, Field::Raw("N/A".to_string()));
        assert_eq!(hit.evalue, Field::Value(1e-5));
    }

    #[test]
    fn test_short_rows_are_dropped() {
        let hits = parse_hits("q1\ts1\t90.0\n\nq2\ts2\t1\t1\t0\t0\t1\t1\t1\t1\t0.5\t10\t5\n");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].query_id, "q2");
    }

    #[test]
    fn test_empty_output() {
        assert!(parse_hits("").is_empty());
        assert!(parse_hits("\n\n").is_empty());
    }
}

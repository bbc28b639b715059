//! Parsers for the three COG reference tables.
//!
//! A short row is never fatal: it is skipped and reported as a [`RowFormatError`].

use serde::Serialize;
use tracing::warn;

use crate::core::types::{FunctionalCategory, UNASSIGNED_COG};

/// Minimum number of tab-separated fields in a categories row
pub const CATEGORY_FIELDS: usize = 2;

/// Minimum number of tab-separated fields in a definitions row
pub const DEFINITION_FIELDS: usize = 3;

/// Number of comma-separated fields in an assignments row
pub const ASSIGNMENT_FIELDS: usize = 7;

/// Token identifying the optional header row of the assignments table
pub const ASSIGNMENT_HEADER_TOKEN: &str = "protein_id";

/// The reference table a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Categories,
    Definitions,
    Assignments,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Categories => write!(f, "functional categories"),
            Self::Definitions => write!(f, "COG definitions"),
            Self::Assignments => write!(f, "COG assignments"),
        }
    }
}

/// A malformed row that was skipped during loading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{table} line {line}: {reason}")]
pub struct RowFormatError {
    pub table: Table,
    /// 1-based line number
    pub line: usize,
    pub reason: String,
}

/// Rows parsed from one table plus the rows that had to be skipped
#[derive(Debug, Clone)]
pub struct ParsedTable<T> {
    pub rows: Vec<T>,
    pub skipped: Vec<RowFormatError>,
}

impl<T> Default for ParsedTable<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> ParsedTable<T> {
    fn skip(&mut self, table: Table, line: usize, reason: String) {
        let error = RowFormatError {
            table,
            line,
            reason,
        };
        warn!("Skipping row: {error}");
        self.skipped.push(error);
    }
}

/// A row of the definitions table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionRow {
    pub cog_id: String,
    pub category_code: String,
    pub description: String,
}

/// The two retained columns of an assignments row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub protein_id: String,
    pub cog_id: String,
}

/// Iterate (1-based line number, trimmed line) over data lines, skipping blanks and comments
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

/// Parse the functional categories table: `code<TAB>name[<TAB>...]`
pub fn parse_categories(text: &str) -> ParsedTable<FunctionalCategory> {
    let mut parsed = ParsedTable::default();

    for (line_num, line) in data_lines(text) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < CATEGORY_FIELDS {
            parsed.skip(
                Table::Categories,
                line_num,
                format!("expected at least {CATEGORY_FIELDS} fields, found {}", fields.len()),
            );
            continue;
        }
        parsed
            .rows
            .push(FunctionalCategory::new(fields[0].trim(), fields[1].trim()));
    }

    parsed
}

/// Parse the COG definitions table: `cog_id<TAB>category<TAB>description[<TAB>...]`
pub fn parse_definitions(text: &str) -> ParsedTable<DefinitionRow> {
    let mut parsed = ParsedTable::default();

    for (line_num, line) in data_lines(text) {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < DEFINITION_FIELDS {
            parsed.skip(
                Table::Definitions,
                line_num,
                format!(
                    "expected at least {DEFINITION_FIELDS} fields, found {}",
                    fields.len()
                ),
            );
            continue;
        }
        parsed.rows.push(DefinitionRow {
            cog_id: fields[0].trim().to_string(),
            category_code: fields[1].trim().to_string(),
            description: fields[2].trim().to_string(),
        });
    }

    parsed
}

/// Whether the first line of the assignments table is a header row.
///
/// Only a non-comment line whose `protein_id` column is exactly
/// [`ASSIGNMENT_HEADER_TOKEN`] (ignoring case) qualifies; anything else is
/// treated as data.
fn is_assignment_header(first_line: &str) -> bool {
    let trimmed = first_line.trim();
    !trimmed.starts_with('#')
        && trimmed
            .split(',')
            .nth(2)
            .is_some_and(|field| field.trim().eq_ignore_ascii_case(ASSIGNMENT_HEADER_TOKEN))
}

/// Parse the COG assignments table.
///
/// Layout: `domain_id,genome_id,protein_id,protein_length,cog_id,membership_class,gene_name`.
/// Only `protein_id` and `cog_id` are kept. Rows whose COG is the `-` sentinel
/// (or empty) are valid but produce no assignment.
pub fn parse_assignments(text: &str) -> ParsedTable<AssignmentRow> {
    let mut parsed = ParsedTable::default();
    let has_header = text.lines().next().is_some_and(is_assignment_header);

    for (line_num, line) in data_lines(text) {
        if has_header && line_num == 1 {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() < ASSIGNMENT_FIELDS {
            parsed.skip(
                Table::Assignments,
                line_num,
                format!("expected {ASSIGNMENT_FIELDS} fields, found {}", fields.len()),
            );
            continue;
        }

        let protein_id = fields[2].trim();
        let cog_id = fields[4].trim();
        if protein_id.is_empty() || cog_id.is_empty() || cog_id == UNASSIGNED_COG {
            continue;
        }

        parsed.rows.push(AssignmentRow {
            protein_id: protein_id.to_string(),
            cog_id: cog_id.to_string(),
        });
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_categories() {
        let text = "# code\tname\nJ\tTranslation, ribosomal structure and biogenesis\n\nK\tTranscription\n";
        let parsed = parse_categories(text);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].code, "J");
        assert_eq!(parsed.rows[1].name, "Transcription");
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_parse_definitions_skips_short_rows() {
        let text = "COG0001\tH\tGlutamate-1-semialdehyde aminotransferase\tHemL\nCOG0002\tE\nCOG0003\tP\tAnion-transporting ATPase\n";
        let parsed = parse_definitions(text);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].table, Table::Definitions);
        assert_eq!(parsed.skipped[0].line, 2);
    }

    #[test]
    fn test_parse_assignments_with_header() {
        let text = "domain_id,genome_id,protein_id,protein_length,cog_id,membership_class,gene_name\n\
                    d1,g1,NP_214052.1,426,COG0001,0,hemL\n";
        let parsed = parse_assignments(text);

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].protein_id, "NP_214052.1");
        assert_eq!(parsed.rows[0].cog_id, "COG0001");
    }

    #[test]
    fn test_parse_assignments_without_header_keeps_first_row() {
        let text = "d1,g1,NP_214052.1,426,COG0001,0,hemL\nd2,g1,NP_214053.1,300,COG0002,0,argC\n";
        let parsed = parse_assignments(text);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].protein_id, "NP_214052.1");
    }

    #[test]
    fn test_parse_assignments_token_outside_id_column_is_data() {
        let text = "d1,g1,P1,100,COG0001,0,protein_id_binding\nd2,protein_id,P2,100,COG0002,0,x\n";
        let parsed = parse_assignments(text);

        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.rows[0].protein_id, "P1");
    }

    #[test]
    fn test_parse_assignments_header_ignores_case() {
        let text = "Domain_ID,Genome_ID,Protein_ID,Length,COG_ID,Class,Gene\nd1,g1,P1,100,COG0001,0,x\n";
        let parsed = parse_assignments(text);

        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_parse_assignments_comment_first_line_is_not_header() {
        let text = "# protein_id listing\nd1,g1,P1,100,COG0001,0,x\n";
        let parsed = parse_assignments(text);

        assert_eq!(parsed.rows.len(), 1);
        assert!(parsed.skipped.is_empty());
    }

    #[test]
    fn test_parse_assignments_sentinel_and_short_rows() {
        let text = "d1,g1,P1,100,-,0,x\nd2,g1,P2,100\nd3,g1,P3,100,COG0003,1,\n";
        let parsed = parse_assignments(text);

        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].protein_id, "P3");
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line, 2);
    }
}

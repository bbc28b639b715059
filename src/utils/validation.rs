//! Centralized validation helpers for query sequences and run settings.

use std::collections::BTreeSet;

/// Residue codes accepted in query protein sequences
pub const VALID_RESIDUES: &str = "ACDEFGHIKLMNPQRSTVWYXBZJU*-";

/// Sequences shorter than this are flagged as too short to classify reliably
pub const MIN_SEQUENCE_LENGTH: usize = 10;

/// Sequences longer than this are flagged as unusually long
pub const MAX_SEQUENCE_LENGTH: usize = 10_000;

/// Maximum tolerated fraction of gap or unknown residues before flagging
pub const MAX_AMBIGUOUS_FRACTION: f64 = 0.1;

/// Whether `c` is an accepted (uppercase) residue code
#[must_use]
pub fn is_valid_residue(c: char) -> bool {
    VALID_RESIDUES.contains(c)
}

/// Uppercase a sequence line and drop whitespace and invalid residues.
///
/// Returns the cleaned residues and the set of characters that were dropped.
#[must_use]
pub fn clean_residues(line: &str) -> (String, BTreeSet<char>) {
    let mut invalid = BTreeSet::new();
    let cleaned = line
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .filter(|&c| {
            let ok = is_valid_residue(c);
            if !ok {
                invalid.insert(c);
            }
            ok
        })
        .collect();
    (cleaned, invalid)
}

/// Describe composition problems in a cleaned protein sequence
#[must_use]
pub fn sequence_issues(residues: &str) -> Vec<String> {
    let mut issues = Vec::new();
    let length = residues.len();

    if length < MIN_SEQUENCE_LENGTH {
        issues.push(format!(
            "Sequence too short (< {MIN_SEQUENCE_LENGTH} amino acids)"
        ));
    } else if length > MAX_SEQUENCE_LENGTH {
        issues.push(format!(
            "Sequence very long (> {MAX_SEQUENCE_LENGTH} amino acids)"
        ));
    }

    let stops = residues.matches('*').count();
    if stops > 1 {
        issues.push(format!("Multiple stop codons ({stops})"));
    }

    if length > 0 {
        let gaps = residues.matches('-').count();
        let unknowns = residues.matches('X').count();
        let gap_fraction = crate::utils::format::ratio(gaps, length);
        let unknown_fraction = crate::utils::format::ratio(unknowns, length);

        if gap_fraction > MAX_AMBIGUOUS_FRACTION {
            issues.push(format!("High gap content ({:.1}%)", gap_fraction * 100.0));
        }
        if unknown_fraction > MAX_AMBIGUOUS_FRACTION {
            issues.push(format!(
                "High unknown residue content ({:.1}%)",
                unknown_fraction * 100.0
            ));
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_residues() {
        let (cleaned, invalid) = clean_residues("mkv lA1*");
        assert_eq!(cleaned, "MKVLA*");
        assert_eq!(invalid.into_iter().collect::<Vec<_>>(), vec!['1']);
    }

    #[test]
    fn test_sequence_issues_short() {
        let issues = sequence_issues("MKV");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("too short"));
    }

    #[test]
    fn test_sequence_issues_composition() {
        let issues = sequence_issues("MKXXXXX*L*--");
        assert!(issues.iter().any(|i| i.contains("Multiple stop codons (2)")));
        assert!(issues.iter().any(|i| i.contains("High gap content")));
        assert!(issues.iter().any(|i| i.contains("High unknown residue content")));
    }

    #[test]
    fn test_clean_sequence_has_no_issues() {
        assert!(sequence_issues("MKVLAAGIVGLLLAAQPAMA").is_empty());
    }
}

//! Identifier normalization for search-hit subjects.
//!
//! Index builders write subject ids in incompatible legacy formats
//! (`gi|15604522|ref|NP_214052.1|`, `sp|P69905|HBA_HUMAN`, `WP_011030378.1`).
//! [`normalize`] reduces them all to the bare accession used as the key of the
//! assignments table.

/// Database tags recognized in pipe-delimited FASTA headers, in priority order
pub const DATABASE_TAGS: [&str; 7] = ["ref", "gb", "emb", "dbj", "pir", "sp", "tr"];

/// Reduce a raw identifier to its canonical accession.
///
/// Takes the last non-blank pipe-delimited segment, then drops the
/// dot-separated version suffix. The result is trimmed and contains neither
/// `|` nor `.`, so the function is idempotent.
///
/// ```
/// use cog_classifier::matching::resolver::normalize;
///
/// assert_eq!(normalize("ref|NP_214052.1|"), "NP_214052");
/// assert_eq!(normalize("ACCESSION.2"), "ACCESSION");
/// assert_eq!(normalize(normalize("gb|AAC73113.1|")), "AAC73113");
/// ```
#[must_use]
pub fn normalize(raw_id: &str) -> &str {
    let segment = raw_id
        .rsplit('|')
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("");

    match segment.find('.') {
        Some(pos) => segment[..pos].trim_end(),
        None => segment,
    }
}

/// Extract the protein accession from a reference FASTA header.
///
/// A tagged segment (`ref|ACC|`, `sp|ACC|`, ...) wins and keeps its version.
/// Otherwise the first whitespace token is used with a leading `gi|` or
/// database tag and any version suffix removed.
#[must_use]
pub fn extract_protein_id(header: &str) -> Option<String> {
    let token = header.split_whitespace().next()?;
    let segments: Vec<&str> = token.split('|').collect();

    for tag in DATABASE_TAGS {
        if let Some(pos) = segments.iter().position(|s| *s == tag) {
            if let Some(accession) = segments.get(pos + 1).filter(|s| !s.is_empty()) {
                return Some((*accession).to_string());
            }
        }
    }

    let mut id = token;
    for prefix in std::iter::once("gi").chain(DATABASE_TAGS) {
        if let Some(rest) = id
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('|'))
        {
            id = rest;
            break;
        }
    }

    let id = id.split('.').next().unwrap_or(id);
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_database_styles() {
        let cases = [
            ("ref|NP_214052.1|", "NP_214052"),
            ("gi|15604522|ref|NP_214052.1|", "NP_214052"),
            ("gb|AAC73113.1|", "AAC73113"),
            ("emb|CAA12345.2|", "CAA12345"),
            ("dbj|BAA00001.1|", "BAA00001"),
            ("pir||S12345", "S12345"),
            ("sp|P69905|HBA_HUMAN", "HBA_HUMAN"),
            ("tr|Q9XYZ1|Q9XYZ1_ECOLI", "Q9XYZ1_ECOLI"),
            ("WP_011030378.1", "WP_011030378"),
            ("ACCESSION.2", "ACCESSION"),
            ("plain", "plain"),
        ];

        for (raw, expected) in cases {
            assert_eq!(normalize(raw), expected, "normalizing {raw}");
        }
    }

    #[test]
    fn test_normalize_trims_selected_segment() {
        assert_eq!(normalize("gi|15604522| NP_214052.1"), "NP_214052");
        assert_eq!(normalize("ref| NP_214052 .1|"), "NP_214052");
        assert_eq!(normalize("gb|AAC73113.1| "), "AAC73113");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            "ref|NP_214052.1|",
            "A.1.2",
            "gi|1|ref|X_1.3|",
            "|||",
            ".1",
            "",
            "sp|P69905|HBA_HUMAN",
            "  padded.4  ",
            "gi|15604522| NP_214052.1",
            "ref| NP_214052 .1|",
            "gb|AAC73113.1|  ",
        ];
        for raw in inputs {
            let once = normalize(raw);
            assert_eq!(normalize(once), once, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_normalize_degenerate_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("|||"), "");
        assert_eq!(normalize("ref|NP_1|"), "NP_1");
    }

    #[test]
    fn test_extract_protein_id_tagged() {
        assert_eq!(
            extract_protein_id("gi|15604522|ref|NP_214052.1| [COG0001] hemL").as_deref(),
            Some("NP_214052.1")
        );
        assert_eq!(
            extract_protein_id("sp|P69905|HBA_HUMAN Hemoglobin").as_deref(),
            Some("P69905")
        );
    }

    #[test]
    fn test_extract_protein_id_fallback() {
        assert_eq!(
            extract_protein_id("WP_000001.1 hypothetical protein").as_deref(),
            Some("WP_000001")
        );
        assert_eq!(extract_protein_id("gi|12345").as_deref(), Some("12345"));
        assert_eq!(extract_protein_id(""), None);
    }
}

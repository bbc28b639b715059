use serde::{Deserialize, Serialize};

use crate::core::hit::AnnotatedHit;

/// Classification of one query sequence.
///
/// The variants make "classified", "no hit" and "failed" mutually exclusive:
/// a result either carries hits (possibly none) or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassificationResult {
    /// The search or parse stage failed for this sequence
    Error {
        sequence_id: String,
        length: usize,
        error: String,
    },

    /// Search completed; `best_hit` is absent when nothing resolved
    Hits {
        sequence_id: String,
        length: usize,
        best_hit: Option<AnnotatedHit>,
        #[serde(default)]
        all_hits: Vec<AnnotatedHit>,
    },
}

/// Bucket a result falls into for batch statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Classified,
    Unclassified,
    Error,
}

impl ClassificationResult {
    /// A result for a sequence with no resolvable hits
    pub fn no_hit(sequence_id: impl Into<String>, length: usize) -> Self {
        Self::Hits {
            sequence_id: sequence_id.into(),
            length,
            best_hit: None,
            all_hits: Vec::new(),
        }
    }

    pub fn error(sequence_id: impl Into<String>, length: usize, error: impl Into<String>) -> Self {
        Self::Error {
            sequence_id: sequence_id.into(),
            length,
            error: error.into(),
        }
    }

    pub fn sequence_id(&self) -> &str {
        match self {
            Self::Error { sequence_id, .. } | Self::Hits { sequence_id, .. } => sequence_id,
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Self::Error { length, .. } | Self::Hits { length, .. } => *length,
        }
    }

    pub fn best_hit(&self) -> Option<&AnnotatedHit> {
        match self {
            Self::Hits { best_hit, .. } => best_hit.as_ref(),
            Self::Error { .. } => None,
        }
    }

    pub fn all_hits(&self) -> &[AnnotatedHit] {
        match self {
            Self::Hits { all_hits, .. } => all_hits,
            Self::Error { .. } => &[],
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error { error, .. } => Some(error),
            Self::Hits { .. } => None,
        }
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Error { .. } => Outcome::Error,
            Self::Hits {
                best_hit: Some(_), ..
            } => Outcome::Classified,
            Self::Hits { best_hit: None, .. } => Outcome::Unclassified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes() {
        assert_eq!(
            ClassificationResult::no_hit("q1", 10).outcome(),
            Outcome::Unclassified
        );
        assert_eq!(
            ClassificationResult::error("q2", 10, "blastp timed out").outcome(),
            Outcome::Error
        );
    }

    #[test]
    fn test_error_json_shape() {
        let result = ClassificationResult::error("q2", 120, "BLAST search failed");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["sequence_id"], "q2");
        assert_eq!(json["length"], 120);
        assert_eq!(json["error"], "BLAST search failed");
        assert!(json.get("best_hit").is_none());
    }

    #[test]
    fn test_json_round_trip_distinguishes_variants() {
        let results = vec![
            ClassificationResult::no_hit("q1", 50),
            ClassificationResult::error("q2", 60, "boom"),
        ];
        let json = serde_json::to_string(&results).unwrap();
        let back: Vec<ClassificationResult> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, results);
    }

    #[test]
    fn test_no_hit_json_has_null_best_hit() {
        let json = serde_json::to_value(ClassificationResult::no_hit("q1", 5)).unwrap();
        assert!(json["best_hit"].is_null());
        assert_eq!(json["all_hits"].as_array().map(Vec::len), Some(0));
    }
}

//! Batch statistics over classification results.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::core::result::{ClassificationResult, Outcome};
use crate::utils::format::percentage;

/// Number of top COGs shown in the command-line summary
pub const SUMMARY_TOP_N: usize = 10;

/// Number of top COGs kept in a generated report
pub const REPORT_TOP_N: usize = 20;

/// Counts keyed by label, in a meaningful order. Serialized as a JSON object
/// whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankedCounts {
    entries: Vec<(String, usize)>,
    /// Position of each key in `entries`
    positions: HashMap<String, usize>,
}

impl RankedCounts {
    /// Add one occurrence of `key`; new keys are appended
    fn increment(&mut self, key: &str) {
        if let Some(&index) = self.positions.get(key) {
            self.entries[index].1 += 1;
        } else {
            self.positions.insert(key.to_string(), self.entries.len());
            self.entries.push((key.to_string(), 1));
        }
    }

    /// Keep the `top_n` highest counts; equal counts stay in first-seen order
    fn rank_by_count(&mut self, top_n: usize) {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(top_n);
        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.positions.get(key).map(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }
}

impl Serialize for RankedCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// Significance bucket of a best-hit e-value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalueBucket {
    /// e-value <= 1e-10
    VeryStrong,
    /// e-value <= 1e-5
    Strong,
    /// e-value <= 1e-3
    Moderate,
    /// e-value <= 0.01
    Weak,
    Other,
}

impl EvalueBucket {
    const THRESHOLDS: [(f64, Self); 4] = [
        (1e-10, Self::VeryStrong),
        (1e-5, Self::Strong),
        (1e-3, Self::Moderate),
        (0.01, Self::Weak),
    ];

    /// The tightest bucket containing `evalue`
    #[must_use]
    pub fn of(evalue: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(threshold, _)| evalue <= *threshold)
            .map_or(Self::Other, |(_, bucket)| *bucket)
    }

    /// Label used as the JSON key and in text reports
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryStrong => "1e-10",
            Self::Strong => "1e-5",
            Self::Moderate => "1e-3",
            Self::Weak => "0.01",
            Self::Other => "other",
        }
    }
}

/// Histogram of best-hit e-values over classified results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvalueDistribution {
    #[serde(rename = "1e-10")]
    pub very_strong: usize,
    #[serde(rename = "1e-5")]
    pub strong: usize,
    #[serde(rename = "1e-3")]
    pub moderate: usize,
    #[serde(rename = "0.01")]
    pub weak: usize,
    pub other: usize,
}

impl EvalueDistribution {
    fn record(&mut self, evalue: f64) {
        match EvalueBucket::of(evalue) {
            EvalueBucket::VeryStrong => self.very_strong += 1,
            EvalueBucket::Strong => self.strong += 1,
            EvalueBucket::Moderate => self.moderate += 1,
            EvalueBucket::Weak => self.weak += 1,
            EvalueBucket::Other => self.other += 1,
        }
    }

    /// Count for one bucket
    pub fn count(&self, bucket: EvalueBucket) -> usize {
        match bucket {
            EvalueBucket::VeryStrong => self.very_strong,
            EvalueBucket::Strong => self.strong,
            EvalueBucket::Moderate => self.moderate,
            EvalueBucket::Weak => self.weak,
            EvalueBucket::Other => self.other,
        }
    }

    /// Buckets with their counts, most significant first
    pub fn buckets(&self) -> [(EvalueBucket, usize); 5] {
        [
            EvalueBucket::VeryStrong,
            EvalueBucket::Strong,
            EvalueBucket::Moderate,
            EvalueBucket::Weak,
            EvalueBucket::Other,
        ]
        .map(|bucket| (bucket, self.count(bucket)))
    }
}

/// Statistics over a batch of classification results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_sequences: usize,
    pub classified: usize,
    pub unclassified: usize,
    pub errors: usize,

    /// Percentage of sequences classified, 0 for an empty batch
    pub classification_rate: f64,

    /// Best-hit category codes, in order of first appearance
    pub category_distribution: RankedCounts,

    /// Most frequent best-hit COGs, by descending count
    pub top_cogs: RankedCounts,

    pub evalue_distribution: EvalueDistribution,
}

impl Statistics {
    /// Share of classified sequences whose best hit has `count` occurrences
    pub fn share_of_classified(&self, count: usize) -> f64 {
        percentage(count, self.classified)
    }
}

/// Summarize a batch of results, keeping the `top_n` most frequent COGs.
///
/// COGs with equal counts keep the order in which they were first seen.
pub fn summarize(results: &[ClassificationResult], top_n: usize) -> Statistics {
    let mut classified = 0;
    let mut unclassified = 0;
    let mut errors = 0;
    let mut category_distribution = RankedCounts::default();
    let mut top_cogs = RankedCounts::default();
    let mut evalue_distribution = EvalueDistribution::default();

    for result in results {
        match result.outcome() {
            Outcome::Error => errors += 1,
            Outcome::Unclassified => unclassified += 1,
            Outcome::Classified => {
                classified += 1;
                if let Some(hit) = result.best_hit() {
                    category_distribution.increment(&hit.category_code);
                    top_cogs.increment(&hit.cog_id);
                    evalue_distribution.record(hit.ranking_evalue());
                }
            }
        }
    }

    top_cogs.rank_by_count(top_n);

    Statistics {
        total_sequences: results.len(),
        classified,
        unclassified,
        errors,
        classification_rate: percentage(classified, results.len()),
        category_distribution,
        top_cogs,
        evalue_distribution,
    }
}

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::types::{CogDefinition, ResolvedBy};

/// E-value assumed for ordering when the reported value is not numeric
pub const FALLBACK_EVALUE: f64 = 1.0;

/// A numeric column from search output.
///
/// Values that fail to parse are kept verbatim so a single bad column never
/// discards the whole row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field<T> {
    Value(T),
    Raw(String),
}

impl<T: FromStr> Field<T> {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        trimmed
            .parse()
            .map_or_else(|_| Self::Raw(trimmed.to_string()), Self::Value)
    }
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Raw(_) => None,
        }
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Self::Raw(_))
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Raw(s) => write!(f, "{s}"),
        }
    }
}

/// One row of tabular similarity-search output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    pub query_id: String,
    pub subject_id: String,
    #[serde(rename = "identity")]
    pub identity_pct: Field<f64>,
    #[serde(rename = "length")]
    pub alignment_length: Field<u64>,
    pub mismatches: Field<u64>,
    pub gap_opens: Field<u64>,
    pub query_start: Field<u64>,
    pub query_end: Field<u64>,
    pub subject_start: Field<u64>,
    pub subject_end: Field<u64>,
    pub evalue: Field<f64>,
    pub bit_score: Field<f64>,
    #[serde(rename = "coverage")]
    pub coverage_pct: Field<f64>,
}

impl RawHit {
    /// Build a hit with the given identifiers and e-value and zeroed alignment columns
    pub fn new(query_id: impl Into<String>, subject_id: impl Into<String>, evalue: f64) -> Self {
        Self {
            query_id: query_id.into(),
            subject_id: subject_id.into(),
            identity_pct: Field::Value(0.0),
            alignment_length: Field::Value(0),
            mismatches: Field::Value(0),
            gap_opens: Field::Value(0),
            query_start: Field::Value(0),
            query_end: Field::Value(0),
            subject_start: Field::Value(0),
            subject_end: Field::Value(0),
            evalue: Field::Value(evalue),
            bit_score: Field::Value(0.0),
            coverage_pct: Field::Value(0.0),
        }
    }

    #[must_use]
    pub fn with_bit_score(mut self, bit_score: f64) -> Self {
        self.bit_score = Field::Value(bit_score);
        self
    }

    #[must_use]
    pub fn with_identity(mut self, identity_pct: f64) -> Self {
        self.identity_pct = Field::Value(identity_pct);
        self
    }

    /// E-value used for ranking; unparseable values rank as [`FALLBACK_EVALUE`]
    #[must_use]
    pub fn ranking_evalue(&self) -> f64 {
        self.evalue.value().copied().unwrap_or(FALLBACK_EVALUE)
    }
}

/// A search hit whose subject resolved to a COG
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedHit {
    #[serde(flatten)]
    pub hit: RawHit,
    pub cog_id: String,
    #[serde(rename = "cog_name")]
    pub cog_description: String,
    #[serde(rename = "category")]
    pub category_code: String,
    pub category_name: String,
    pub resolved_by: ResolvedBy,
}

impl AnnotatedHit {
    pub fn new(hit: RawHit, definition: &CogDefinition, resolved_by: ResolvedBy) -> Self {
        Self {
            hit,
            cog_id: definition.cog_id.clone(),
            cog_description: definition.description.clone(),
            category_code: definition.category_code.clone(),
            category_name: definition.category_name.clone(),
            resolved_by,
        }
    }

    #[must_use]
    pub fn ranking_evalue(&self) -> f64 {
        self.hit.ranking_evalue()
    }
}

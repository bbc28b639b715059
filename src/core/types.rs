use serde::{Deserialize, Serialize};

/// Category name used when a COG references a code missing from the categories table
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Sentinel used in the assignments table for proteins without a COG
pub const UNASSIGNED_COG: &str = "-";

/// A single-letter functional category (e.g. `J`: translation, ribosomal structure)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionalCategory {
    pub code: String,
    pub name: String,
}

impl FunctionalCategory {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// A COG definition with its category name resolved at load time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CogDefinition {
    pub cog_id: String,

    /// Soft reference to a [`FunctionalCategory`] code
    #[serde(rename = "category")]
    pub category_code: String,

    pub description: String,

    /// Name of the referenced category, or [`UNKNOWN_CATEGORY`]
    pub category_name: String,
}

/// Which lookup strategy resolved a protein identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    /// The normalized accession matched an assignment
    Normalized,
    /// Only the identifier exactly as reported matched
    RawId,
}

impl std::fmt::Display for ResolvedBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normalized => write!(f, "normalized"),
            Self::RawId => write!(f, "raw_id"),
        }
    }
}

/// Field of a COG definition to search in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SearchField {
    #[default]
    Description,
    Category,
    CogId,
}

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::aggregate::{REPORT_TOP_N, SUMMARY_TOP_N};
use crate::output::ResultFormat;

/// Default e-value threshold passed to the search tool
pub const DEFAULT_EVALUE: f64 = 1e-5;

/// Default wall-clock limit for one search invocation (one hour)
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;

/// Upper bound accepted for `timeout_secs` (seven days)
pub const MAX_TIMEOUT_SECS: u64 = 7 * 24 * 3600;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported output format '{0}' (expected json, csv or tsv)")]
    UnsupportedFormat(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Parameters of the similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search tool executable
    pub program: String,
    pub evalue: f64,
    pub max_targets: usize,
    /// Threads used by one search invocation
    pub threads: usize,
    pub word_size: usize,
    pub timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            program: "blastp".to_string(),
            evalue: DEFAULT_EVALUE,
            max_targets: 10,
            threads: 4,
            word_size: 3,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// What to keep and how to present it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Keep every resolved hit, not just the best one
    pub include_all_hits: bool,
    pub summary_top_n: usize,
    pub report_top_n: usize,
    /// Results format used when none is given on the command line
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            include_all_hits: true,
            summary_top_n: SUMMARY_TOP_N,
            report_top_n: REPORT_TOP_N,
            format: ResultFormat::Json.to_string(),
        }
    }
}

/// Configuration of a classification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub search: SearchConfig,
    pub output: OutputConfig,
    /// Number of sequences searched at the same time
    pub concurrency: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            output: OutputConfig::default(),
            concurrency: 1,
        }
    }
}

impl ClassifierConfig {
    /// Load a configuration from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| {
            ConfigurationError::Parse {
                path: display,
                source,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would only fail once the batch is running
    ///
    /// # Errors
    ///
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.concurrency == 0 {
            return Err(invalid("concurrency", "must be at least 1"));
        }
        if !self.search.evalue.is_finite() || self.search.evalue < 0.0 {
            return Err(invalid(
                "search.evalue",
                format!("{} is not a non-negative number", self.search.evalue),
            ));
        }
        if self.search.max_targets == 0 {
            return Err(invalid("search.max_targets", "must be at least 1"));
        }
        if self.search.threads == 0 {
            return Err(invalid("search.threads", "must be at least 1"));
        }
        if self.search.timeout_secs == 0 || self.search.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(invalid(
                "search.timeout_secs",
                format!("must be between 1 and {MAX_TIMEOUT_SECS}"),
            ));
        }
        if self.search.program.trim().is_empty() {
            return Err(invalid("search.program", "must not be empty"));
        }
        self.default_format()?;
        Ok(())
    }

    /// The configured default results format
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` if the name is not a known format.
    pub fn default_format(&self) -> Result<ResultFormat, ConfigurationError> {
        self.output.format.parse()
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

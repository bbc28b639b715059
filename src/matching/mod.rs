//! Resolution of search hits to COG annotations and batch statistics.
//!
//! - [`resolver`]: normalizes subject identifiers to assignment-table keys
//! - [`annotator`]: turns one query's hit list into a [`ClassificationResult`]
//! - [`aggregate`]: summarizes a batch of results
//!
//! ## Example
//!
//! ```rust,no_run
//! use cog_classifier::catalog::store::ReferenceStore;
//! use cog_classifier::matching::aggregate::{summarize, SUMMARY_TOP_N};
//! use cog_classifier::matching::annotator::HitAnnotator;
//! use cog_classifier::parsing::blast::parse_hits;
//!
//! let store = ReferenceStore::from_texts("J\tTranslation\n", "COG0048\tJ\tRibosomal protein S12\n", "");
//! let hits = parse_hits("q1\tP69905.1\t98.0\t120\t2\t0\t1\t120\t1\t120\t1e-60\t240\t100\n");
//!
//! let result = HitAnnotator::new(&store).annotate(hits, "q1", 120);
//! let stats = summarize(&[result], SUMMARY_TOP_N);
//! println!("{:.1}% classified", stats.classification_rate);
//! ```
//!
//! [`ClassificationResult`]: crate::core::result::ClassificationResult

pub mod aggregate;
pub mod annotator;
pub mod resolver;

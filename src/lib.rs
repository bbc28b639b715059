//! # cog-classifier
//!
//! A library for assigning protein sequences to NCBI COGs (Clusters of
//! Orthologous Genes).
//!
//! Each query protein is searched against the COG reference proteins with an
//! external similarity-search tool (`blastp`). The subject identifiers of the
//! resulting hits come in several legacy database formats; they are normalized,
//! resolved to COG definitions through the protein assignments table, and the
//! most significant resolved hit becomes the classification of the query.
//!
//! ## Features
//!
//! - **Load-once reference store**: COG definitions, functional categories and
//!   protein assignments indexed in memory and shared across workers
//! - **Identifier normalization**: `ref|`, `gb|`, `sp|` and bare accessions all
//!   resolve to the same assignment key, with a raw-id fallback
//! - **Bounded concurrency**: searches run on a worker pool with a per-search
//!   timeout; one failing sequence never aborts a batch
//! - **Batch statistics**: classification rate, category distribution, top
//!   COGs and e-value histogram
//!
//! ## Example
//!
//! ```rust,no_run
//! use cog_classifier::catalog::layout::{ReferenceData, ReferenceLayout};
//! use cog_classifier::matching::annotator::HitAnnotator;
//! use cog_classifier::parsing::blast::parse_hits_file;
//! use std::path::Path;
//!
//! let data = ReferenceData::new(ReferenceLayout::new("./data"));
//! let store = data.load().unwrap();
//!
//! let hits = parse_hits_file(Path::new("query.blast")).unwrap();
//! let result = HitAnnotator::new(&store).annotate(hits, "query_1", 250);
//!
//! if let Some(hit) = result.best_hit() {
//!     println!("{} [{}] {}", hit.cog_id, hit.category_code, hit.cog_description);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Reference data storage, indexing and on-disk layout
//! - [`core`]: Core data types for definitions, hits and results
//! - [`matching`]: Identifier resolution, hit annotation and statistics
//! - [`parsing`]: Parsers for reference tables, search output and FASTA
//! - [`search`]: External search tool invocation
//! - [`pipeline`]: Configuration and the batch classifier
//! - [`output`]: Result writers and reports
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod output;
pub mod parsing;
pub mod pipeline;
pub mod search;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::layout::{ReferenceData, ReferenceLayout};
pub use catalog::store::ReferenceStore;
pub use core::hit::{AnnotatedHit, RawHit};
pub use core::result::ClassificationResult;
pub use core::types::*;
pub use matching::aggregate::{summarize, Statistics};
pub use matching::annotator::{annotate, HitAnnotator};
pub use pipeline::classifier::Classifier;
pub use pipeline::config::ClassifierConfig;

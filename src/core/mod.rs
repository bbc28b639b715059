//! Core data types for COG classification.
//!
//! - [`FunctionalCategory`](types::FunctionalCategory), [`CogDefinition`](types::CogDefinition):
//!   reference records loaded from the COG tables
//! - [`RawHit`](hit::RawHit): one row of similarity-search output
//! - [`AnnotatedHit`](hit::AnnotatedHit): a hit whose subject resolved to a COG
//! - [`ClassificationResult`](result::ClassificationResult): the outcome for one query sequence
//!
//! ## Identifier formats
//!
//! Search indexes built from the COG FASTA report subjects in several legacy styles:
//!
//! | Database | Example subject id |
//! |----------|--------------------|
//! | RefSeq   | `ref\|NP_214052.1\|` |
//! | GenBank  | `gb\|AAC73113.1\|`   |
//! | UniProt  | `sp\|P69905\|HBA_HUMAN` |
//! | bare     | `WP_011030378.1`   |
//!
//! All of them are reduced to the bare accession by
//! [`normalize`](crate::matching::resolver::normalize) before lookup.

pub mod hit;
pub mod result;
pub mod types;

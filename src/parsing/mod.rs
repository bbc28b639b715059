//! Parsers for the files exchanged with the outside world.
//!
//! - **Reference tables**: functional categories, COG definitions and
//!   protein assignments ([`tables`])
//! - **Search output**: 13-column tabular hit lists ([`blast`])
//! - **FASTA**: query sequences and reference headers ([`fasta`])
//!
//! ## Example
//!
//! ```rust,no_run
//! use cog_classifier::parsing::fasta::{read_sequences, validate_sequences};
//! use std::path::Path;
//!
//! let sequences = read_sequences(Path::new("proteins.faa")).unwrap();
//! for (id, issues) in validate_sequences(&sequences) {
//!     eprintln!("{id}: {}", issues.join(", "));
//! }
//! ```

pub mod blast;
pub mod fasta;
pub mod tables;

//! COG reference data: storage, indexing and on-disk layout.
//!
//! The reference data consists of three tables distributed by NCBI:
//!
//! | File | Contents | Format |
//! |------|----------|--------|
//! | `fun-20.tab` | functional categories | tab-separated `code, name, ...` |
//! | `cog-20.def.tab` | COG definitions | tab-separated `cog_id, category, description, ...` |
//! | `cog-20.cog.csv` | protein assignments | comma-separated, 7 columns |
//!
//! plus the reference protein FASTA and the search index built from it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cog_classifier::catalog::layout::{ReferenceData, ReferenceLayout};
//!
//! let data = ReferenceData::new(ReferenceLayout::new("./data"));
//! let store = data.load().unwrap();
//!
//! if let Some(resolution) = store.lookup_by_protein_id("ref|NP_214052.1|") {
//!     println!("{}: {}", resolution.definition.cog_id, resolution.definition.description);
//! }
//! ```

pub mod index;
pub mod layout;
pub mod store;

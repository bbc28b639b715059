use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use flate2::read::GzDecoder;
use tracing::{debug, info};

use super::store::{LoadError, ReferenceStore};

/// Functional categories table
pub const CATEGORIES_FILE: &str = "fun-20.tab";
/// COG definitions table
pub const DEFINITIONS_FILE: &str = "cog-20.def.tab";
/// Protein to COG assignments table
pub const ASSIGNMENTS_FILE: &str = "cog-20.cog.csv";
/// Reference protein sequences
pub const FASTA_FILE: &str = "cog-20.fa";
/// Compressed reference protein sequences as distributed by NCBI
pub const FASTA_GZ_FILE: &str = "cog-20.fa.gz";
/// Base name of the protein search index
pub const SEARCH_INDEX_NAME: &str = "cog_blast_db";
/// Extensions of the protein search index; any one of them marks the index as built
pub const SEARCH_INDEX_EXTENSIONS: [&str; 3] = ["phr", "pin", "psq"];

/// Locations of the reference files inside a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceLayout {
    data_dir: PathBuf,
}

impl ReferenceLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn categories(&self) -> PathBuf {
        self.data_dir.join(CATEGORIES_FILE)
    }

    pub fn definitions(&self) -> PathBuf {
        self.data_dir.join(DEFINITIONS_FILE)
    }

    pub fn assignments(&self) -> PathBuf {
        self.data_dir.join(ASSIGNMENTS_FILE)
    }

    pub fn fasta(&self) -> PathBuf {
        self.data_dir.join(FASTA_FILE)
    }

    pub fn fasta_gz(&self) -> PathBuf {
        self.data_dir.join(FASTA_GZ_FILE)
    }

    /// Path prefix passed to the search tool as its database
    pub fn search_index(&self) -> PathBuf {
        self.data_dir.join(SEARCH_INDEX_NAME)
    }

    /// Reference files that must exist before classification
    pub fn required_files(&self) -> [PathBuf; 4] {
        [
            self.definitions(),
            self.assignments(),
            self.fasta(),
            self.categories(),
        ]
    }

    /// Required files that are currently absent
    pub fn missing_files(&self) -> Vec<PathBuf> {
        self.required_files()
            .into_iter()
            .filter(|p| !p.exists())
            .collect()
    }

    /// Whether any file of the search index exists
    pub fn search_index_exists(&self) -> bool {
        SEARCH_INDEX_EXTENSIONS.iter().any(|ext| {
            self.data_dir
                .join(format!("{SEARCH_INDEX_NAME}.{ext}"))
                .exists()
        })
    }

    /// Filesystem precondition for classification: every reference file and
    /// the search index are present. The file contents are not inspected.
    pub fn is_ready(&self) -> bool {
        self.missing_files().is_empty() && self.search_index_exists()
    }

    /// Decompress the reference FASTA from its `.gz` download if it is not
    /// already present. Returns `true` if a file was written.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if neither file exists or decompression fails.
    pub fn decompress_fasta(&self) -> std::io::Result<bool> {
        let fasta = self.fasta();
        if fasta.exists() {
            debug!("{} already present", fasta.display());
            return Ok(false);
        }

        let compressed = self.fasta_gz();
        info!("Decompressing {}", compressed.display());
        let mut decoder = GzDecoder::new(BufReader::new(File::open(&compressed)?));

        // Renamed into place once complete
        let partial = fasta.with_extension("fa.partial");
        let mut writer = BufWriter::new(File::create(&partial)?);
        std::io::copy(&mut decoder, &mut writer)?;
        writer.flush()?;
        std::fs::rename(&partial, &fasta)?;

        info!("Wrote {}", fasta.display());
        Ok(true)
    }

    /// Load the reference tables from this layout
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if a table is missing or unreadable.
    pub fn load_store(&self) -> Result<ReferenceStore, LoadError> {
        ReferenceStore::load(&self.categories(), &self.definitions(), &self.assignments())
    }
}

/// A data directory whose reference store is loaded at most once.
///
/// Later calls to [`ReferenceData::load`] return the store from the first
/// successful load without touching the filesystem again.
#[derive(Debug)]
pub struct ReferenceData {
    layout: ReferenceLayout,
    store: OnceLock<Arc<ReferenceStore>>,
}

impl ReferenceData {
    pub fn new(layout: ReferenceLayout) -> Self {
        Self {
            layout,
            store: OnceLock::new(),
        }
    }

    pub fn layout(&self) -> &ReferenceLayout {
        &self.layout
    }

    pub fn is_ready(&self) -> bool {
        self.layout.is_ready()
    }

    pub fn is_loaded(&self) -> bool {
        self.store.get().is_some()
    }

    /// Load the store on first use and share it afterwards
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the first load fails; a failed load is not cached.
    pub fn load(&self) -> Result<Arc<ReferenceStore>, LoadError> {
        if let Some(store) = self.store.get() {
            debug!("Reference store already loaded");
            return Ok(Arc::clone(store));
        }

        let loaded = Arc::new(self.layout.load_store()?);
        Ok(Arc::clone(self.store.get_or_init(|| loaded)))
    }
}

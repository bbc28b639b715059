use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::core::types::{CogDefinition, FunctionalCategory, ResolvedBy, UNKNOWN_CATEGORY};
use crate::matching::resolver::normalize;
use crate::parsing::tables::{
    parse_assignments, parse_categories, parse_definitions, RowFormatError, Table,
};

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("{table} file not found: {}", path.display())]
    MissingFile { table: Table, path: PathBuf },

    #[error("Failed to read {table} file {}: {source}", path.display())]
    Io {
        table: Table,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Diagnostics collected while loading the reference tables
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub categories_loaded: usize,
    pub definitions_loaded: usize,
    pub assignments_loaded: usize,
    /// Rows skipped because they had too few fields
    pub skipped_rows: Vec<RowFormatError>,
}

impl LoadReport {
    /// Number of skipped rows from one table
    pub fn skipped_in(&self, table: Table) -> usize {
        self.skipped_rows.iter().filter(|r| r.table == table).count()
    }
}

/// A successful protein lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub definition: &'a CogDefinition,
    pub resolved_by: ResolvedBy,
}

/// Summary counts over the loaded reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatistics {
    pub total_cogs: usize,
    pub total_proteins: usize,
    pub functional_categories: usize,
    /// Number of COG definitions per category code
    pub category_distribution: BTreeMap<String, usize>,
}

/// The in-memory COG reference data with its lookup indexes.
///
/// Built once and never mutated afterwards, so it can be shared across worker
/// threads behind an `Arc` without locking.
#[derive(Debug, Default)]
pub struct ReferenceStore {
    /// Index: category code -> category
    categories: HashMap<String, FunctionalCategory>,

    /// Index: COG id -> definition
    definitions: HashMap<String, CogDefinition>,

    /// Index: protein id (as written in the assignments table) -> COG id
    assignments: HashMap<String, String>,

    report: LoadReport,
}

fn read_table(table: Table, path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        table,
        path: path.to_path_buf(),
        source,
    })?;
    // COG tables are not guaranteed to be UTF-8 (descriptions are Latin-1 in some releases)
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl ReferenceStore {
    /// Load the three reference tables from disk.
    ///
    /// All three files must exist; nothing is read until that has been checked.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::MissingFile` if any file is absent, or
    /// `LoadError::Io` if a file cannot be read.
    pub fn load(
        categories_path: &Path,
        definitions_path: &Path,
        assignments_path: &Path,
    ) -> Result<Self, LoadError> {
        let tables = [
            (Table::Categories, categories_path),
            (Table::Definitions, definitions_path),
            (Table::Assignments, assignments_path),
        ];
        if let Some((table, path)) = tables.iter().find(|(_, path)| !path.exists()) {
            return Err(LoadError::MissingFile {
                table: *table,
                path: path.to_path_buf(),
            });
        }

        let categories = read_table(Table::Categories, categories_path)?;
        let definitions = read_table(Table::Definitions, definitions_path)?;
        let assignments = read_table(Table::Assignments, assignments_path)?;

        let store = Self::from_texts(&categories, &definitions, &assignments);
        info!(
            "Loaded {} COG definitions, {} protein assignments, {} functional categories",
            store.definitions.len(),
            store.assignments.len(),
            store.categories.len()
        );
        Ok(store)
    }

    /// Build a store from the contents of the three tables.
    ///
    /// Categories are indexed before definitions so each definition can
    /// resolve its category name.
    pub fn from_texts(categories: &str, definitions: &str, assignments: &str) -> Self {
        let mut store = Self::default();

        let parsed = parse_categories(categories);
        store.report.skipped_rows.extend(parsed.skipped);
        for category in parsed.rows {
            store.categories.insert(category.code.clone(), category);
        }

        let parsed = parse_definitions(definitions);
        store.report.skipped_rows.extend(parsed.skipped);
        for row in parsed.rows {
            let category_name = store
                .categories
                .get(&row.category_code)
                .map_or_else(|| UNKNOWN_CATEGORY.to_string(), |c| c.name.clone());
            store.definitions.insert(
                row.cog_id.clone(),
                CogDefinition {
                    cog_id: row.cog_id,
                    category_code: row.category_code,
                    description: row.description,
                    category_name,
                },
            );
        }

        let parsed = parse_assignments(assignments);
        store.report.skipped_rows.extend(parsed.skipped);
        for row in parsed.rows {
            store.assignments.insert(row.protein_id, row.cog_id);
        }

        store.report.categories_loaded = store.categories.len();
        store.report.definitions_loaded = store.definitions.len();
        store.report.assignments_loaded = store.assignments.len();
        store
    }

    /// Resolve a search-hit subject id to its COG definition.
    ///
    /// The normalized accession is tried first, then the id exactly as given.
    /// An assignment pointing at an undefined COG resolves to `None`.
    pub fn lookup_by_protein_id(&self, id: &str) -> Option<Resolution<'_>> {
        let normalized = normalize(id);
        let (cog_id, resolved_by) = match self.assignments.get(normalized) {
            Some(cog_id) => (cog_id, ResolvedBy::Normalized),
            None => (self.assignments.get(id)?, ResolvedBy::RawId),
        };

        let definition = self.definitions.get(cog_id);
        if definition.is_none() {
            debug!("Protein {id} is assigned to undefined COG {cog_id}");
        }
        definition.map(|definition| Resolution {
            definition,
            resolved_by,
        })
    }

    /// Get a COG definition by id
    pub fn lookup_by_cog_id(&self, cog_id: &str) -> Option<&CogDefinition> {
        self.definitions.get(cog_id)
    }

    /// Get a functional category by code
    pub fn category(&self, code: &str) -> Option<&FunctionalCategory> {
        self.categories.get(code)
    }

    /// All functional categories, sorted by code
    pub fn functional_categories(&self) -> Vec<&FunctionalCategory> {
        let mut categories: Vec<_> = self.categories.values().collect();
        categories.sort_by(|a, b| a.code.cmp(&b.code));
        categories
    }

    /// Iterate all COG definitions in arbitrary order
    pub fn definitions(&self) -> impl Iterator<Item = &CogDefinition> {
        self.definitions.values()
    }

    /// Iterate all (protein id, COG id) assignments in arbitrary order
    pub fn assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.assignments
            .iter()
            .map(|(protein, cog)| (protein.as_str(), cog.as_str()))
    }

    /// Diagnostics from loading
    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    /// Compute summary counts from the loaded tables
    pub fn statistics(&self) -> StoreStatistics {
        let mut category_distribution = BTreeMap::new();
        for definition in self.definitions.values() {
            *category_distribution
                .entry(definition.category_code.clone())
                .or_default() += 1;
        }

        StoreStatistics {
            total_cogs: self.definitions.len(),
            total_proteins: self.assignments.len(),
            functional_categories: self.categories.len(),
            category_distribution,
        }
    }

    /// Check if the store holds no definitions
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const CATEGORIES: &str = "\
# COG functional categories
E\tAmino acid transport and metabolism
H\tCoenzyme transport and metabolism
J\tTranslation, ribosomal structure and biogenesis
";

    pub const DEFINITIONS: &str = "\
COG0001\tH\tGlutamate-1-semialdehyde aminotransferase\tHemL
COG0002\tE\tN-acetyl-gamma-glutamylphosphate reductase\tArgC
COG0048\tJ\tRibosomal protein S12\tRpsL
COG9999\tZ\tProtein with an undefined category
";

    pub const ASSIGNMENTS: &str = "\
domain_id,genome_id,protein_id,protein_length,cog_id,membership_class,gene_name
NP_214052.1_1,Aquifex,NP_214052.1,426,COG0001,0,hemL
WP_000001.1_1,Ecoli,WP_000001.1,344,COG0002,0,argC
P69905_1,Human,P69905,142,COG0048,0,rpsL
X_1,Ecoli,X_1,100,-,0,
Y_1,Ecoli,ORPHAN_1,100,COG5000,0,orphan
Z_1,Ecoli,Q9ZZZ1,120,COG9999,0,odd
";

    pub fn test_store() -> ReferenceStore {
        ReferenceStore::from_texts(CATEGORIES, DEFINITIONS, ASSIGNMENTS)
    }

    #[test]
    fn test_every_assignment_resolves_to_its_definition() {
        let store = test_store();
        let mut checked = 0;
        for (protein, cog) in store.assignments() {
            if store.lookup_by_cog_id(cog).is_none() {
                continue;
            }
            let resolution = store.lookup_by_protein_id(protein).unwrap();
            assert_eq!(resolution.definition.cog_id, cog);
            checked += 1;
        }
        assert_eq!(checked, 4);
    }

    #[test]
    fn test_lookup_normalizes_subject_id() {
        let store = test_store();

        let resolution = store.lookup_by_protein_id("P69905.2").unwrap();
        assert_eq!(resolution.definition.cog_id, "COG0048");
        assert_eq!(resolution.resolved_by, ResolvedBy::Normalized);
    }

    #[test]
    fn test_lookup_falls_back_to_raw_id() {
        let store = test_store();

        // The assignments table keys this protein by its versioned accession
        let resolution = store.lookup_by_protein_id("NP_214052.1").unwrap();
        assert_eq!(resolution.definition.cog_id, "COG0001");
        assert_eq!(resolution.resolved_by, ResolvedBy::RawId);
    }

    #[test]
    fn test_lookup_misses() {
        let store = test_store();
        assert!(store.lookup_by_protein_id("ref|UNKNOWN.1|").is_none());
        // "-" sentinel is never stored
        assert!(store.lookup_by_protein_id("X_1").is_none());
    }

    #[test]
    fn test_dangling_assignment_is_tolerated() {
        let store = test_store();
        assert!(store.assignments().any(|(p, _)| p == "ORPHAN_1"));
        assert!(store.lookup_by_protein_id("ORPHAN_1").is_none());
    }

    #[test]
    fn test_unknown_category_name() {
        let store = test_store();
        let definition = store.lookup_by_cog_id("COG9999").unwrap();
        assert_eq!(definition.category_code, "Z");
        assert_eq!(definition.category_name, UNKNOWN_CATEGORY);

        let definition = store.lookup_by_cog_id("COG0048").unwrap();
        assert_eq!(
            definition.category_name,
            "Translation, ribosomal structure and biogenesis"
        );
    }

    #[test]
    fn test_definitions_without_categories() {
        let store = ReferenceStore::from_texts("", DEFINITIONS, ASSIGNMENTS);
        assert!(store
            .definitions()
            .all(|d| d.category_name == UNKNOWN_CATEGORY));
    }

    #[test]
    fn test_statistics() {
        let stats = test_store().statistics();
        assert_eq!(stats.total_cogs, 4);
        assert_eq!(stats.total_proteins, 5);
        assert_eq!(stats.functional_categories, 3);
        assert_eq!(stats.category_distribution.get("H"), Some(&1));
        assert_eq!(stats.category_distribution.get("Z"), Some(&1));
    }

    #[test]
    fn test_skipped_rows_reported() {
        let store = ReferenceStore::from_texts(
            "J\n",
            "COG0001\tH\nCOG0002\tE\tArgC\n",
            "a,b,P1,100,COG0002,0,x\nshort,row\n",
        );
        let report = store.load_report();
        assert_eq!(report.skipped_rows.len(), 3);
        assert_eq!(report.skipped_in(Table::Categories), 1);
        assert_eq!(report.skipped_in(Table::Definitions), 1);
        assert_eq!(report.skipped_in(Table::Assignments), 1);
        assert_eq!(report.definitions_loaded, 1);
        assert_eq!(report.assignments_loaded, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let categories = dir.path().join("fun-20.tab");
        std::fs::write(&categories, CATEGORIES).unwrap();

        let err = ReferenceStore::load(
            &categories,
            &dir.path().join("cog-20.def.tab"),
            &dir.path().join("cog-20.cog.csv"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingFile {
                table: Table::Definitions,
                ..
            }
        ));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let categories = dir.path().join("fun-20.tab");
        let definitions = dir.path().join("cog-20.def.tab");
        let assignments = dir.path().join("cog-20.cog.csv");
        std::fs::write(&categories, CATEGORIES).unwrap();
        std::fs::write(&definitions, DEFINITIONS).unwrap();
        std::fs::write(&assignments, ASSIGNMENTS).unwrap();

        let store = ReferenceStore::load(&categories, &definitions, &assignments).unwrap();
        assert_eq!(store.statistics().total_cogs, 4);
    }

    #[test]
    fn test_load_latin1_descriptions() {
        let dir = tempfile::tempdir().unwrap();
        let categories = dir.path().join("fun-20.tab");
        let definitions = dir.path().join("cog-20.def.tab");
        let assignments = dir.path().join("cog-20.cog.csv");
        std::fs::write(&categories, CATEGORIES).unwrap();
        std::fs::write(&definitions, b"COG0003\tP\tAnion \xe9 ATPase\n").unwrap();
        std::fs::write(&assignments, "").unwrap();

        let store = ReferenceStore::load(&categories, &definitions, &assignments).unwrap();
        assert!(store.lookup_by_cog_id("COG0003").is_some());
    }
}

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::types::{CogDefinition, SearchField};

use super::store::ReferenceStore;

/// Inconsistencies between the three reference tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Category codes used by definitions but absent from the categories table
    pub missing_categories: Vec<String>,
    /// COG ids referenced by assignments but absent from the definitions table
    pub orphaned_assignments: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_categories.is_empty() && self.orphaned_assignments.is_empty()
    }
}

/// Searches and cross-checks COG definitions in a store
pub struct CogFinder<'a> {
    store: &'a ReferenceStore,
}

impl<'a> CogFinder<'a> {
    pub fn new(store: &'a ReferenceStore) -> Self {
        Self { store }
    }

    /// Case-insensitive substring search over one field, sorted by COG id
    pub fn search(&self, query: &str, field: SearchField) -> Vec<&'a CogDefinition> {
        let needle = query.to_lowercase();

        let mut matches: Vec<&CogDefinition> = self
            .store
            .definitions()
            .filter(|d| {
                let haystack = match field {
                    SearchField::Description => &d.description,
                    SearchField::Category => &d.category_code,
                    SearchField::CogId => &d.cog_id,
                };
                haystack.to_lowercase().contains(&needle)
            })
            .collect();

        matches.sort_by(|a, b| a.cog_id.cmp(&b.cog_id));
        matches
    }

    /// Cross-check definitions against categories and assignments against definitions
    pub fn validate(&self) -> ConsistencyReport {
        let missing_categories: BTreeSet<&str> = self
            .store
            .definitions()
            .map(|d| d.category_code.as_str())
            .filter(|code| self.store.category(code).is_none())
            .collect();

        let orphaned_assignments: BTreeSet<&str> = self
            .store
            .assignments()
            .map(|(_, cog_id)| cog_id)
            .filter(|cog_id| self.store.lookup_by_cog_id(cog_id).is_none())
            .collect();

        ConsistencyReport {
            missing_categories: missing_categories.into_iter().map(String::from).collect(),
            orphaned_assignments: orphaned_assignments
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// Count how many reference protein ids resolve to a COG
    pub fn resolvable_count<'b>(&self, protein_ids: impl IntoIterator<Item = &'b str>) -> usize {
        protein_ids
            .into_iter()
            .filter(|id| self.store.lookup_by_protein_id(id).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::test_store;

    #[test]
    fn test_search_description() {
        let store = test_store();
        let finder = CogFinder::new(&store);

        let matches = finder.search("RIBOSOMAL", SearchField::Description);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].cog_id, "COG0048");
    }

    #[test]
    fn test_search_cog_id_sorted() {
        let store = test_store();
        let finder = CogFinder::new(&store);

        let ids: Vec<_> = finder
            .search("cog000", SearchField::CogId)
            .into_iter()
            .map(|d| d.cog_id.as_str())
            .collect();
        assert_eq!(ids, vec!["COG0001", "COG0002"]);
    }

    #[test]
    fn test_search_category() {
        let store = test_store();
        let finder = CogFinder::new(&store);
        assert_eq!(finder.search("e", SearchField::Category).len(), 1);
        assert!(finder.search("nothing", SearchField::Description).is_empty());
    }

    #[test]
    fn test_validate() {
        let store = test_store();
        let report = CogFinder::new(&store).validate();

        assert_eq!(report.missing_categories, vec!["Z"]);
        assert_eq!(report.orphaned_assignments, vec!["COG5000"]);
        assert!(!report.is_consistent());
    }

    #[test]
    fn test_resolvable_count() {
        let store = test_store();
        let finder = CogFinder::new(&store);
        let ids = ["NP_214052.1", "P69905", "MISSING", "ORPHAN_1"];
        assert_eq!(finder.resolvable_count(ids), 2);
    }
}

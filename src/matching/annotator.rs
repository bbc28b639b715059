//! Resolution of a query's ranked search hits into one classification.

use tracing::debug;

use crate::catalog::store::ReferenceStore;
use crate::core::hit::{AnnotatedHit, RawHit};
use crate::core::result::ClassificationResult;

/// Annotates search hits against a reference store
pub struct HitAnnotator<'a> {
    store: &'a ReferenceStore,
    include_all_hits: bool,
}

impl<'a> HitAnnotator<'a> {
    /// Create an annotator that keeps every resolved hit
    pub fn new(store: &'a ReferenceStore) -> Self {
        Self {
            store,
            include_all_hits: true,
        }
    }

    /// Set whether resolved hits beyond the best one are kept in the result
    #[must_use]
    pub fn with_all_hits(mut self, include_all_hits: bool) -> Self {
        self.include_all_hits = include_all_hits;
        self
    }

    /// Resolve the hits of one query into its classification.
    ///
    /// Hits whose subject does not resolve to a COG are dropped. The rest are
    /// ordered by ascending e-value; hits with equal e-values keep the order in
    /// which the search tool reported them.
    pub fn annotate(
        &self,
        raw_hits: Vec<RawHit>,
        sequence_id: &str,
        sequence_length: usize,
    ) -> ClassificationResult {
        if raw_hits.is_empty() {
            return ClassificationResult::no_hit(sequence_id, sequence_length);
        }

        let total = raw_hits.len();
        let mut annotated: Vec<AnnotatedHit> = raw_hits
            .into_iter()
            .filter_map(|hit| {
                let resolution = self.store.lookup_by_protein_id(&hit.subject_id)?;
                Some(AnnotatedHit::new(
                    hit,
                    resolution.definition,
                    resolution.resolved_by,
                ))
            })
            .collect();

        debug!(
            "{sequence_id}: {} of {total} hits resolved to a COG",
            annotated.len()
        );

        // sort_by is stable
        annotated.sort_by(|a, b| a.ranking_evalue().total_cmp(&b.ranking_evalue()));

        let best_hit = annotated.first().cloned();
        if !self.include_all_hits {
            annotated.clear();
        }

        ClassificationResult::Hits {
            sequence_id: sequence_id.to_string(),
            length: sequence_length,
            best_hit,
            all_hits: annotated,
        }
    }
}

/// Resolve the hits of one query into its classification
pub fn annotate(
    raw_hits: Vec<RawHit>,
    sequence_id: &str,
    sequence_length: usize,
    include_all_hits: bool,
    store: &ReferenceStore,
) -> ClassificationResult {
    HitAnnotator::new(store)
        .with_all_hits(include_all_hits)
        .annotate(raw_hits, sequence_id, sequence_length)
}

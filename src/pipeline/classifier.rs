use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::config::ClassifierConfig;
use crate::catalog::store::ReferenceStore;
use crate::core::hit::RawHit;
use crate::core::result::ClassificationResult;
use crate::matching::annotator::HitAnnotator;
use crate::parsing::blast::parse_hits;
use crate::parsing::fasta::{write_query, QuerySequence};
use crate::search::{SearchError, SearchTool};

/// Classifies query sequences by searching them and annotating the hits.
///
/// Cloning is cheap: the store and the search tool are shared.
#[derive(Clone)]
pub struct Classifier {
    store: Arc<ReferenceStore>,
    tool: Arc<dyn SearchTool>,
    include_all_hits: bool,
    concurrency: usize,
}

impl Classifier {
    pub fn new(
        store: Arc<ReferenceStore>,
        tool: Arc<dyn SearchTool>,
        config: &ClassifierConfig,
    ) -> Self {
        Self {
            store,
            tool,
            include_all_hits: config.output.include_all_hits,
            concurrency: config.concurrency.max(1),
        }
    }

    /// Classify one sequence. Search failures become an error result.
    pub fn classify_sequence(&self, sequence: &QuerySequence) -> ClassificationResult {
        match self.search(sequence) {
            Ok(hits) => HitAnnotator::new(&self.store)
                .with_all_hits(self.include_all_hits)
                .annotate(hits, &sequence.id, sequence.len()),
            Err(e) => {
                warn!("Search failed for {}: {e}", sequence.id);
                ClassificationResult::error(&sequence.id, sequence.len(), e.to_string())
            }
        }
    }

    fn search(&self, sequence: &QuerySequence) -> Result<Vec<RawHit>, SearchError> {
        let dir = tempfile::tempdir()?;
        let query = dir.path().join("query.fa");
        write_query(&query, sequence)?;

        let output = self.tool.search(&query)?;
        let hits = parse_hits(&output);
        debug!("{}: {} hits from {}", sequence.id, hits.len(), self.tool.name());
        Ok(hits)
    }

    /// Classify a batch, running at most `concurrency` searches at once.
    ///
    /// Results are returned in input order. A failing or timed-out sequence
    /// yields an error result and does not affect the others.
    pub async fn classify_batch(&self, sequences: &[QuerySequence]) -> Vec<ClassificationResult> {
        let total = sequences.len();
        info!(
            "Classifying {total} sequences with {} concurrent searches",
            self.concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (index, sequence) in sequences.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let worker = self.clone();
            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = semaphore.acquire_owned().await.ok();
                let id = sequence.id.clone();
                let length = sequence.len();
                let result = tokio::task::spawn_blocking(move || worker.classify_sequence(&sequence))
                    .await
                    .unwrap_or_else(|e| {
                        error!("Classification of {id} panicked: {e}");
                        ClassificationResult::error(id, length, format!("worker failed: {e}"))
                    });
                (index, result)
            });
        }

        let mut slots: Vec<Option<ClassificationResult>> = vec![None; total];
        let mut done = 0;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    done += 1;
                    debug!("Classified {done}/{total}: {}", result.sequence_id());
                    slots[index] = Some(result);
                }
                Err(e) => error!("Classification task failed: {e}"),
            }
        }

        slots
            .into_iter()
            .zip(sequences)
            .map(|(slot, sequence)| {
                slot.unwrap_or_else(|| {
                    ClassificationResult::error(
                        &sequence.id,
                        sequence.len(),
                        "classification task did not complete",
                    )
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::store::tests::test_store;
    use crate::core::result::Outcome;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers from a fixed table keyed by the query id
    #[derive(Default)]
    struct FakeTool {
        running: AtomicUsize,
        max_running: AtomicUsize,
    }

    fn query_id(query_fasta: &Path) -> String {
        let text = std::fs::read_to_string(query_fasta).unwrap();
        text.lines()
            .next()
            .and_then(|l| l.strip_prefix('>'))
            .unwrap()
            .trim()
            .to_string()
    }

    fn row(query: &str, subject: &str, evalue: &str) -> String {
        format!("{query}\t{subject}\t90.0\t100\t10\t0\t1\t100\t1\t100\t{evalue}\t200\t95\n")
    }

    impl SearchTool for FakeTool {
        fn name(&self) -> &str {
            "fake"
        }

        fn search(&self, query_fasta: &Path) -> Result<String, SearchError> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_running.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            self.running.fetch_sub(1, Ordering::SeqCst);

            let id = query_id(query_fasta);
            match id.as_str() {
                "fails" => Err(SearchError::Failed {
                    program: "fake".to_string(),
                    status: "exit status: 2".to_string(),
                    stderr: "BLAST Database error".to_string(),
                }),
                "slow" => Err(SearchError::TimedOut {
                    program: "fake".to_string(),
                    secs: 1,
                }),
                "nothing" => Ok(String::new()),
                _ => Ok(format!(
                    "# comment\n{}{}",
                    row(&id, "ref|NP_214052.1|", "1e-3"),
                    row(&id, "sp|X|P69905", "1e-40")
                )),
            }
        }
    }

    fn sequences(ids: &[&str]) -> Vec<QuerySequence> {
        ids.iter()
            .map(|id| QuerySequence::new(*id, "MKTAYIAKQRQISFVKSHFSRQ"))
            .collect()
    }

    fn classifier(tool: Arc<FakeTool>, concurrency: usize) -> Classifier {
        let config = ClassifierConfig {
            concurrency,
            ..ClassifierConfig::default()
        };
        Classifier::new(Arc::new(test_store()), tool, &config)
    }

    #[test]
    fn test_classify_sequence() {
        let classifier = classifier(Arc::new(FakeTool::default()), 1);
        let result = classifier.classify_sequence(&sequences(&["q1"])[0]);

        assert_eq!(result.outcome(), Outcome::Classified);
        assert_eq!(result.best_hit().unwrap().cog_id, "COG0048");
        assert_eq!(result.all_hits().len(), 2);
        assert_eq!(result.length(), 22);
    }

    #[test]
    fn test_search_failure_becomes_error_result() {
        let classifier = classifier(Arc::new(FakeTool::default()), 1);
        let result = classifier.classify_sequence(&sequences(&["fails"])[0]);

        assert_eq!(result.outcome(), Outcome::Error);
        assert!(result.error_message().unwrap().contains("BLAST Database error"));
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_and_keeps_order() {
        let classifier = classifier(Arc::new(FakeTool::default()), 3);
        let ids = ["q1", "slow", "nothing", "fails", "q2"];
        let results = classifier.classify_batch(&sequences(&ids)).await;

        let returned: Vec<_> = results.iter().map(ClassificationResult::sequence_id).collect();
        assert_eq!(returned, ids);

        let outcomes: Vec<_> = results.iter().map(ClassificationResult::outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                Outcome::Classified,
                Outcome::Error,
                Outcome::Unclassified,
                Outcome::Error,
                Outcome::Classified,
            ]
        );
        assert!(results[1].error_message().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_batch_respects_concurrency_limit() {
        let tool = Arc::new(FakeTool::default());
        let classifier = classifier(Arc::clone(&tool), 2);
        let ids: Vec<String> = (0..8).map(|i| format!("q{i}")).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();

        let results = classifier.classify_batch(&sequences(&ids)).await;
        assert_eq!(results.len(), 8);
        assert!(tool.max_running.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let classifier = classifier(Arc::new(FakeTool::default()), 4);
        assert!(classifier.classify_batch(&[]).await.is_empty());
    }
}

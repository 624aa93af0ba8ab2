//! Main discovery pipeline activity.
//!
//! Pipeline:
//! 1. Build the dedup registry from the directory and prior discoveries
//! 2. Sample a batch of queries from the corpus
//! 3. One oracle call per query, sequential, 1s pacing between calls
//! 4. Vet each candidate (validate, dedup, categorize)
//! 5. Persist accepted records in fixed-size chunks
//! 6. Backfill cover images for the head of each chunk
//!
//! A single best-effort pass: per-query and per-chunk failures are logged and
//! skipped, never escalated. A crashed run leaves persisted records in place;
//! the next run's registry dedups against them.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domains::category::models::Category;
use crate::domains::discovery::activities::backfill_covers;
use crate::domains::discovery::corpus::{QueryCorpus, QUERY_BATCH_SIZE};
use crate::domains::discovery::models::{DiscoveredService, DiscoveryRun, NewDiscovery};
use crate::domains::discovery::registry::UrlRegistry;
use crate::domains::discovery::vetting::{vet, CategoryIndex};
use crate::domains::service::models::Service;
use crate::kernel::{BaseDiscoveryOracle, ServerDeps};

/// How many records one bulk-create call may carry.
pub const PERSIST_CHUNK_SIZE: usize = 25;

/// Delay after every oracle call, success or failure.
const QUERY_PACING: std::time::Duration = std::time::Duration::from_secs(1);

/// Result summary of one discovery run.
#[derive(Debug, Clone, Serialize)]
pub struct DiscoverySummary {
    pub discovered: usize,
    pub queries_processed: usize,
    pub total_discoveries: usize,
}

/// Run the full discovery pipeline.
pub async fn run_discovery(trigger_type: &str, deps: &ServerDeps) -> Result<DiscoverySummary> {
    let pool = &deps.db_pool;

    let run = DiscoveryRun::create(trigger_type, pool).await?;
    info!(run_id = %run.id, trigger_type, "Starting discovery run");

    // Everything already known, canonical directory and staged discoveries alike
    let mut known_urls = Service::list_website_urls(pool).await?;
    known_urls.extend(DiscoveredService::list_website_urls(pool).await?);
    let mut registry = UrlRegistry::from_urls(&known_urls);

    let categories = Category::find_all(pool).await?;
    let vocabulary = CategoryIndex::new(&categories);

    let now = Utc::now();
    let queries = QueryCorpus::builtin().sample(now, QUERY_BATCH_SIZE);
    info!(
        known_urls = registry.len(),
        queries = queries.len(),
        "Registry built, query batch sampled"
    );

    let (staged, candidates_seen) = collect_candidates(
        &queries,
        now.date_naive(),
        deps.oracle.as_ref(),
        &mut registry,
        &vocabulary,
    )
    .await;

    info!(
        staged = staged.len(),
        candidates_seen,
        "Query loop finished, persisting discoveries"
    );

    // Persist in chunks; a failed chunk is logged and its records are lost
    // for this run, later chunks still go through.
    let mut discovered = 0;
    for (chunk_index, chunk) in staged.chunks(PERSIST_CHUNK_SIZE).enumerate() {
        match DiscoveredService::bulk_create(chunk, pool).await {
            Ok(created) => {
                discovered += created.len();
                backfill_covers(&created, deps).await;
            }
            Err(e) => {
                warn!(
                    chunk_index,
                    records = chunk.len(),
                    error = %e,
                    "Failed to persist discovery chunk"
                );
            }
        }
    }

    let total_discoveries = DiscoveredService::count(pool).await? as usize;

    let run = DiscoveryRun::complete(
        run.id,
        queries.len() as i32,
        candidates_seen as i32,
        discovered as i32,
        pool,
    )
    .await?;

    info!(
        run_id = %run.id,
        discovered,
        queries_processed = queries.len(),
        total_discoveries,
        "Discovery run completed"
    );

    Ok(DiscoverySummary {
        discovered,
        queries_processed: queries.len(),
        total_discoveries,
    })
}

/// The per-query loop: invoke the oracle, vet every candidate, pace between
/// calls.
///
/// Strictly sequential so the oracle's rate limits are respected; one failed
/// query contributes zero candidates and never aborts the loop. Returns the
/// accepted records and the total number of raw candidates seen.
pub(crate) async fn collect_candidates(
    queries: &[String],
    today: NaiveDate,
    oracle: &dyn BaseDiscoveryOracle,
    registry: &mut UrlRegistry,
    vocabulary: &CategoryIndex,
) -> (Vec<NewDiscovery>, usize) {
    let mut staged = Vec::new();
    let mut candidates_seen = 0;

    for query in queries {
        match oracle.discover(query, today).await {
            Ok(candidates) => {
                candidates_seen += candidates.len();
                for candidate in &candidates {
                    match vet(candidate, registry, vocabulary, query) {
                        Ok(record) => staged.push(record),
                        Err(reason) => {
                            debug!(name = %candidate.name, %reason, "Skipped candidate");
                        }
                    }
                }
            }
            Err(e) => {
                warn!(query = %query, error = %e, "Oracle call failed, skipping query");
            }
        }

        tokio::time::sleep(QUERY_PACING).await;
    }

    (staged, candidates_seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockOracle;
    use crate::kernel::ToolCandidate;

    fn candidate(name: &str, website_url: &str) -> ToolCandidate {
        ToolCandidate {
            name: name.to_string(),
            website_url: website_url.to_string(),
            description: String::new(),
            tagline: String::new(),
            features: vec![],
            pricing: None,
            country: None,
            language: None,
        }
    }

    fn queries(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn a_failing_query_does_not_abort_the_loop() {
        let oracle = MockOracle::new()
            .with_candidates("q1", vec![candidate("One", "https://one.ai")])
            .failing_on("q2")
            .with_candidates("q3", vec![candidate("Three", "https://three.ai")]);

        let batch = queries(&["q1", "q2", "q3"]);
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let (staged, seen) = collect_candidates(
            &batch,
            Utc::now().date_naive(),
            &oracle,
            &mut registry,
            &vocabulary,
        )
        .await;

        // All queries were attempted, the failing one yielded nothing
        assert_eq!(oracle.calls(), vec!["q1", "q2", "q3"]);
        assert_eq!(staged.len(), 2);
        assert_eq!(seen, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicates_across_queries_are_staged_once() {
        let oracle = MockOracle::new()
            .with_candidates("q1", vec![candidate("Tool", "https://tool.ai")])
            .with_candidates("q2", vec![candidate("Tool", "http://www.tool.ai/")]);

        let batch = queries(&["q1", "q2"]);
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let (staged, seen) = collect_candidates(
            &batch,
            Utc::now().date_naive(),
            &oracle,
            &mut registry,
            &vocabulary,
        )
        .await;

        assert_eq!(seen, 2);
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].source, "q1");
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_candidates_never_survive_the_loop() {
        let oracle = MockOracle::new().with_candidates(
            "q1",
            vec![
                candidate("", "https://ok.ai"),
                candidate("NoUrl", ""),
                candidate("BadUrl", "not a url"),
            ],
        );

        let batch = queries(&["q1"]);
        let mut registry = UrlRegistry::new();
        let vocabulary = CategoryIndex::default();

        let (staged, seen) = collect_candidates(
            &batch,
            Utc::now().date_naive(),
            &oracle,
            &mut registry,
            &vocabulary,
        )
        .await;

        assert_eq!(seen, 3);
        assert!(staged.is_empty());
    }

    #[test]
    fn persistence_chunks_never_exceed_the_configured_size() {
        let records: Vec<u32> = (0..60).collect();
        let sizes: Vec<usize> = records.chunks(PERSIST_CHUNK_SIZE).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![25, 25, 10]);
    }
}

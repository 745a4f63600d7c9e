//! Indexed search coordinator
//!
//! A `SearchSession` owns the lifecycle of one catalog's text index and
//! reconciles it with live user input: free-text query, chosen category,
//! chosen flat-filter tags and the active pertinence filters. Every input
//! change re-evaluates and eventually publishes a fresh ordered result.
//!
//! # State machine
//!
//! - Unindexed → Indexing on every catalog replacement (the previous index
//!   is discarded synchronously first — two indexes are never alive for one
//!   session). A finished build logs item count and duration and re-runs
//!   the current inputs; a failed build leaves the session degraded with
//!   queries deferred.
//! - Ready + empty query publishes a discovery ordering synchronously:
//!   stable catalog order when a category is chosen, otherwise a listing
//!   shuffled once per catalog version from a stored seed.
//! - Ready + non-empty query runs asynchronously against the index.
//!   Cancellation is a generation check: each input change bumps the
//!   request generation, and a completing task whose captured generation is
//!   stale drops its result silently. Last request wins — never last
//!   response.
//!
//! Ranking itself is synchronous and cheap; only index builds and index
//! queries are offloaded to the worker pool.

use crate::background::{TaskPriority, WorkerPool};
use curator_core::item::{Catalog, CatalogItem};
use curator_core::tags::ChosenCategory;
use curator_filters::compose::filter_search_items;
use curator_filters::pertinence::PertinenceFilter;
use curator_index::memory::{MemoryTextIndex, TextIndex};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Maps an item to its indexable text; supplied by the embedding application
pub type DescribeFn = dyn Fn(&CatalogItem) -> String + Send + Sync;

/// Produces a fresh, empty text index for one catalog version
pub type IndexFactory = dyn Fn() -> Arc<dyn TextIndex> + Send + Sync;

/// Default item description: name plus joined tags
pub fn default_describe(item: &CatalogItem) -> String {
    let mut text = item.name.clone();
    for tag in &item.tags {
        text.push(' ');
        text.push_str(tag);
    }
    text
}

// ============================================================================
// IndexState
// ============================================================================

/// Lifecycle state of the session's text index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexState {
    /// No catalog has been supplied yet
    Unindexed,
    /// A build is in flight for the current catalog
    Indexing,
    /// The index answers queries
    Ready,
    /// The last build failed; queries are deferred until the next catalog
    Failed,
}

// ============================================================================
// SessionConfig
// ============================================================================

/// Tunables for a search session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Worker threads shared by index builds and queries
    pub worker_threads: usize,
    /// Maximum queued background tasks before submissions are rejected
    pub queue_depth: usize,
    /// Fixed discovery-shuffle seed; `None` draws a fresh seed per catalog
    pub discovery_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            worker_threads: 2,
            queue_depth: 1024,
            discovery_seed: None,
        }
    }
}

// ============================================================================
// SessionStats
// ============================================================================

/// Execution statistics for debugging and instrumentation
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStats {
    /// Items in the last successfully built index
    pub indexed_items: usize,
    /// Duration of the last successful index build, in microseconds
    pub last_build_micros: u64,
    /// Duration of the last completed query cycle, in microseconds
    pub last_query_micros: u64,
    /// Candidates the last evaluation considered before filtering
    pub candidates_considered: usize,
}

// ============================================================================
// SearchSession
// ============================================================================

struct SessionState {
    catalog: Arc<Catalog>,
    /// Bumped on every catalog replacement; stale build completions check it
    catalog_generation: u64,
    index: Option<Arc<dyn TextIndex>>,
    index_state: IndexState,
    query: String,
    chosen_category: Option<ChosenCategory>,
    chosen_filter_tags: FxHashSet<String>,
    pertinence_filters: Vec<Arc<dyn PertinenceFilter>>,
    /// Bumped on every input change; stale query completions check it
    request_generation: u64,
    /// Seed drawn once per catalog version
    discovery_seed: u64,
    /// Shuffled full listing, computed lazily once per catalog version
    shuffled: Option<Vec<Arc<CatalogItem>>>,
    results: Option<Vec<Arc<CatalogItem>>>,
    stats: SessionStats,
}

struct SessionShared {
    state: Mutex<SessionState>,
    pool: WorkerPool,
    describe: Box<DescribeFn>,
    index_factory: Box<IndexFactory>,
}

/// Interactive search session over one catalog
///
/// Created when the browsing view opens, fed by its inputs, dropped when the
/// view closes. All methods take `&self`; the session is internally
/// synchronized and shares items with callers through `Arc`.
pub struct SearchSession {
    shared: Arc<SessionShared>,
    config: SessionConfig,
}

impl SearchSession {
    /// Create a session with default config, describe function and index
    pub fn new() -> Self {
        SessionBuilder::new().build()
    }

    /// Start building a customized session
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Replace the catalog wholesale
    ///
    /// The previous index is discarded before the new build is scheduled,
    /// and any in-flight build or query becomes stale immediately.
    pub fn set_catalog(&self, catalog: Catalog) {
        let (build_generation, catalog_arc, index) = {
            let mut state = self.shared.state.lock();
            state.catalog = Arc::new(catalog);
            state.catalog_generation += 1;
            state.request_generation += 1;
            // Dispose the previous index before the new build starts
            state.index = None;
            state.index_state = IndexState::Indexing;
            state.shuffled = None;
            state.results = None;
            state.discovery_seed = self
                .config
                .discovery_seed
                .unwrap_or_else(|| rand::thread_rng().gen());

            let index = (self.shared.index_factory)();
            (state.catalog_generation, Arc::clone(&state.catalog), index)
        };

        let shared = Arc::clone(&self.shared);
        let submitted = self.shared.pool.submit(TaskPriority::Index, move || {
            build_index(&shared, &catalog_arc, index, build_generation);
        });

        if submitted.is_err() {
            warn!("could not schedule index build; session degraded");
            self.shared.state.lock().index_state = IndexState::Failed;
        }
    }

    /// Set the free-text query
    pub fn set_query(&self, query: impl Into<String>) {
        let mut state = self.shared.state.lock();
        state.query = query.into();
        state.request_generation += 1;
        evaluate(&self.shared, &mut state);
    }

    /// Choose a category, or clear it with `None`
    pub fn set_chosen_category(&self, category: Option<ChosenCategory>) {
        let mut state = self.shared.state.lock();
        state.chosen_category = category;
        state.request_generation += 1;
        evaluate(&self.shared, &mut state);
    }

    /// Set the manually chosen flat-filter tags
    pub fn set_chosen_filters(&self, tags: impl IntoIterator<Item = impl Into<String>>) {
        let mut state = self.shared.state.lock();
        state.chosen_filter_tags = tags.into_iter().map(Into::into).collect();
        state.request_generation += 1;
        evaluate(&self.shared, &mut state);
    }

    /// Set the active pertinence filters
    pub fn set_pertinence_filters(&self, filters: Vec<Arc<dyn PertinenceFilter>>) {
        let mut state = self.shared.state.lock();
        state.pertinence_filters = filters;
        state.request_generation += 1;
        evaluate(&self.shared, &mut state);
    }

    // ========================================================================
    // Outputs
    // ========================================================================

    /// The last published ordered result, or `None` while unresolved
    pub fn results(&self) -> Option<Vec<Arc<CatalogItem>>> {
        self.shared.state.lock().results.clone()
    }

    /// Current index lifecycle state
    pub fn index_state(&self) -> IndexState {
        self.shared.state.lock().index_state
    }

    /// Snapshot of execution statistics
    pub fn stats(&self) -> SessionStats {
        self.shared.state.lock().stats
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Block until all scheduled background work has finished
    ///
    /// Intended for hosts that need a settled state (and for tests).
    pub fn wait_idle(&self) {
        self.shared.pool.drain();
    }

    /// Stop the worker pool. Idempotent; also runs on drop.
    pub fn shutdown(&self) {
        self.shared.pool.shutdown();
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        SearchSession::new()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.shared.pool.shutdown();
    }
}

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for [`SearchSession`]
pub struct SessionBuilder {
    config: SessionConfig,
    describe: Box<DescribeFn>,
    index_factory: Box<IndexFactory>,
}

impl SessionBuilder {
    /// Start from defaults
    pub fn new() -> Self {
        SessionBuilder {
            config: SessionConfig::default(),
            describe: Box::new(default_describe),
            index_factory: Box::new(|| Arc::new(MemoryTextIndex::new())),
        }
    }

    /// Set the number of worker threads
    pub fn worker_threads(mut self, threads: usize) -> Self {
        self.config.worker_threads = threads.max(1);
        self
    }

    /// Set the background queue depth
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.config.queue_depth = depth;
        self
    }

    /// Pin the discovery-shuffle seed (deterministic orderings)
    pub fn discovery_seed(mut self, seed: u64) -> Self {
        self.config.discovery_seed = Some(seed);
        self
    }

    /// Replace the item description function used at index-build time
    pub fn describe_with(
        mut self,
        describe: impl Fn(&CatalogItem) -> String + Send + Sync + 'static,
    ) -> Self {
        self.describe = Box::new(describe);
        self
    }

    /// Replace the text index backend
    pub fn index_with(
        mut self,
        factory: impl Fn() -> Arc<dyn TextIndex> + Send + Sync + 'static,
    ) -> Self {
        self.index_factory = Box::new(factory);
        self
    }

    /// Build the session and spawn its workers
    pub fn build(self) -> SearchSession {
        let pool = WorkerPool::new(self.config.worker_threads, self.config.queue_depth);
        SearchSession {
            shared: Arc::new(SessionShared {
                state: Mutex::new(SessionState {
                    catalog: Arc::new(Catalog::new()),
                    catalog_generation: 0,
                    index: None,
                    index_state: IndexState::Unindexed,
                    query: String::new(),
                    chosen_category: None,
                    chosen_filter_tags: FxHashSet::default(),
                    pertinence_filters: Vec::new(),
                    request_generation: 0,
                    discovery_seed: 0,
                    shuffled: None,
                    results: None,
                    stats: SessionStats::default(),
                }),
                pool,
                describe: self.describe,
                index_factory: self.index_factory,
            }),
            config: self.config,
        }
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        SessionBuilder::new()
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Re-derive the published output from the current inputs.
///
/// Called with the state lock held, on every input change and on the
/// Indexing → Ready transition (the engine-internal equivalent of the
/// caller re-triggering a deferred query once the index exists).
fn evaluate(shared: &Arc<SessionShared>, state: &mut SessionState) {
    if state.query.is_empty() {
        publish_discovery(state);
        return;
    }

    let index = match (&state.index, state.index_state) {
        (Some(index), IndexState::Ready) => Arc::clone(index),
        // Deferred: no index to ask yet (or the build failed). Nothing is
        // published and nothing is queued — the Ready transition re-runs us.
        _ => {
            state.results = None;
            return;
        }
    };

    state.results = None;
    let generation = state.request_generation;
    let query = state.query.clone();
    let task_shared = Arc::clone(shared);

    let submitted = shared.pool.submit(TaskPriority::Query, move || {
        run_query(&task_shared, &index, &query, generation);
    });

    if submitted.is_err() {
        warn!("could not schedule query; result stays unresolved");
    }
}

/// Publish the no-query ordering synchronously.
///
/// With a chosen category the stable catalog listing is used; otherwise the
/// per-catalog shuffled listing (computed once from the stored seed).
fn publish_discovery(state: &mut SessionState) {
    let candidates: Vec<Arc<CatalogItem>> = if state.chosen_category.is_some() {
        state.catalog.items().to_vec()
    } else {
        if state.shuffled.is_none() {
            let mut items = state.catalog.items().to_vec();
            let mut rng = StdRng::seed_from_u64(state.discovery_seed);
            items.shuffle(&mut rng);
            state.shuffled = Some(items);
        }
        state.shuffled.clone().unwrap_or_default()
    };

    state.stats.candidates_considered = candidates.len();
    state.results = Some(filter_search_items(
        candidates,
        state.chosen_category.as_ref(),
        &state.chosen_filter_tags,
        &state.pertinence_filters,
    ));
}

/// Background task: index the whole catalog into `index`.
fn build_index(
    shared: &Arc<SessionShared>,
    catalog: &Catalog,
    index: Arc<dyn TextIndex>,
    build_generation: u64,
) {
    let start = Instant::now();
    let mut failure = None;

    for (id, item) in catalog.iter() {
        let text = (shared.describe)(item);
        if let Err(e) = index.index_document(id, &text) {
            failure = Some(e);
            break;
        }
    }

    let mut state = shared.state.lock();
    if state.catalog_generation != build_generation {
        debug!("discarding index build for a replaced catalog");
        return;
    }

    match failure {
        Some(e) => {
            error!(error = %e, "index build failed; queries deferred");
            state.index_state = IndexState::Failed;
        }
        None => {
            let elapsed = start.elapsed().as_micros() as u64;
            info!(
                items = catalog.len(),
                duration_micros = elapsed,
                "text index built"
            );
            state.index = Some(index);
            state.index_state = IndexState::Ready;
            state.stats.indexed_items = catalog.len();
            state.stats.last_build_micros = elapsed;
            // Ready transition: re-run whatever the inputs currently are
            evaluate(shared, &mut state);
        }
    }
}

/// Background task: ask the index, then filter, rank and publish.
fn run_query(
    shared: &Arc<SessionShared>,
    index: &Arc<dyn TextIndex>,
    query: &str,
    generation: u64,
) {
    let start = Instant::now();
    let outcome = index.search(query);

    let mut state = shared.state.lock();
    if state.request_generation != generation {
        debug!(query = %query, "discarding stale search result");
        return;
    }

    match outcome {
        Err(e) => {
            // Aborts this query cycle only; the session stays usable
            warn!(error = %e, "index query failed");
        }
        Ok(ids) => {
            let candidates: Vec<Arc<CatalogItem>> = ids
                .iter()
                // Ids the index returns for items no longer present are dropped
                .filter_map(|id| state.catalog.get(id).cloned())
                .collect();

            state.stats.candidates_considered = candidates.len();
            let ranked = filter_search_items(
                candidates,
                state.chosen_category.as_ref(),
                &state.chosen_filter_tags,
                &state.pertinence_filters,
            );
            state.stats.last_query_micros = start.elapsed().as_micros() as u64;
            state.results = Some(ranked);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use curator_core::error::{Error, Result};
    use curator_core::item::{CatalogItem, ItemId};
    use parking_lot::Condvar;

    fn catalog(specs: &[(&str, &[&str])]) -> Catalog {
        Catalog::from_items(specs.iter().map(|(id, tags)| {
            CatalogItem::new(*id, *id).with_tags(tags.iter().copied())
        }))
    }

    fn result_ids(session: &SearchSession) -> Vec<String> {
        session
            .results()
            .expect("results should be published")
            .iter()
            .map(|item| item.id.to_string())
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let session = SearchSession::new();
        assert_eq!(session.index_state(), IndexState::Unindexed);
        assert!(session.results().is_none());
    }

    #[test]
    fn test_catalog_build_reaches_ready() {
        let session = SearchSession::new();
        session.set_catalog(catalog(&[("a", &["red"]), ("b", &["blue"])]));
        session.wait_idle();

        assert_eq!(session.index_state(), IndexState::Ready);
        assert_eq!(session.stats().indexed_items, 2);
    }

    #[test]
    fn test_empty_catalog_publishes_empty_results() {
        let session = SearchSession::new();
        session.set_catalog(Catalog::new());
        session.set_query("");
        session.wait_idle();

        assert_eq!(session.results().unwrap().len(), 0);
    }

    #[test]
    fn test_discovery_is_a_permutation() {
        let session = SearchSession::new();
        session.set_catalog(catalog(&[("a", &["red", "sprite"]), ("b", &["blue", "sprite"])]));
        session.wait_idle();
        session.set_query("");

        let mut ids = result_ids(&session);
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_discovery_shuffle_is_stable_within_a_catalog() {
        let session = SearchSession::builder().discovery_seed(7).build();
        session.set_catalog(catalog(&[
            ("a", &[]),
            ("b", &[]),
            ("c", &[]),
            ("d", &[]),
            ("e", &[]),
        ]));
        session.wait_idle();

        session.set_query("");
        let first = result_ids(&session);
        session.set_query("");
        let second = result_ids(&session);
        assert_eq!(first, second);
    }

    #[test]
    fn test_fixed_seed_gives_deterministic_shuffle() {
        let ids = |seed: u64| {
            let session = SearchSession::builder().discovery_seed(seed).build();
            session.set_catalog(catalog(&[
                ("a", &[]),
                ("b", &[]),
                ("c", &[]),
                ("d", &[]),
            ]));
            session.wait_idle();
            session.set_query("");
            result_ids(&session)
        };

        assert_eq!(ids(42), ids(42));
    }

    #[test]
    fn test_query_finds_matching_items() {
        let session = SearchSession::new();
        session.set_catalog(catalog(&[("a", &["red", "sprite"]), ("b", &["blue", "sprite"])]));
        session.wait_idle();

        session.set_query("red");
        session.wait_idle();
        assert_eq!(result_ids(&session), vec!["a"]);
    }

    #[test]
    fn test_query_before_catalog_is_deferred_then_served() {
        let session = SearchSession::new();
        session.set_query("red");
        assert!(session.results().is_none());

        session.set_catalog(catalog(&[("a", &["red"]), ("b", &["blue"])]));
        session.wait_idle();

        // The Ready transition re-evaluated the pending query
        assert_eq!(result_ids(&session), vec!["a"]);
    }

    #[test]
    fn test_chosen_filters_survive_queries() {
        let session = SearchSession::new();
        session.set_catalog(catalog(&[
            ("a", &["red", "sprite"]),
            ("b", &["blue", "sprite"]),
        ]));
        session.wait_idle();

        session.set_chosen_filters(["red"]);
        session.set_query("sprite");
        session.wait_idle();
        assert_eq!(result_ids(&session), vec!["a"]);
    }

    #[test]
    fn test_catalog_replacement_drops_vanished_ids() {
        let session = SearchSession::new();
        session.set_catalog(catalog(&[("a", &["red"]), ("b", &["red"])]));
        session.wait_idle();

        session.set_catalog(catalog(&[("b", &["red"])]));
        session.wait_idle();
        session.set_query("red");
        session.wait_idle();

        assert_eq!(result_ids(&session), vec!["b"]);
    }

    // ========================================
    // Cancellation
    // ========================================

    /// Index whose searches block until released, for cancellation tests
    struct GatedIndex {
        inner: MemoryTextIndex,
        gate: Mutex<bool>,
        released: Condvar,
    }

    impl GatedIndex {
        fn new() -> Self {
            GatedIndex {
                inner: MemoryTextIndex::new(),
                gate: Mutex::new(false),
                released: Condvar::new(),
            }
        }

        fn release(&self) {
            *self.gate.lock() = true;
            self.released.notify_all();
        }
    }

    impl TextIndex for GatedIndex {
        fn index_document(&self, id: &ItemId, text: &str) -> Result<()> {
            self.inner.index_document(id, text)
        }

        fn search(&self, query: &str) -> Result<Vec<ItemId>> {
            let mut open = self.gate.lock();
            while !*open {
                self.released.wait(&mut open);
            }
            self.inner.search(query)
        }

        fn total_docs(&self) -> usize {
            self.inner.total_docs()
        }
    }

    #[test]
    fn test_superseded_query_is_never_published() {
        let gated = Arc::new(GatedIndex::new());
        let factory_index = Arc::clone(&gated);
        let session = SearchSession::builder()
            .worker_threads(1)
            .index_with(move || Arc::clone(&factory_index) as Arc<dyn TextIndex>)
            .build();

        session.set_catalog(catalog(&[("cat-item", &["cat"]), ("dog-item", &["dog"])]));
        // The build indexes without blocking; only searches gate
        while session.index_state() != IndexState::Ready {
            std::thread::yield_now();
        }

        // "cat" blocks on the gate; "dog" supersedes it while it hangs
        session.set_query("cat");
        session.set_query("dog");
        gated.release();
        session.wait_idle();

        // Only dog-derived results were ever published
        assert_eq!(result_ids(&session), vec!["dog-item"]);
    }

    // ========================================
    // Degraded states
    // ========================================

    /// Backend whose builds always fail
    struct BrokenIndex;

    impl TextIndex for BrokenIndex {
        fn index_document(&self, _id: &ItemId, _text: &str) -> Result<()> {
            Err(Error::IndexBuild("disk on fire".to_string()))
        }

        fn search(&self, _query: &str) -> Result<Vec<ItemId>> {
            Ok(vec![])
        }

        fn total_docs(&self) -> usize {
            0
        }
    }

    #[test]
    fn test_failed_build_degrades_without_crash() {
        let session = SearchSession::builder()
            .index_with(|| Arc::new(BrokenIndex))
            .build();

        session.set_catalog(catalog(&[("a", &["red"])]));
        session.wait_idle();

        assert_eq!(session.index_state(), IndexState::Failed);

        // Queries defer indefinitely; discovery still works
        session.set_query("red");
        session.wait_idle();
        assert!(session.results().is_none());

        session.set_query("");
        assert_eq!(result_ids(&session), vec!["a"]);
    }

    #[test]
    fn test_replacing_catalog_recovers_from_failure() {
        let broken = Arc::new(Mutex::new(true));
        let flag = Arc::clone(&broken);
        let session = SearchSession::builder()
            .index_with(move || {
                if *flag.lock() {
                    Arc::new(BrokenIndex)
                } else {
                    Arc::new(MemoryTextIndex::new())
                }
            })
            .build();

        session.set_catalog(catalog(&[("a", &["red"])]));
        session.wait_idle();
        assert_eq!(session.index_state(), IndexState::Failed);

        *broken.lock() = false;
        session.set_catalog(catalog(&[("a", &["red"])]));
        session.wait_idle();
        assert_eq!(session.index_state(), IndexState::Ready);

        session.set_query("red");
        session.wait_idle();
        assert_eq!(result_ids(&session), vec!["a"]);
    }

    #[test]
    fn test_custom_describe_feeds_the_index() {
        let session = SearchSession::builder()
            .describe_with(|item: &CatalogItem| format!("{} describable", item.name))
            .build();

        session.set_catalog(catalog(&[("a", &["red"])]));
        session.wait_idle();

        session.set_query("describable");
        session.wait_idle();
        assert_eq!(result_ids(&session), vec!["a"]);

        // Tags are not in the custom description
        session.set_query("red");
        session.wait_idle();
        assert!(session.results().unwrap().is_empty());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let session = SearchSession::new();
        session.set_catalog(catalog(&[("a", &[])]));
        session.wait_idle();
        session.shutdown();
        session.shutdown();
    }
}

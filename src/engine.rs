use std::thread;
use std::time::Instant;

use parking_lot::Mutex;

use crate::catalog::merge_ranked;
use crate::error::SearcherError;
use crate::item::Item;
use crate::matcher::{match_path, trim_query};
use crate::results::{ScanStats, SearchResults};
use crate::store::ItemStore;
use crate::traits::Filter;

// ---------------------------------------------------------------------------
// SearchOptions
// ---------------------------------------------------------------------------

/// Default item count above which scans are partitioned across threads.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 100;

/// Execution parameters for one search.
///
/// Usually set through the builder methods (`.threads()`, `.parallel()`,
/// `.parallel_threshold()`); a [`Session`](crate::Session) keeps one of these
/// for every keystroke it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Worker threads for parallel scans. Defaults to the logical CPU count.
    pub threads: usize,

    /// Static switch for parallel scans. On by default.
    pub parallel: bool,

    /// Stores with more items than this are scanned in parallel.
    pub parallel_threshold: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threads:            num_cpus(),
            parallel:           true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl SearchOptions {
    /// Stores larger than the threshold are partitioned across workers.
    fn is_parallel(&self, len: usize) -> bool {
        self.parallel && self.threads > 0 && len > self.parallel_threshold
    }

    /// # Errors
    ///
    /// [`SearcherError::InvalidThreadCount`] for a zero thread count.
    pub(crate) fn validate(&self) -> Result<(), SearcherError> {
        if self.threads == 0 {
            return Err(SearcherError::InvalidThreadCount(self.threads));
        }
        Ok(())
    }
}

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Running best
// ---------------------------------------------------------------------------

/// The highest-scoring item seen so far by one scan.
#[derive(Default, Clone, Copy)]
struct Best<'a> {
    item:  Option<&'a Item>,
    score: f32,
}

impl<'a> Best<'a> {
    /// Offer a scored item. Returns whichever item does not end up as the
    /// best: the previous best if `score` is strictly higher, else `item`.
    fn offer(&mut self, item: &'a Item, score: f32) -> Option<&'a Item> {
        if score > self.score {
            self.score = score;
            self.item.replace(item)
        } else {
            Some(item)
        }
    }
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Execute one query over `store`.
///
/// All parallelism lives here. Called after the options were validated.
pub(crate) fn run<'a>(
    store: &'a ItemStore,
    query: &str,
    filter: Option<&dyn Filter>,
    config: &SearchOptions,
) -> SearchResults<'a> {
    let start = Instant::now();
    let query = trim_query(query);
    let items = store.items();
    let parallel = config.is_parallel(items.len());

    if items.is_empty() {
        return SearchResults::empty();
    }

    if query.is_empty() {
        let (matched, workers) = match filter {
            None => (items.iter().collect::<Vec<_>>(), 0),
            Some(filter) if parallel => filter_parallel(items, query, filter, config.threads),
            Some(filter) => (filter_serial(items, query, filter), 1),
        };
        log::debug!(
            "store {}: empty query, {} of {} items kept ({} workers)",
            store.id(),
            matched.len(),
            items.len(),
            workers,
        );
        let stats = ScanStats::new(items.len(), matched.len(), workers, start.elapsed());
        return SearchResults {
            items: matched,
            max_score: 0.0,
            stats,
        };
    }

    let mut best = Best::default();
    let mut rest = Vec::new();
    let workers = if parallel {
        scan_parallel(items, query, filter, config.threads, &mut best, &mut rest)
    } else {
        scan_serial(items, query, filter, &mut best, &mut rest);
        1
    };

    // The best item takes the reserved first slot.
    let mut found = Vec::with_capacity(rest.len() + 1);
    found.extend(best.item);
    found.extend(rest);

    let duration = start.elapsed();
    log::debug!(
        "store {}: {:?} matched {} of {} items, max score {:.4} ({} workers, {:?})",
        store.id(),
        query,
        found.len(),
        items.len(),
        best.score,
        workers,
        duration,
    );

    SearchResults {
        stats: ScanStats::new(items.len(), found.len(), workers, duration),
        items: found,
        max_score: best.score,
    }
}

/// Search several stores and merge them with the overall best first.
pub(crate) fn run_all<'a>(
    stores: &[&'a ItemStore],
    query: &str,
    filter: Option<&dyn Filter>,
    config: &SearchOptions,
) -> SearchResults<'a> {
    match stores {
        [] => SearchResults::empty(),
        [store] => run(*store, query, filter, config),
        _ => merge_ranked(
            stores
                .iter()
                .map(|&store| run(store, query, filter, config))
                .collect(),
        ),
    }
}

/// Path match gated by the optional filter.
fn score_item(query: &str, item: &Item, filter: Option<&dyn Filter>) -> Option<f32> {
    let score = match_path(query, &item.path)?;
    match filter {
        Some(f) if !f.accept(query, item) => None,
        _ => Some(score),
    }
}

/// Contiguous slices of `items`, at most `threads` of them.
fn partition(items: &[Item], threads: usize) -> std::slice::Chunks<'_, Item> {
    let per_slice = items.len().div_ceil(threads.max(1)).max(1);
    items.chunks(per_slice)
}

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

/// Scan `items` in order. Whenever a strictly higher score appears, the
/// previous best is demoted into `rest` at that point; every other match is
/// appended in encounter order.
fn scan_serial<'a>(
    items: &'a [Item],
    query: &str,
    filter: Option<&dyn Filter>,
    best: &mut Best<'a>,
    rest: &mut Vec<&'a Item>,
) {
    for item in items {
        if let Some(score) = score_item(query, item, filter) {
            rest.extend(best.offer(item, score));
        }
    }
}

/// Run [`scan_serial`] per slice, then fold the slice bests into `best` in
/// partition order. The tail is sorted by id so the output does not depend
/// on which worker finished first. Returns the number of workers used.
fn scan_parallel<'a>(
    items: &'a [Item],
    query: &str,
    filter: Option<&dyn Filter>,
    threads: usize,
    best: &mut Best<'a>,
    rest: &mut Vec<&'a Item>,
) -> usize {
    let queue = Mutex::new(Vec::<&'a Item>::new());

    let locals: Vec<Best<'a>> = thread::scope(|s| {
        let handles: Vec<_> = partition(items, threads)
            .enumerate()
            .map(|(slice, chunk)| {
                let queue = &queue;
                s.spawn(move || {
                    let mut local_best = Best::default();
                    let mut local_rest = Vec::new();
                    scan_serial(chunk, query, filter, &mut local_best, &mut local_rest);
                    log::trace!(
                        "slice {}: {} items, {} matches",
                        slice,
                        chunk.len(),
                        local_rest.len() + usize::from(local_best.item.is_some()),
                    );
                    queue.lock().extend(local_rest);
                    local_best
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let workers = locals.len();
    let mut queue = queue.into_inner();
    for local in locals {
        if let Some(item) = local.item {
            queue.extend(best.offer(item, local.score));
        }
    }

    queue.sort_unstable_by_key(|item| item.id());
    rest.extend(queue);
    workers
}

// ---------------------------------------------------------------------------
// Filters (empty query)
// ---------------------------------------------------------------------------

fn filter_serial<'a>(items: &'a [Item], query: &str, filter: &dyn Filter) -> Vec<&'a Item> {
    items.iter().filter(|item| filter.accept(query, item)).collect()
}

/// Filter each slice concurrently; slices are concatenated in partition
/// order, each keeping its own store order.
fn filter_parallel<'a>(
    items: &'a [Item],
    query: &str,
    filter: &dyn Filter,
    threads: usize,
) -> (Vec<&'a Item>, usize) {
    let slices: Vec<Vec<&'a Item>> = thread::scope(|s| {
        let handles: Vec<_> = partition(items, threads)
            .map(|chunk| s.spawn(move || filter_serial(chunk, query, filter)))
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    let workers = slices.len();
    (slices.into_iter().flatten().collect(), workers)
}

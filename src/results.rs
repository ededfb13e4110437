use std::time::Duration;

use crate::item::Item;

/// The output of a completed search.
///
/// `items[0]` is the highest-scoring match whenever the query was non-empty
/// and anything matched. The rest are **not** sorted by score: a serial scan
/// leaves them in discovery order, a parallel scan sorts them by id.
#[derive(Debug, Clone)]
pub struct SearchResults<'a> {
    /// Matched items, best first.
    pub items: Vec<&'a Item>,

    /// Score of `items[0]`, or `0.0` for an empty query or no match.
    /// Only meaningful relative to other scores of the same query.
    pub max_score: f32,

    /// Scan performance statistics.
    pub stats: ScanStats,
}

impl<'a> SearchResults<'a> {
    pub(crate) fn empty() -> Self {
        Self {
            items:     Vec::new(),
            max_score: 0.0,
            stats:     ScanStats::default(),
        }
    }

    /// The top-ranked item, if any matched.
    pub fn best(&self) -> Option<&'a Item> {
        self.items.first().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Performance statistics for a completed search.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Items examined.
    pub scanned: usize,

    /// Items that matched.
    pub matched: usize,

    /// Worker threads used. `1` for a serial scan, `0` when nothing was scanned.
    pub workers: usize,

    /// Wall-clock time from search start to completion.
    pub duration: Duration,
}

impl ScanStats {
    pub(crate) fn new(scanned: usize, matched: usize, workers: usize, duration: Duration) -> Self {
        Self {
            scanned,
            matched,
            workers,
            duration,
        }
    }

    /// Items scanned per second, clamped to 0 on zero-duration runs.
    pub fn items_per_sec(&self) -> usize {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            (self.scanned as f64 / secs) as usize
        } else {
            0
        }
    }

    /// Fold another store's statistics into this one.
    pub(crate) fn absorb(&mut self, other: &ScanStats) {
        self.scanned += other.scanned;
        self.matched += other.matched;
        self.workers = self.workers.max(other.workers);
        self.duration += other.duration;
    }
}

use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::engine::{run_all, SearchOptions};
use crate::error::SearcherError;
use crate::results::SearchResults;
use crate::store::ItemStore;
use crate::traits::Filter;

// ---------------------------------------------------------------------------
// SearchBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a treeseek search.
///
/// Created via [`treeseek::search()`](crate::search). Configure with chained
/// builder methods, then call [`run()`](SearchBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let results = treeseek::search()
///     .store(&store)
///     .query("win lay")
///     .filter(|_q: &str, item: &Item| item.field("kind") == Some("layout"))
///     .threads(8)
///     .run()?;
/// ```
pub struct SearchBuilder<'a> {
    stores:  Vec<&'a ItemStore>,
    query:   String,
    filter:  Option<Box<dyn Filter + 'a>>,
    options: SearchOptions,
}

impl Default for SearchBuilder<'_> {
    fn default() -> Self {
        Self {
            stores:  Vec::new(),
            query:   String::new(),
            filter:  None,
            options: SearchOptions::default(),
        }
    }
}

impl<'a> SearchBuilder<'a> {
    // ── Stores ────────────────────────────────────────────────────────────

    /// Add a store to search. May be called more than once; results of
    /// several stores are merged with the overall best first.
    ///
    /// Every store must carry its own id ([`ItemStore::with_id`], or a
    /// [`Catalog`]); `run()` rejects two stores sharing one.
    pub fn store(mut self, store: &'a ItemStore) -> Self {
        self.stores.push(store);
        self
    }

    /// Search every store of a catalog.
    pub fn catalog(mut self, catalog: &'a Catalog) -> Self {
        self.stores.extend(catalog.stores());
        self
    }

    // ── Query & filter ────────────────────────────────────────────────────

    /// The query text. Leading and trailing spaces and tabs are ignored.
    /// An empty query returns every item (subject to the filter).
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set a filter predicate combined with path matching.
    ///
    /// Any type implementing [`Filter`] is accepted, including closures of
    /// the shape `Fn(&str, &Item) -> bool`.
    pub fn filter(mut self, f: impl Filter + 'a) -> Self {
        self.filter = Some(Box::new(f));
        self
    }

    /// Set an already boxed filter, or clear it with `None`.
    pub fn with_filter(mut self, f: Option<Box<dyn Filter + 'a>>) -> Self {
        self.filter = f;
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Number of worker threads for parallel scans.
    ///
    /// Defaults to the number of logical CPU cores. Workers are spawned per
    /// call and joined before `run()` returns.
    pub fn threads(mut self, n: usize) -> Self {
        self.options.threads = n;
        self
    }

    /// Enable or disable parallel scans altogether. Enabled by default.
    pub fn parallel(mut self, yes: bool) -> Self {
        self.options.parallel = yes;
        self
    }

    /// Stores with more items than this are scanned in parallel.
    /// Defaults to [`DEFAULT_PARALLEL_THRESHOLD`](crate::DEFAULT_PARALLEL_THRESHOLD).
    pub fn parallel_threshold(mut self, n: usize) -> Self {
        self.options.parallel_threshold = n;
        self
    }

    /// Replace all execution options at once.
    pub fn options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the search and return results.
    ///
    /// Blocks until every worker has finished. The call holds no state
    /// between invocations; a caller that issues a newer query simply
    /// discards older results.
    ///
    /// # Errors
    ///
    /// [`SearcherError::NoStore`] if no store was added,
    /// [`SearcherError::DuplicateStore`] if two stores share an id,
    /// [`SearcherError::InvalidThreadCount`] for a zero thread count.
    pub fn run(self) -> Result<SearchResults<'a>, SearcherError> {
        if self.stores.is_empty() {
            return Err(SearcherError::NoStore);
        }
        let mut seen = HashSet::with_capacity(self.stores.len());
        if let Some(store) = self.stores.iter().find(|store| !seen.insert(store.id())) {
            return Err(SearcherError::DuplicateStore(store.id()));
        }
        self.options.validate()?;

        Ok(run_all(
            &self.stores,
            &self.query,
            self.filter.as_deref(),
            &self.options,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::SearchItem;

    #[test]
    fn stores_with_same_id_are_rejected() {
        let edit = ItemStore::build(vec![SearchItem::new("Edit")]);
        let editor = ItemStore::build(vec![SearchItem::new("Editor")]);

        let err = SearchBuilder::default()
            .store(&edit)
            .store(&editor)
            .query("edit")
            .run()
            .unwrap_err();
        assert_eq!(err, SearcherError::DuplicateStore(0));
        assert!(err.is_validation());
    }

    #[test]
    fn stores_with_distinct_ids_merge() {
        let edit = ItemStore::with_id(0, vec![SearchItem::new("Edit")]);
        let editor = ItemStore::with_id(1, vec![SearchItem::new("Editor")]);

        let results = SearchBuilder::default()
            .store(&edit)
            .store(&editor)
            .query("edit")
            .run()
            .unwrap();
        let keys: Vec<_> = results.items.iter().map(|i| i.key()).collect();
        assert_eq!(keys.len(), 2);
        assert_ne!(keys[0], keys[1]);
        assert_eq!(results.best().unwrap().name(), "Edit");
    }

    #[test]
    fn missing_store_is_an_error() {
        let err = SearchBuilder::default().query("x").run().unwrap_err();
        assert_eq!(err, SearcherError::NoStore);
    }
}

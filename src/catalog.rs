use crate::error::SearcherError;
use crate::item::{Item, ItemKey, SearchItem, StoreId};
use crate::results::SearchResults;
use crate::store::{Hierarchy, ItemStore};

/// Several [`ItemStore`]s searched as one ranked view.
///
/// Store ids are assigned in insertion order, so the default visible order
/// `(store, id)` lists the first store's items before the second's.
///
/// # Example
///
/// ```rust
/// use treeseek::{Catalog, SearchItem};
///
/// let mut catalog = Catalog::new();
/// catalog.add_store(vec![SearchItem::new("Edit")]);
/// catalog.add_store(vec![SearchItem::new("Editor Settings")]);
///
/// let results = treeseek::search()
///     .catalog(&catalog)
///     .query("edit")
///     .run()
///     .unwrap();
///
/// assert_eq!(results.items.len(), 2);
/// assert_eq!(results.best().unwrap().name(), "Edit");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    stores: Vec<ItemStore>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tree set as its own store and return the store's id.
    pub fn add_store(&mut self, roots: Vec<SearchItem>) -> StoreId {
        let id = self.stores.len();
        self.stores.push(ItemStore::with_id(id, roots));
        id
    }

    pub fn stores(&self) -> &[ItemStore] {
        &self.stores
    }

    /// # Errors
    ///
    /// [`SearcherError::UnknownStore`] for an id this catalog never assigned.
    pub fn store(&self, id: StoreId) -> Result<&ItemStore, SearcherError> {
        self.stores.get(id).ok_or(SearcherError::UnknownStore(id))
    }

    /// Total number of items across all stores.
    pub fn item_count(&self) -> usize {
        self.stores.iter().map(ItemStore::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

impl Hierarchy for Catalog {
    fn item(&self, key: ItemKey) -> Result<&Item, SearcherError> {
        self.store(key.store)?.get(key.id)
    }
}

/// Merge per-store results into one list, keeping the overall best first.
///
/// Stores are folded in order. When a store's max score beats the running
/// max, the previous leader moves to the end, that store's best takes the
/// first slot and the rest of its results are appended. Otherwise its
/// results are appended as they are.
pub(crate) fn merge_ranked<'a>(per_store: Vec<SearchResults<'a>>) -> SearchResults<'a> {
    let mut merged = SearchResults::empty();

    for results in per_store {
        merged.stats.absorb(&results.stats);

        if results.max_score > merged.max_score {
            let mut incoming = results.items.into_iter();
            if merged.items.is_empty() {
                merged.items.extend(incoming);
            } else if let Some(best) = incoming.next() {
                let previous = std::mem::replace(&mut merged.items[0], best);
                merged.items.push(previous);
                merged.items.extend(incoming);
            }
            merged.max_score = results.max_score;
        } else {
            merged.items.extend(results.items);
        }
    }

    merged.stats.matched = merged.items.len();
    merged
}

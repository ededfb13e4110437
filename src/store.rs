//! Registration of item trees into id-indexed stores.

use crate::error::SearcherError;
use crate::item::{Item, ItemId, ItemKey, SearchItem, StoreId};

/// Read access to registered items by key.
///
/// Implemented by [`ItemStore`] (one tree set) and [`Catalog`](crate::Catalog)
/// (several stores merged). The visible-result builder only needs this, so it
/// works the same over either.
pub trait Hierarchy {
    /// Resolve a key to its item.
    ///
    /// # Errors
    ///
    /// A lookup error when the store or id does not exist.
    fn item(&self, key: ItemKey) -> Result<&Item, SearcherError>;

    /// The parent of `item`, or `None` for a root.
    fn parent_of(&self, item: &Item) -> Result<Option<&Item>, SearcherError> {
        item.parent_key().map(|key| self.item(key)).transpose()
    }

    /// Every descendant of `key` in pre-order, excluding `key` itself.
    fn descendants(&self, key: ItemKey) -> Result<Vec<ItemKey>, SearcherError> {
        let mut out = Vec::new();
        let mut stack: Vec<ItemKey> = self.item(key)?.child_keys().collect();
        stack.reverse();
        while let Some(next) = stack.pop() {
            out.push(next);
            let item = self.item(next)?;
            let start = stack.len();
            stack.extend(item.child_keys());
            stack[start..].reverse();
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// ItemStore
// ---------------------------------------------------------------------------

/// Flattened, id-indexed view of one or more item trees.
///
/// Built once; ids are assigned in depth-first pre-order across the roots in
/// input order, so `items()[id].id() == id` always holds.
///
/// # Example
///
/// ```rust
/// use treeseek::{ItemStore, SearchItem};
///
/// let root = SearchItem::new("Window").children_from([
///     SearchItem::new("Layouts").children_from([SearchItem::new("Default")]),
/// ]);
/// let store = ItemStore::build(vec![root, SearchItem::new("Edit")]);
///
/// assert_eq!(store.len(), 4);
/// assert_eq!(store.get(2).unwrap().path(), "Window Layouts Default");
/// assert_eq!(store.get(3).unwrap().path(), "Edit");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    id:    StoreId,
    items: Vec<Item>,
}

impl ItemStore {
    /// Build a store with id `0`.
    pub fn build(roots: Vec<SearchItem>) -> Self {
        Self::with_id(0, roots)
    }

    /// Build a store with an explicit id. Catalogs use this to keep ids
    /// unique across the stores they merge.
    pub fn with_id(id: StoreId, roots: Vec<SearchItem>) -> Self {
        let mut store = Self {
            id,
            items: Vec::new(),
        };
        for root in roots {
            store.register(root, None);
        }
        log::debug!("store {}: registered {} items", id, store.items.len());
        store
    }

    fn register(&mut self, node: SearchItem, parent: Option<ItemId>) -> ItemId {
        let id = self.items.len();
        let SearchItem {
            name,
            fields,
            children,
        } = node;

        let (path, depth) = match parent {
            Some(p) => {
                let parent = &self.items[p];
                (format!("{} {}", parent.path, name), parent.depth + 1)
            }
            None => (name.clone(), 0),
        };

        self.items.push(Item {
            key: ItemKey {
                store: self.id,
                id,
            },
            name,
            path,
            depth,
            parent,
            children: Vec::with_capacity(children.len()),
            fields,
        });

        for child in children {
            let child_id = self.register(child, Some(id));
            self.items[id].children.push(child_id);
        }
        id
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All items in id order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Items without a parent, in input order.
    pub fn roots(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_root())
    }

    /// O(1) id lookup.
    ///
    /// # Errors
    ///
    /// [`SearcherError::ItemOutOfRange`] when `id >= len()`.
    pub fn get(&self, id: ItemId) -> Result<&Item, SearcherError> {
        self.items.get(id).ok_or(SearcherError::ItemOutOfRange {
            store: self.id,
            id,
            len: self.items.len(),
        })
    }

    pub fn parent<'a>(&'a self, item: &Item) -> Option<&'a Item> {
        item.parent.and_then(|p| self.items.get(p))
    }

    /// Direct children of `item`, in insertion order.
    pub fn children<'a>(&'a self, item: &'a Item) -> impl Iterator<Item = &'a Item> + 'a {
        item.children.iter().filter_map(move |&c| self.items.get(c))
    }

    /// Ancestors of `item`, nearest first.
    pub fn ancestors<'a>(&'a self, item: &'a Item) -> impl Iterator<Item = &'a Item> + 'a {
        std::iter::successors(item.parent.map(|p| &self.items[p]), move |cur| {
            cur.parent.map(|p| &self.items[p])
        })
    }
}

impl Hierarchy for ItemStore {
    fn item(&self, key: ItemKey) -> Result<&Item, SearcherError> {
        if key.store != self.id {
            return Err(SearcherError::UnknownStore(key.store));
        }
        self.get(key.id)
    }
}

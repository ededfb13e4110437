//! Input tree nodes and their registered, immutable form.

use crate::error::SearcherError;

/// Index of an item inside its [`ItemStore`](crate::ItemStore). Dense, `0..len`, pre-order.
pub type ItemId = usize;

/// Identity of an [`ItemStore`](crate::ItemStore) within a [`Catalog`](crate::Catalog).
pub type StoreId = usize;

/// Built-in field holding the item's display name.
pub const NAME_FIELD: &str = "name";

/// Built-in field holding the item's help text.
pub const HELP_FIELD: &str = "help";

/// A named attribute attached to an item. Names are unique per item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name:  String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name:  name.into(),
            value: value.into(),
        }
    }
}

/// Globally unique handle of a registered item: its store plus its id there.
///
/// Ordering is `(store, id)`, which is also the default display order of
/// visible results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub store: StoreId,
    pub id:    ItemId,
}

// ---------------------------------------------------------------------------
// SearchItem
// ---------------------------------------------------------------------------

/// A node of the input tree, before it is registered into a store.
///
/// `SearchItem` owns its children. Fields and children can only be added
/// here; [`ItemStore::build`](crate::ItemStore::build) consumes the tree and
/// produces immutable [`Item`]s, so nothing can be changed after registration.
///
/// # Example
///
/// ```rust
/// use treeseek::SearchItem;
///
/// let mut window = SearchItem::new("Window");
/// let mut layouts = SearchItem::new("Layouts");
/// layouts.add_child(SearchItem::new("Default"));
/// layouts.add_child(SearchItem::with_help("Save", "Save the current layout"));
/// window.add_child(layouts);
///
/// assert_eq!(window.children().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SearchItem {
    pub(crate) name:     String,
    pub(crate) fields:   Vec<Field>,
    pub(crate) children: Vec<SearchItem>,
}

impl SearchItem {
    /// Create an item with an empty help text.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_help(name, "")
    }

    /// Create an item with a help text. Both land in the built-in
    /// `name` and `help` fields.
    pub fn with_help(name: impl Into<String>, help: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            fields: vec![
                Field::new(NAME_FIELD, name.clone()),
                Field::new(HELP_FIELD, help),
            ],
            name,
            children: Vec::new(),
        }
    }

    /// Builder-style [`add_child`](Self::add_child) for literal trees.
    pub fn children_from(mut self, children: impl IntoIterator<Item = SearchItem>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn children(&self) -> &[SearchItem] {
        &self.children
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Append a child. Insertion order is the sibling order.
    pub fn add_child(&mut self, child: SearchItem) {
        self.children.push(child);
    }

    /// Attach a named attribute.
    ///
    /// # Errors
    ///
    /// [`SearcherError::DuplicateField`] if a field with this name already exists
    /// (including the built-in `name` and `help` fields).
    pub fn add_field(&mut self, field: Field) -> Result<(), SearcherError> {
        if self.fields.iter().any(|f| f.name == field.name) {
            return Err(SearcherError::DuplicateField {
                item:  self.name.clone(),
                field: field.name,
            });
        }
        self.fields.push(field);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A registered, immutable node. Produced only by store construction.
#[derive(Debug, Clone)]
pub struct Item {
    pub(crate) key:      ItemKey,
    pub(crate) name:     String,
    pub(crate) path:     String,
    pub(crate) depth:    usize,
    pub(crate) parent:   Option<ItemId>,
    pub(crate) children: Vec<ItemId>,
    pub(crate) fields:   Vec<Field>,
}

impl Item {
    pub fn id(&self) -> ItemId {
        self.key.id
    }

    /// Id of the store that registered this item.
    pub fn store_id(&self) -> StoreId {
        self.key.store
    }

    pub fn key(&self) -> ItemKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Space-joined names of the ancestor chain, root first, ending with this item.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `0` for a root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn help(&self) -> &str {
        self.field(HELP_FIELD).unwrap_or_default()
    }

    pub fn parent_key(&self) -> Option<ItemKey> {
        self.parent.map(|id| ItemKey {
            store: self.key.store,
            id,
        })
    }

    /// Children keys in insertion order.
    pub fn child_keys(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.children.iter().map(move |&id| ItemKey {
            store: self.key.store,
            id,
        })
    }

    pub fn children_ids(&self) -> &[ItemId] {
        &self.children
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "id: {}, name: {}, depth: {}", self.key.id, self.name, self.depth)
    }
}

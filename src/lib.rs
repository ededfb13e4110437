//! # treeseek
//!
//! Search-as-you-type ranking over hierarchical item collections.
//!
//! treeseek matches short queries against the space-joined path of every
//! node in a tree (menu paths, file paths, named entries), ranks them with a
//! deterministic prefix score, and turns the flat result list into the
//! ancestor-complete list a tree view should render. It owns the item store,
//! the matcher, the parallel scan and the visible-result reconciliation.
//! Drawing, key handling and persistence belong to the caller.
//!
//! # Quick Start
//!
//! ```rust
//! use treeseek::{ItemStore, SearchItem};
//!
//! let store = ItemStore::build(vec![
//!     SearchItem::new("Window").children_from([
//!         SearchItem::new("Layouts").children_from([
//!             SearchItem::new("Default"),
//!             SearchItem::new("Save"),
//!         ]),
//!     ]),
//!     SearchItem::new("Edit").children_from([SearchItem::new("Preferences")]),
//! ]);
//!
//! let results = treeseek::search()
//!     .store(&store)
//!     .query("win lay")
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(results.best().unwrap().path(), "Window Layouts");
//! assert_eq!(results.items.len(), 3);
//! println!("max score {:.3} in {:?}", results.max_score, results.stats.duration);
//! ```
//!
//! # Filters
//!
//! Implement [`Filter`] (or pass a closure) to gate matches on anything
//! besides the path:
//!
//! ```rust
//! use treeseek::{Field, Item, ItemStore, SearchItem};
//!
//! let mut png = SearchItem::new("Icon");
//! png.add_field(Field::new("kind", "texture")).unwrap();
//! let store = ItemStore::build(vec![png, SearchItem::new("Icons Folder")]);
//!
//! let results = treeseek::search()
//!     .store(&store)
//!     .query("icon")
//!     .filter(|_q: &str, item: &Item| item.field("kind") == Some("texture"))
//!     .run()
//!     .unwrap();
//!
//! assert_eq!(results.items.len(), 1);
//! ```
//!
//! # Tree views
//!
//! [`TreeView`] (or [`Session`], which also runs the search) keeps the
//! visible list, expansion state and selection between keystrokes.

#![forbid(unsafe_code)]

mod builder;
mod catalog;
mod engine;
mod error;
mod highlight;
mod item;
mod matcher;
mod provider;
mod results;
mod session;
mod store;
mod suggest;
mod traits;
mod visible;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::SearchBuilder;
pub use catalog::Catalog;
pub use engine::{SearchOptions, DEFAULT_PARALLEL_THRESHOLD};
pub use error::SearcherError;
pub use highlight::{highlight, Segment};
pub use item::{Field, Item, ItemId, ItemKey, SearchItem, StoreId, HELP_FIELD, NAME_FIELD};
pub use matcher::{match_path, parts, starts_with_ignore_ascii_case, trim_query};
pub use provider::{Provider, ProviderFilter, ProviderRegistry, CATEGORY_FIELD};
pub use results::{ScanStats, SearchResults};
pub use session::Session;
pub use store::{Hierarchy, ItemStore};
pub use suggest::{apply_suggestion, completion_hint, suggest};
pub use traits::Filter;
pub use visible::{
    collapse, collapse_to_roots, compute_visible, default_order, expand, hide_unexpanded,
    regenerate, Collapsed, Comparator, ExpanderState, ExpansionState, TreeView,
};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`SearchBuilder`] to configure and run a search.
///
/// # Example
///
/// ```rust
/// use treeseek::{ItemStore, SearchItem};
///
/// let store = ItemStore::build(vec![
///     SearchItem::new("Window Layouts Default"),
///     SearchItem::new("Window Layouts Save"),
///     SearchItem::new("Edit Preferences"),
/// ]);
///
/// let results = treeseek::search()
///     .store(&store)
///     .query("win lay")
///     .run()
///     .unwrap();
///
/// assert_eq!(results.items.len(), 2);
/// assert!(results.max_score > 0.0);
/// ```
pub fn search<'a>() -> SearchBuilder<'a> {
    SearchBuilder::default()
}

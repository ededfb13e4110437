//! A search-as-you-type picker session over a catalog.

use std::cmp::Ordering;

use crate::catalog::Catalog;
use crate::engine::{run_all, SearchOptions};
use crate::error::SearcherError;
use crate::item::{Item, ItemKey};
use crate::matcher::trim_query;
use crate::store::{Hierarchy, ItemStore};
use crate::suggest::{apply_suggestion, completion_hint, suggest};
use crate::traits::Filter;
use crate::visible::{ExpanderState, TreeView};

/// One "search as you type" picker over a catalog.
///
/// Every [`set_query`](Session::set_query) runs a fresh search, rebuilds the
/// visible tree and recomputes the completion for the word at the cursor.
/// Each call fully replaces the previous results, so only the latest query
/// is ever reflected.
///
/// # Example
///
/// ```rust
/// use treeseek::{Catalog, SearchItem, Session};
///
/// let mut catalog = Catalog::new();
/// catalog.add_store(vec![
///     SearchItem::new("Window").children_from([
///         SearchItem::new("Layouts").children_from([
///             SearchItem::new("Default"),
///             SearchItem::new("Save"),
///         ]),
///     ]),
///     SearchItem::new("Edit").children_from([SearchItem::new("Preferences")]),
/// ]);
///
/// let mut session = Session::new(&catalog);
/// session.set_query("win lay", 7).unwrap();
///
/// assert_eq!(session.suggestion(), Some("layouts"));
/// let names: Vec<_> = session.visible_items().unwrap().iter().map(|i| i.name()).collect();
/// assert_eq!(names, vec!["Window", "Layouts", "Default", "Save"]);
/// ```
pub struct Session<'a> {
    catalog:    &'a Catalog,
    options:    SearchOptions,
    filter:     Option<Box<dyn Filter + 'a>>,
    view:       TreeView<'a, Catalog>,
    max_score:  f32,
    suggestion: Option<String>,
}

impl<'a> Session<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            options:    SearchOptions::default(),
            filter:     None,
            view:       TreeView::new(catalog),
            max_score:  0.0,
            suggestion: None,
        }
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    /// Gate every search on `filter` in addition to path matching.
    pub fn with_filter(mut self, filter: impl Filter + 'a) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Replace the default `(store, id)` order of visible items.
    pub fn with_comparator(
        mut self,
        cmp: impl Fn(&Item, &Item) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.view = self.view.with_comparator(cmp);
        self
    }

    /// Run `text` as the new query. `cursor` is the byte offset of the text
    /// caret, used for the completion.
    ///
    /// # Errors
    ///
    /// [`SearcherError::InvalidThreadCount`] for bad options, or a lookup
    /// error if the catalog and results disagree.
    pub fn set_query(&mut self, text: &str, cursor: usize) -> Result<(), SearcherError> {
        self.options.validate()?;

        let catalog: &'a Catalog = self.catalog;
        let stores: Vec<&'a ItemStore> = catalog.stores().iter().collect();
        let results = run_all(&stores, text, self.filter.as_deref(), &self.options);

        self.view.refresh(text, &results.items)?;
        self.max_score = results.max_score;

        self.suggestion = match results.best() {
            Some(best) if !trim_query(text).is_empty() => suggest(text, cursor, best.name()),
            _ => None,
        };

        log::trace!(
            "session: {:?} -> {} results, {} visible",
            text,
            results.len(),
            self.view.visible().len(),
        );
        Ok(())
    }

    pub fn query(&self) -> &str {
        self.view.query()
    }

    /// Score of the top result of the last query.
    pub fn max_score(&self) -> f32 {
        self.max_score
    }

    /// Keys of the last results, best first.
    pub fn results(&self) -> &[ItemKey] {
        self.view.results()
    }

    pub fn view(&self) -> &TreeView<'a, Catalog> {
        &self.view
    }

    pub fn visible_items(&self) -> Result<Vec<&'a Item>, SearcherError> {
        self.view.visible_items()
    }

    /// Completion for the word at the cursor, if the top result offers one.
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }

    /// The query with the word at `cursor` completed, for display behind
    /// the text field.
    pub fn completion_hint(&self, cursor: usize) -> Option<String> {
        let suggestion = self.suggestion.as_deref()?;
        completion_hint(self.query(), cursor, suggestion)
    }

    /// Replace the last word of the query with the suggestion and search
    /// again. Returns the new query text, or `None` if nothing was suggested.
    pub fn accept_suggestion(&mut self) -> Result<Option<String>, SearcherError> {
        let Some(suggestion) = self.suggestion.take() else {
            return Ok(None);
        };
        let text = apply_suggestion(self.query(), &suggestion);
        self.set_query(&text, text.len())?;
        self.suggestion = None;
        Ok(Some(text))
    }

    pub fn expand(&mut self, key: ItemKey) -> Result<(), SearcherError> {
        self.view.expand(key)
    }

    /// Collapse `key`; see [`TreeView::collapse`].
    pub fn collapse(&mut self, key: ItemKey) -> Result<Option<ItemKey>, SearcherError> {
        self.view.collapse(key)
    }

    pub fn toggle(&mut self, key: ItemKey) -> Result<(), SearcherError> {
        self.view.toggle(key)
    }

    pub fn expander_state(&self, key: ItemKey) -> Result<ExpanderState, SearcherError> {
        self.view.expander_state(key)
    }

    pub fn select_index(&mut self, index: usize) {
        self.view.select_index(index);
    }

    /// The item the picker would return if the user confirmed now.
    pub fn selected_item(&self) -> Result<Option<&'a Item>, SearcherError> {
        let catalog: &'a Catalog = self.catalog;
        self.view
            .selected()
            .map(|key| catalog.item(key))
            .transpose()
    }
}

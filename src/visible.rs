//! Visible-result reconciliation.
//!
//! A search returns a flat list of matches. A tree view needs more: every
//! ancestor of a match (so it can be reached), the subtree under a matched
//! branch, and nothing below a collapsed branch. The functions here compute
//! that list; [`TreeView`] keeps the state between keystrokes.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::SearcherError;
use crate::item::{Item, ItemKey};
use crate::matcher::trim_query;
use crate::store::Hierarchy;

/// Ordering applied to visible results.
pub type Comparator = dyn Fn(&Item, &Item) -> Ordering + Send + Sync;

/// Default visible order: by owning store, then by id. Because ids are
/// pre-order, this lists each parent directly above its subtree.
pub fn default_order(a: &Item, b: &Item) -> Ordering {
    a.key().cmp(&b.key())
}

// ---------------------------------------------------------------------------
// Expansion state
// ---------------------------------------------------------------------------

/// Items whose children are currently shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<ItemKey>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, key: ItemKey) -> bool {
        self.expanded.contains(&key)
    }

    /// Returns `false` if `key` was already expanded.
    pub fn insert(&mut self, key: ItemKey) -> bool {
        self.expanded.insert(key)
    }

    /// Returns `false` if `key` was not expanded.
    pub fn remove(&mut self, key: ItemKey) -> bool {
        self.expanded.remove(&key)
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemKey> + '_ {
        self.expanded.iter().copied()
    }
}

/// What a tree view should draw next to a visible item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpanderState {
    /// No child is visible or leads to a result.
    Hidden,

    /// Children exist but are folded away.
    Collapsed,

    /// Children are shown.
    Expanded,
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Compute the list a tree view should render for `matches`.
///
/// With an empty query, every match collapses to its top-most ancestor and
/// each root is listed once, first-seen first; the list is only re-sorted
/// when a comparator is given. The expansion state is cleared.
///
/// Otherwise every match is listed together with all of its ancestors and
/// descendants, each once, sorted by `comparator` (default
/// [`default_order`]). Every listed item that has children is then marked
/// expanded, replacing any earlier manual state.
///
/// # Errors
///
/// A lookup error if a key does not resolve in `tree`.
pub fn compute_visible<H: Hierarchy + ?Sized>(
    tree: &H,
    query: &str,
    matches: &[ItemKey],
    expansion: &mut ExpansionState,
    comparator: Option<&Comparator>,
) -> Result<Vec<ItemKey>, SearcherError> {
    if trim_query(query).is_empty() {
        expansion.clear();
        return collapse_to_roots(tree, matches, comparator);
    }

    let visible = regenerate(tree, matches, comparator)?;
    expansion.clear();
    for &key in &visible {
        if tree.item(key)?.has_children() {
            expansion.insert(key);
        }
    }
    Ok(visible)
}

/// Distinct roots of `matches`, in first-seen order unless a comparator is given.
pub fn collapse_to_roots<H: Hierarchy + ?Sized>(
    tree: &H,
    matches: &[ItemKey],
    comparator: Option<&Comparator>,
) -> Result<Vec<ItemKey>, SearcherError> {
    let mut seen = HashSet::new();
    let mut roots: Vec<&Item> = Vec::new();

    for &key in matches {
        let mut current = tree.item(key)?;
        while let Some(parent) = tree.parent_of(current)? {
            current = parent;
        }
        if seen.insert(current.key()) {
            roots.push(current);
        }
    }

    if let Some(cmp) = comparator {
        roots.sort_by(|a, b| cmp(*a, *b));
    }
    Ok(roots.into_iter().map(Item::key).collect())
}

/// Matches plus all their ancestors and descendants, deduplicated and sorted.
pub fn regenerate<H: Hierarchy + ?Sized>(
    tree: &H,
    matches: &[ItemKey],
    comparator: Option<&Comparator>,
) -> Result<Vec<ItemKey>, SearcherError> {
    // `listed` holds everything added so far; `covered` the items whose whole
    // subtree is already listed.
    let mut listed = HashSet::new();
    let mut covered = HashSet::new();
    let mut out: Vec<&Item> = Vec::new();

    for &key in matches {
        let item = tree.item(key)?;
        if listed.insert(key) {
            out.push(item);
        }

        // Anything listed already has its ancestors listed.
        let mut parent = tree.parent_of(item)?;
        while let Some(p) = parent {
            if !listed.insert(p.key()) {
                break;
            }
            out.push(p);
            parent = tree.parent_of(p)?;
        }

        if !covered.insert(key) {
            continue;
        }
        for child in tree.descendants(key)? {
            covered.insert(child);
            if listed.insert(child) {
                out.push(tree.item(child)?);
            }
        }
    }

    let cmp = comparator.unwrap_or(&default_order);
    out.sort_by(|a, b| cmp(*a, *b));
    Ok(out.into_iter().map(Item::key).collect())
}

/// Drop every descendant of a listed item that has children but is not expanded.
pub fn hide_unexpanded<H: Hierarchy + ?Sized>(
    tree: &H,
    visible: &mut Vec<ItemKey>,
    expansion: &ExpansionState,
) -> Result<(), SearcherError> {
    let mut hidden = HashSet::new();
    for &key in visible.iter() {
        if expansion.is_expanded(key) || hidden.contains(&key) {
            continue;
        }
        if !tree.item(key)?.has_children() {
            continue;
        }
        hidden.extend(tree.descendants(key)?);
    }

    if !hidden.is_empty() {
        visible.retain(|key| !hidden.contains(key));
    }
    Ok(())
}

/// Expand `key` and recompute the visible list.
///
/// Expanding an item that is already expanded changes nothing. Right after
/// [`compute_visible`] every listed branch is expanded, so `expand` followed
/// by [`collapse`] only restores the previous list for an item that was
/// collapsed to begin with.
///
/// # Errors
///
/// A lookup error if `key` does not resolve; the expansion set is then left
/// untouched.
pub fn expand<H: Hierarchy + ?Sized>(
    tree: &H,
    key: ItemKey,
    matches: &[ItemKey],
    expansion: &mut ExpansionState,
    comparator: Option<&Comparator>,
) -> Result<Vec<ItemKey>, SearcherError> {
    tree.item(key)?;
    expansion.insert(key);
    let mut visible = regenerate(tree, matches, comparator)?;
    hide_unexpanded(tree, &mut visible, expansion)?;
    Ok(visible)
}

/// Outcome of [`collapse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collapsed {
    /// The item was expanded; this is the new visible list.
    Refreshed(Vec<ItemKey>),

    /// The item was not expanded. The request means "go to parent" and the
    /// visible list is unchanged. `None` for a root.
    SelectParent(Option<ItemKey>),
}

/// Collapse `key`, or, when it is not expanded, ask for its parent instead.
///
/// Collapsing an auto-expanded branch hides its subtree even if the caller
/// never expanded it by hand.
pub fn collapse<H: Hierarchy + ?Sized>(
    tree: &H,
    key: ItemKey,
    matches: &[ItemKey],
    expansion: &mut ExpansionState,
    comparator: Option<&Comparator>,
) -> Result<Collapsed, SearcherError> {
    if !expansion.remove(key) {
        let parent = tree.item(key)?.parent_key();
        return Ok(Collapsed::SelectParent(parent));
    }

    let mut visible = regenerate(tree, matches, comparator)?;
    hide_unexpanded(tree, &mut visible, expansion)?;
    Ok(Collapsed::Refreshed(visible))
}

// ---------------------------------------------------------------------------
// TreeView
// ---------------------------------------------------------------------------

/// Tree-view state for one picker session: the current matches, the list to
/// render, the expansion set and the selected item.
///
/// `refresh` starts a new query and resets expansion to "every branch on
/// screen is open". `expand` and `collapse` then adjust it manually until the
/// next `refresh`.
///
/// # Example
///
/// ```rust
/// use treeseek::{ItemStore, SearchItem, TreeView};
///
/// let store = ItemStore::build(vec![
///     SearchItem::new("Window").children_from([
///         SearchItem::new("Layouts").children_from([SearchItem::new("Default")]),
///     ]),
/// ]);
/// let results = treeseek::search().store(&store).query("def").run().unwrap();
///
/// let mut view = TreeView::new(&store);
/// view.refresh("def", &results.items).unwrap();
///
/// let names: Vec<_> = view.visible_items().unwrap().iter().map(|i| i.name()).collect();
/// assert_eq!(names, vec!["Window", "Layouts", "Default"]);
/// ```
pub struct TreeView<'a, H: Hierarchy + ?Sized> {
    tree:       &'a H,
    query:      String,
    results:    Vec<ItemKey>,
    visible:    Vec<ItemKey>,
    expansion:  ExpansionState,
    comparator: Option<Box<Comparator>>,
    selected:   Option<ItemKey>,
}

impl<'a, H: Hierarchy + ?Sized> TreeView<'a, H> {
    pub fn new(tree: &'a H) -> Self {
        Self {
            tree,
            query:      String::new(),
            results:    Vec::new(),
            visible:    Vec::new(),
            expansion:  ExpansionState::new(),
            comparator: None,
            selected:   None,
        }
    }

    /// Replace the default `(store, id)` ordering.
    pub fn with_comparator(
        mut self,
        cmp: impl Fn(&Item, &Item) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        self.comparator = Some(Box::new(cmp));
        self
    }

    /// Show a new result list for `query`. `results[0]` is taken as the top
    /// match and becomes the selection.
    pub fn refresh(&mut self, query: &str, results: &[&Item]) -> Result<(), SearcherError> {
        self.query = query.to_owned();
        self.results = results.iter().map(|item| item.key()).collect();
        self.visible = compute_visible(
            self.tree,
            query,
            &self.results,
            &mut self.expansion,
            self.comparator.as_deref(),
        )?;
        self.selected = self
            .results
            .first()
            .copied()
            .filter(|key| self.visible.contains(key));
        Ok(())
    }

    /// Show the children of `key`.
    pub fn expand(&mut self, key: ItemKey) -> Result<(), SearcherError> {
        self.visible = expand(
            self.tree,
            key,
            &self.results,
            &mut self.expansion,
            self.comparator.as_deref(),
        )?;
        Ok(())
    }

    /// Hide the children of `key`. If `key` was not expanded, select its
    /// parent instead and return it.
    pub fn collapse(&mut self, key: ItemKey) -> Result<Option<ItemKey>, SearcherError> {
        match collapse(
            self.tree,
            key,
            &self.results,
            &mut self.expansion,
            self.comparator.as_deref(),
        )? {
            Collapsed::Refreshed(visible) => {
                self.visible = visible;
                if self.selected.is_some_and(|s| !self.visible.contains(&s)) {
                    self.selected = Some(key);
                }
                Ok(None)
            }
            Collapsed::SelectParent(parent) => {
                if let Some(p) = parent.filter(|p| self.visible.contains(p)) {
                    self.selected = Some(p);
                }
                Ok(parent)
            }
        }
    }

    /// Expand if collapsed, collapse if expanded. Items without children are ignored.
    pub fn toggle(&mut self, key: ItemKey) -> Result<(), SearcherError> {
        if !self.tree.item(key)?.has_children() {
            return Ok(());
        }
        if self.expansion.is_expanded(key) {
            self.collapse(key)?;
        } else {
            self.expand(key)?;
        }
        Ok(())
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Keys of the current matches, best first.
    pub fn results(&self) -> &[ItemKey] {
        &self.results
    }

    /// Keys to render, in display order.
    pub fn visible(&self) -> &[ItemKey] {
        &self.visible
    }

    /// Resolve [`visible`](Self::visible) to items.
    pub fn visible_items(&self) -> Result<Vec<&'a Item>, SearcherError> {
        let tree: &'a H = self.tree;
        self.visible.iter().map(|&key| tree.item(key)).collect()
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn selected(&self) -> Option<ItemKey> {
        self.selected
    }

    /// Position of the selection in the visible list.
    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected?;
        self.visible.iter().position(|&key| key == selected)
    }

    /// Select the visible item at `index`. Out-of-range indices are ignored.
    pub fn select_index(&mut self, index: usize) {
        if let Some(&key) = self.visible.get(index) {
            self.selected = Some(key);
        }
    }

    /// Expander to draw next to `key`.
    pub fn expander_state(&self, key: ItemKey) -> Result<ExpanderState, SearcherError> {
        let item = self.tree.item(key)?;
        let results: HashSet<ItemKey> = self.results.iter().copied().collect();

        for child in item.child_keys() {
            if self.visible.contains(&child) || self.subtree_has_result(child, &results)? {
                return Ok(if self.expansion.is_expanded(key) {
                    ExpanderState::Expanded
                } else {
                    ExpanderState::Collapsed
                });
            }
        }
        Ok(ExpanderState::Hidden)
    }

    fn subtree_has_result(
        &self,
        key: ItemKey,
        results: &HashSet<ItemKey>,
    ) -> Result<bool, SearcherError> {
        if results.contains(&key) {
            return Ok(true);
        }
        Ok(self
            .tree
            .descendants(key)?
            .iter()
            .any(|d| results.contains(d)))
    }
}

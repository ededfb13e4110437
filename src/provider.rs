//! Content providers, their registry and per-provider enabled state.

use std::collections::{HashMap, HashSet};

use crate::catalog::Catalog;
use crate::error::SearcherError;
use crate::item::{Item, SearchItem, StoreId};
use crate::traits::Filter;

/// A source of searchable item trees.
///
/// Implement this once per kind of content (menu commands, assets,
/// settings pages). A [`ProviderRegistry`] turns every registered provider
/// into one store of a [`Catalog`], and routes `describe` / `preview`
/// requests for an item back to the provider that produced it.
///
/// # Example
///
/// ```rust
/// use treeseek::{Provider, ProviderRegistry, SearchItem, SearcherError};
///
/// struct Menu;
///
/// impl Provider for Menu {
///     fn id(&self) -> &str { "menu" }
///
///     fn fetch_items(&self) -> Result<Vec<SearchItem>, SearcherError> {
///         Ok(vec![SearchItem::new("Edit").children_from([SearchItem::new("Undo")])])
///     }
/// }
///
/// let mut registry = ProviderRegistry::new();
/// registry.register(Menu).unwrap();
/// let catalog = registry.build_catalog().unwrap();
/// assert_eq!(catalog.item_count(), 2);
/// ```
pub trait Provider: Send + Sync {
    /// Unique, stable identifier.
    fn id(&self) -> &str;

    /// Human-readable name. Defaults to [`id`](Self::id).
    fn display_name(&self) -> &str {
        self.id()
    }

    /// Produce the item trees for this provider's store.
    ///
    /// Fields are attached here, before registration; the returned trees are
    /// frozen once the catalog is built.
    fn fetch_items(&self) -> Result<Vec<SearchItem>, SearcherError>;

    /// Sub-categories users can toggle separately. Items tag themselves with
    /// one through [`CATEGORY_FIELD`]. None by default.
    fn sub_categories(&self) -> Vec<String> {
        Vec::new()
    }

    /// One-line description of an item. Defaults to its help text.
    fn describe(&self, item: &Item) -> String {
        item.help().to_owned()
    }

    /// Optional longer preview of an item.
    fn preview(&self, _item: &Item) -> Option<String> {
        None
    }
}

/// Item field naming the sub-category an item belongs to. Providers that
/// declare [`sub_categories`](Provider::sub_categories) tag their items with it.
pub const CATEGORY_FIELD: &str = "category";

/// A registered provider plus its enabled flags.
struct Registered {
    provider:   Box<dyn Provider>,
    enabled:    bool,
    categories: Vec<(String, bool)>,
}

impl Registered {
    fn new(provider: Box<dyn Provider>) -> Self {
        let categories = provider
            .sub_categories()
            .into_iter()
            .map(|name| (name, true))
            .collect();
        Self {
            provider,
            enabled: true,
            categories,
        }
    }

    /// Provider-level changes apply to every sub-category; enabling one
    /// sub-category also enables the provider.
    fn set(&mut self, enabled: bool, category: Option<&str>) {
        match category {
            None => {
                self.enabled = enabled;
                for (_, flag) in &mut self.categories {
                    *flag = enabled;
                }
            }
            Some(category) => {
                for (name, flag) in &mut self.categories {
                    if name == category {
                        *flag = enabled;
                        if enabled {
                            self.enabled = true;
                        }
                    }
                }
            }
        }
    }
}

/// Explicit list of providers, populated at startup.
///
/// Registration order decides store ids: the first provider's items land in
/// store `0`, the next in store `1`, and so on. Every provider starts
/// enabled; disabling one keeps its store (so ids stay stable) and the
/// [`filter`](ProviderRegistry::filter) drops its items from searches.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Registered>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a provider.
    ///
    /// # Errors
    ///
    /// [`SearcherError::DuplicateProvider`] if a provider with the same id is
    /// already registered.
    pub fn register(&mut self, provider: impl Provider + 'static) -> Result<StoreId, SearcherError> {
        if self.providers.iter().any(|p| p.provider.id() == provider.id()) {
            return Err(SearcherError::DuplicateProvider(provider.id().to_owned()));
        }
        let store = self.providers.len();
        log::debug!("registered provider `{}` as store {}", provider.id(), store);
        self.providers.push(Registered::new(Box::new(provider)));
        Ok(store)
    }

    /// Drop every provider.
    pub fn clear(&mut self) {
        self.providers.clear();
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    fn entry(&self, id: &str) -> Option<&Registered> {
        self.providers.iter().find(|p| p.provider.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Provider> {
        self.entry(id).map(|p| &*p.provider)
    }

    /// The provider whose items live in `store`.
    pub fn for_store(&self, store: StoreId) -> Option<&dyn Provider> {
        self.providers.get(store).map(|p| &*p.provider)
    }

    // ── Enabled state ─────────────────────────────────────────────────────

    /// Enable or disable a whole provider, sub-categories included.
    /// Returns `false` for an unknown id.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        self.set_filter(id, None, enabled)
    }

    /// Enable or disable one sub-category. Enabling it also enables the
    /// provider. Returns `false` for an unknown provider id.
    pub fn set_category_enabled(&mut self, id: &str, category: &str, enabled: bool) -> bool {
        self.set_filter(id, Some(category), enabled)
    }

    fn set_filter(&mut self, id: &str, category: Option<&str>, enabled: bool) -> bool {
        match self.providers.iter_mut().find(|p| p.provider.id() == id) {
            Some(entry) => {
                entry.set(enabled, category);
                log::debug!("provider `{}` {:?}: enabled = {}", id, category, enabled);
                true
            }
            None => false,
        }
    }

    /// Enable or disable every provider at once.
    pub fn reset_filter(&mut self, enable_all: bool) {
        for entry in &mut self.providers {
            entry.set(enable_all, None);
        }
    }

    /// `false` for unknown ids.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.entry(id).is_some_and(|p| p.enabled)
    }

    /// `false` for unknown providers and categories.
    pub fn is_category_enabled(&self, id: &str, category: &str) -> bool {
        self.entry(id).is_some_and(|p| {
            p.categories
                .iter()
                .any(|(name, flag)| name == category && *flag)
        })
    }

    /// Stores of the enabled providers, in registration order.
    pub fn enabled_stores(&self) -> Vec<StoreId> {
        self.providers
            .iter()
            .enumerate()
            .filter(|(_, p)| p.enabled)
            .map(|(store, _)| store)
            .collect()
    }

    /// Snapshot of the enabled state as a search [`Filter`].
    pub fn filter(&self) -> ProviderFilter {
        let mut filter = ProviderFilter::default();
        for (store, entry) in self.providers.iter().enumerate() {
            if !entry.enabled {
                continue;
            }
            filter.enabled.insert(store);
            let disabled: HashSet<String> = entry
                .categories
                .iter()
                .filter(|(_, flag)| !flag)
                .map(|(name, _)| name.clone())
                .collect();
            if !disabled.is_empty() {
                filter.disabled_categories.insert(store, disabled);
            }
        }
        filter
    }

    // ── Catalog ───────────────────────────────────────────────────────────

    /// Fetch every provider's items and build one store per provider.
    ///
    /// Disabled providers are fetched too, so store ids always match
    /// registration order.
    ///
    /// # Errors
    ///
    /// The first provider error, wrapped as [`SearcherError::Provider`]
    /// unless the provider already returned that variant.
    pub fn build_catalog(&self) -> Result<Catalog, SearcherError> {
        let mut catalog = Catalog::new();
        for entry in &self.providers {
            let provider = &entry.provider;
            let roots = provider.fetch_items().map_err(|e| {
                log::warn!("provider `{}` failed to fetch items: {}", provider.id(), e);
                match e {
                    SearcherError::Provider { .. } => e,
                    other => SearcherError::Provider {
                        provider: provider.id().to_owned(),
                        message:  other.to_string(),
                    },
                }
            })?;
            catalog.add_store(roots);
        }
        Ok(catalog)
    }

    /// Description of `item` from its owning provider.
    pub fn describe(&self, item: &Item) -> Result<String, SearcherError> {
        let provider = self
            .for_store(item.store_id())
            .ok_or(SearcherError::UnknownStore(item.store_id()))?;
        Ok(provider.describe(item))
    }

    /// Preview of `item` from its owning provider.
    pub fn preview(&self, item: &Item) -> Result<Option<String>, SearcherError> {
        let provider = self
            .for_store(item.store_id())
            .ok_or(SearcherError::UnknownStore(item.store_id()))?;
        Ok(provider.preview(item))
    }
}

/// Accepts items of enabled providers whose [`CATEGORY_FIELD`] does not name
/// a disabled sub-category. Built by [`ProviderRegistry::filter`].
#[derive(Debug, Clone, Default)]
pub struct ProviderFilter {
    enabled:             HashSet<StoreId>,
    disabled_categories: HashMap<StoreId, HashSet<String>>,
}

impl Filter for ProviderFilter {
    fn accept(&self, _query: &str, item: &Item) -> bool {
        let store = item.store_id();
        if !self.enabled.contains(&store) {
            return false;
        }
        match (item.field(CATEGORY_FIELD), self.disabled_categories.get(&store)) {
            (Some(category), Some(disabled)) => !disabled.contains(category),
            _ => true,
        }
    }
}

use crate::item::Item;

/// Extra predicate combined with path matching.
///
/// Implement this to gate results on anything besides the path text,
/// such as category fields or enabled flags. An item counts as a match only
/// if the path matches *and* the filter accepts it. With an empty query the
/// filter alone decides.
///
/// Closures of the shape `Fn(&str, &Item) -> bool` implement `Filter`
/// directly.
///
/// # Thread Safety
///
/// `Send + Sync` are required: filters are shared across worker threads and
/// called concurrently on different items.
///
/// # Example
///
/// ```rust
/// use treeseek::{Filter, Item};
///
/// struct CategoryFilter(String);
///
/// impl Filter for CategoryFilter {
///     fn accept(&self, _query: &str, item: &Item) -> bool {
///         item.field("category") == Some(self.0.as_str())
///     }
/// }
/// ```
pub trait Filter: Send + Sync {
    /// Returns `true` if `item` may appear in the results for `query`.
    fn accept(&self, query: &str, item: &Item) -> bool;
}

impl<F> Filter for F
where
    F: Fn(&str, &Item) -> bool + Send + Sync,
{
    fn accept(&self, query: &str, item: &Item) -> bool {
        self(query, item)
    }
}

use thiserror::Error;

use crate::item::{ItemId, StoreId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearcherError {
    // Validation
    #[error("item `{item}` already has a field named `{field}`")]
    DuplicateField { item: String, field: String },

    #[error("a provider with id `{0}` is already registered")]
    DuplicateProvider(String),

    #[error("invalid thread count: {0}")]
    InvalidThreadCount(usize),

    #[error("store id {0} added more than once")]
    DuplicateStore(StoreId),

    #[error("invalid highlight pattern: {0}")]
    InvalidPattern(String),

    // Lookup
    #[error("item id {id} out of range for store {store} ({len} items)")]
    ItemOutOfRange { store: StoreId, id: ItemId, len: usize },

    #[error("unknown store {0}")]
    UnknownStore(StoreId),

    // Config
    #[error("no store to search")]
    NoStore,

    // Third-party extensibility
    #[error("provider `{provider}` failed: {message}")]
    Provider { provider: String, message: String },
}

impl SearcherError {
    /// Whether this error came from resolving an id or store that does not exist.
    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::ItemOutOfRange { .. } | Self::UnknownStore(_))
    }

    /// Whether this error reports misuse of the API at the call site
    /// (duplicate names, bad configuration).
    ///
    /// These are never recovered internally; they surface at the point of
    /// misuse.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DuplicateField { .. }
                | Self::DuplicateProvider(_)
                | Self::DuplicateStore(_)
                | Self::InvalidThreadCount(_)
                | Self::InvalidPattern(_)
                | Self::NoStore
        )
    }
}

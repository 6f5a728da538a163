pub mod local;

use crate::types::{Card, CardInput};

/// Abstract storage trait for card collections.
/// Implementations: JsonFileStorage (single JSON file on disk).
pub trait CardStorage: Send + Sync {
    /// Make sure the backing location exists; creates an empty collection if missing.
    fn ensure_initialized(&self) -> Result<(), StoreError>;

    /// Read the full collection in stored order.
    fn read_all(&self) -> Result<Vec<Card>, StoreError>;

    /// Look up one card by ID.
    fn get(&self, id: &str) -> Result<Card, StoreError>;

    /// Validate and append a new card, then persist the collection.
    fn create(&self, input: &CardInput) -> Result<Card, StoreError>;

    /// Validate and replace the card with `id` in place, then persist.
    fn update(&self, id: &str, input: &CardInput) -> Result<Card, StoreError>;

    /// Remove the card with `id`, keeping the order of the rest, then persist.
    fn delete(&self, id: &str) -> Result<Card, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Card not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed card data: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// True for failures of the persisted file itself (I/O or decoding).
    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::Io(_) | StoreError::Json(_))
    }
}

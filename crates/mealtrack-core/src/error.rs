//! Error types for mealtrack-core

use thiserror::Error;

use crate::item::ItemId;

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors surfaced to the front end by the coordinator
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Name or calories field was left empty
    #[error("Enter meal name and calories.")]
    MissingInput,

    /// Store lookup failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Storage slot could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Errors from the item store and the repository's id lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Item not found: {0}")]
    NotFound(ItemId),

    #[error("No item selected for editing")]
    NoSelection,

    /// The id counter has reached `ItemId::MAX`
    #[error("No item ids left")]
    IdsExhausted,
}

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        TrackerError::Persistence(PersistenceError::Serialization(err.to_string()))
    }
}

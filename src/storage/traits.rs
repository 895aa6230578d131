//! Storage trait definitions

use crate::corpus::CorpusModel;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored corpus is inconsistent: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Entity counts of a stored corpus snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoredCounts {
    pub movies: usize,
    pub characters: usize,
    pub lines: usize,
    pub conversations: usize,
}

impl StoredCounts {
    pub fn is_empty(&self) -> bool {
        self.movies == 0 && self.characters == 0 && self.lines == 0 && self.conversations == 0
    }
}

/// Trait for corpus persistence backends
///
/// A store receives the finished, validated model and replaces any previous
/// snapshot wholesale; there is no incremental update, matching the model's
/// own replace-don't-patch lifecycle.
///
/// Implementations must be thread-safe (Send + Sync).
pub trait CorpusStore: Send + Sync {
    /// Persist the model, replacing any previously stored snapshot
    fn save_corpus(&self, model: &CorpusModel) -> StorageResult<()>;

    /// Load the stored snapshot back into a validated model
    ///
    /// Returns `Ok(None)` when the store holds no snapshot.
    fn load_corpus(&self) -> StorageResult<Option<CorpusModel>>;

    /// Entity counts of the stored snapshot without materializing it
    fn counts(&self) -> StorageResult<StoredCounts>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: CorpusStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}

//! Persistence for the corpus model

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{CorpusStore, OpenStore, StorageError, StorageResult, StoredCounts};

//! Colloquy: movie-dialog corpus ingestion engine
//!
//! Builds a fully cross-referenced, validated in-memory model of the
//! Cornell movie-dialogs corpus: movies, characters, dialog lines, and
//! two-party conversations.
//!
//! # Core concepts
//!
//! - **Registries**: append-only, identifier-keyed stores of one entity
//!   type each, with uniqueness and foreign-reference enforcement
//! - **Pipeline**: dependency-ordered table loading (movies → characters →
//!   lines → conversations) with fail-fast, construct-then-publish semantics
//! - **CorpusModel**: the immutable published aggregate, safe for
//!   unsynchronized concurrent reads
//!
//! # Example
//!
//! ```
//! use colloquy::{archive::entry, ingest_corpus, MemArchive};
//!
//! let sep = " +++$+++ ";
//! let archive = MemArchive::new()
//!     .with_entry(
//!         entry::MOVIE_TITLES,
//!         [format!("m0{sep}Toy Story{sep}1995{sep}8.3{sep}500000{sep}['animation']")],
//!     )
//!     .with_entry(
//!         entry::MOVIE_CHARACTERS,
//!         [
//!             format!("u0{sep}WOODY{sep}m0{sep}Toy Story{sep}m{sep}1"),
//!             format!("u1{sep}BUZZ{sep}m0{sep}Toy Story{sep}?{sep}?"),
//!         ],
//!     )
//!     .with_entry(
//!         entry::MOVIE_LINES,
//!         [format!("L1{sep}u0{sep}m0{sep}WOODY{sep}Howdy, partner!")],
//!     )
//!     .with_entry(
//!         entry::MOVIE_CONVERSATIONS,
//!         [format!("u0{sep}u1{sep}m0{sep}['L1']")],
//!     );
//!
//! let model = ingest_corpus(&archive).unwrap();
//! assert_eq!(model.movie_count(), 1);
//! assert_eq!(model.conversation_count(), 1);
//! ```

pub mod archive;
mod corpus;
pub mod ingest;
pub mod storage;

pub use archive::{ArchiveError, CorpusArchive, DirArchive, MemArchive};
pub use corpus::{
    Character, CharacterId, CharacterRegistry, Conversation, CorpusModel, DialogLine, LineId,
    LineRegistry, Movie, MovieId, MovieRegistry, RegistryError,
};
pub use ingest::{ingest_corpus, CorpusBuilder, IngestError, IngestResult};
pub use storage::{CorpusStore, OpenStore, SqliteStore, StorageError, StorageResult, StoredCounts};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

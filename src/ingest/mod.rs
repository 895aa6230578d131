//! Corpus ingestion: record decoding, reference linking, and orchestration

pub mod decode;
mod pipeline;

pub use pipeline::{ingest_corpus, table, CorpusBuilder, IngestError, IngestResult};

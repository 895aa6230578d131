//! Corpus archive access
//!
//! The ingest pipeline consumes an abstract "named stream of lines" per
//! table and nothing else. `DirArchive` serves an extracted corpus
//! directory using the corpus's well-known file names; `MemArchive` serves
//! in-memory tables for tests and embedding.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Well-known entry names within the corpus archive
pub mod entry {
    pub const MOVIE_TITLES: &str = "movie_titles_metadata.txt";
    pub const MOVIE_CHARACTERS: &str = "movie_characters_metadata.txt";
    pub const MOVIE_LINES: &str = "movie_lines.txt";
    pub const MOVIE_CONVERSATIONS: &str = "movie_conversations.txt";
}

/// Errors at the archive boundary
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive entry missing: {0}")]
    EntryMissing(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A source of named line streams, one per corpus table
pub trait CorpusArchive {
    /// Read every line of the named entry
    fn read_lines(&self, entry: &str) -> Result<Vec<String>, ArchiveError>;
}

/// Archive backed by an extracted corpus directory
#[derive(Debug, Clone)]
pub struct DirArchive {
    root: PathBuf,
}

impl DirArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl CorpusArchive for DirArchive {
    fn read_lines(&self, entry: &str) -> Result<Vec<String>, ArchiveError> {
        let path = self.root.join(entry);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            // Only the missing-entry case is success-adjacent enough to
            // classify; every other failure propagates as-is.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ArchiveError::EntryMissing(entry.to_string()));
            }
            Err(e) => return Err(ArchiveError::Io(e)),
        };
        // The corpus ships as Latin-1; lossy conversion keeps every record
        // usable without a transcoding dependency.
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.lines().map(str::to_owned).collect())
    }
}

/// In-memory archive, primarily for tests
#[derive(Debug, Clone, Default)]
pub struct MemArchive {
    entries: HashMap<String, Vec<String>>,
}

impl MemArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, builder-style
    pub fn with_entry<I, S>(mut self, name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, lines);
        self
    }

    /// Add or replace an entry
    pub fn insert<I, S>(&mut self, name: impl Into<String>, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(name.into(), lines.into_iter().map(Into::into).collect());
    }
}

impl CorpusArchive for MemArchive {
    fn read_lines(&self, entry: &str) -> Result<Vec<String>, ArchiveError> {
        self.entries
            .get(entry)
            .cloned()
            .ok_or_else(|| ArchiveError::EntryMissing(entry.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mem_archive_reads_back_lines() {
        let archive = MemArchive::new().with_entry("table.txt", ["a", "b"]);
        assert_eq!(archive.read_lines("table.txt").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_mem_archive_missing_entry() {
        let archive = MemArchive::new();
        let err = archive.read_lines("nope.txt").unwrap_err();
        assert!(matches!(err, ArchiveError::EntryMissing(name) if name == "nope.txt"));
    }

    #[test]
    fn test_dir_archive_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(entry::MOVIE_TITLES);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "first line").unwrap();
        writeln!(file, "second line").unwrap();

        let archive = DirArchive::new(dir.path());
        let lines = archive.read_lines(entry::MOVIE_TITLES).unwrap();
        assert_eq!(lines, vec!["first line", "second line"]);
    }

    #[test]
    fn test_dir_archive_missing_file_is_entry_missing() {
        let dir = tempfile::tempdir().unwrap();
        let archive = DirArchive::new(dir.path());
        let err = archive.read_lines(entry::MOVIE_LINES).unwrap_err();
        assert!(matches!(err, ArchiveError::EntryMissing(_)));
    }

    #[test]
    fn test_dir_archive_tolerates_latin1_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(entry::MOVIE_LINES);
        // "café" with a Latin-1 e-acute (0xE9), invalid as UTF-8.
        fs::write(&path, b"caf\xe9\n").unwrap();

        let archive = DirArchive::new(dir.path());
        let lines = archive.read_lines(entry::MOVIE_LINES).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("caf"));
    }
}

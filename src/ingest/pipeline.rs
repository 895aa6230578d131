//! Dependency-ordered ingestion pipeline
//!
//! Tables load strictly in order: movies, then characters, then lines, then
//! conversations. Later stages resolve identifiers against the frozen
//! earlier registries, so no stage may begin before the previous one has
//! fully completed. Any failure aborts the whole pass; a partially built
//! model is never observable.

use super::decode::{self, DecodeError};
use crate::archive::{entry, ArchiveError, CorpusArchive};
use crate::corpus::{
    Character, CharacterId, CharacterRegistry, Conversation, CorpusModel, DialogLine, LineId,
    LineRegistry, Movie, MovieId, MovieRegistry, RegistryError,
};
use thiserror::Error;
use tracing::{debug, info};

/// Logical table names used in error reporting
pub mod table {
    pub const MOVIE_TITLES: &str = "movie_titles";
    pub const MOVIE_CHARACTERS: &str = "movie_characters";
    pub const MOVIE_LINES: &str = "movie_lines";
    pub const MOVIE_CONVERSATIONS: &str = "movie_conversations";
}

/// Errors raised during an ingestion pass
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{table} line {line}: malformed record: {source}")]
    MalformedRecord {
        table: &'static str,
        line: usize,
        #[source]
        source: DecodeError,
    },

    #[error("{table} line {line}: unknown identifier '{id}'")]
    UnknownReference {
        table: &'static str,
        line: usize,
        id: String,
    },

    #[error("{table} line {line}: duplicate identifier '{id}'")]
    DuplicateIdentifier {
        table: &'static str,
        line: usize,
        id: String,
    },

    #[error("{table} line {line}: {detail}")]
    Inconsistent {
        table: &'static str,
        line: usize,
        detail: String,
    },

    #[error("ingestion stage out of order: expected {expected}, attempted {attempted}")]
    OutOfOrder {
        expected: &'static str,
        attempted: &'static str,
    },

    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

/// Result type for ingestion operations
pub type IngestResult<T> = Result<T, IngestError>;

impl IngestError {
    fn malformed(table: &'static str, line: usize, source: DecodeError) -> Self {
        Self::MalformedRecord {
            table,
            line,
            source,
        }
    }

    /// Attach table and line context to a registry failure
    fn from_registry(table: &'static str, line: usize, err: RegistryError) -> Self {
        match err {
            RegistryError::Duplicate(id) => Self::DuplicateIdentifier { table, line, id },
            RegistryError::Unknown(id) => Self::UnknownReference { table, line, id },
        }
    }
}

/// Ingestion stages, in required order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Stage {
    #[default]
    Empty,
    MoviesLoaded,
    CharactersLoaded,
    LinesLoaded,
    ConversationsLoaded,
}

impl Stage {
    fn name(self) -> &'static str {
        match self {
            Stage::Empty => "empty",
            Stage::MoviesLoaded => "movies loaded",
            Stage::CharactersLoaded => "characters loaded",
            Stage::LinesLoaded => "lines loaded",
            Stage::ConversationsLoaded => "conversations loaded",
        }
    }
}

/// Builds a `CorpusModel` one table at a time.
///
/// The working state stays private until `publish()`; a failed build is
/// simply dropped, so callers never observe a half-populated model.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    stage: Stage,
    movies: MovieRegistry,
    characters: CharacterRegistry,
    lines: LineRegistry,
    conversations: Vec<Conversation>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn expect_stage(&self, expected: Stage, attempted: &'static str) -> IngestResult<()> {
        if self.stage != expected {
            return Err(IngestError::OutOfOrder {
                expected: expected.name(),
                attempted,
            });
        }
        Ok(())
    }

    /// Load the movie titles table. Must run first.
    ///
    /// Returns the number of records loaded.
    pub fn load_movies<I, S>(&mut self, raw_lines: I) -> IngestResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expect_stage(Stage::Empty, "load movies")?;
        let table = table::MOVIE_TITLES;
        let mut count = 0;
        for (idx, raw) in raw_lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            let fields = decode::split_fields(raw, 6)
                .map_err(|e| IngestError::malformed(table, line_no, e))?;
            let movie = Movie {
                id: MovieId::from(fields[0]),
                title: fields[1].to_string(),
                year: decode::parse_year(fields[2])
                    .map_err(|e| IngestError::malformed(table, line_no, e))?,
                imdb_rating: decode::parse_f64("imdb_rating", fields[3])
                    .map_err(|e| IngestError::malformed(table, line_no, e))?,
                imdb_vote_count: decode::parse_u64("imdb_vote_count", fields[4])
                    .map_err(|e| IngestError::malformed(table, line_no, e))?,
                genres: decode::parse_quoted_list(fields[5]),
            };
            self.movies
                .insert(movie)
                .map_err(|e| IngestError::from_registry(table, line_no, e))?;
            count += 1;
        }
        self.stage = Stage::MoviesLoaded;
        debug!(count, "movie titles table loaded");
        Ok(count)
    }

    /// Load the characters table. Requires movies to be loaded.
    pub fn load_characters<I, S>(&mut self, raw_lines: I) -> IngestResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expect_stage(Stage::MoviesLoaded, "load characters")?;
        let table = table::MOVIE_CHARACTERS;
        let mut count = 0;
        for (idx, raw) in raw_lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            // Field 3 repeats the movie title; the movie id is authoritative.
            let fields = decode::split_fields(raw, 6)
                .map_err(|e| IngestError::malformed(table, line_no, e))?;
            let character = Character {
                id: CharacterId::from(fields[0]),
                name: fields[1].to_string(),
                movie: MovieId::from(fields[2]),
                gender: decode::optional_field(fields[4]).map(str::to_owned),
                credit_position: decode::parse_credit(fields[5])
                    .map_err(|e| IngestError::malformed(table, line_no, e))?,
            };
            self.characters
                .insert(character, &self.movies)
                .map_err(|e| IngestError::from_registry(table, line_no, e))?;
            count += 1;
        }
        self.stage = Stage::CharactersLoaded;
        debug!(count, "characters table loaded");
        Ok(count)
    }

    /// Load the dialog lines table. Requires characters to be loaded.
    pub fn load_lines<I, S>(&mut self, raw_lines: I) -> IngestResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expect_stage(Stage::CharactersLoaded, "load lines")?;
        let table = table::MOVIE_LINES;
        let mut count = 0;
        for (idx, raw) in raw_lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            // The text field is last and absorbs any separator occurrences.
            let fields = decode::split_fields(raw, 5)
                .map_err(|e| IngestError::malformed(table, line_no, e))?;
            let line = DialogLine {
                id: LineId::from(fields[0]),
                character: CharacterId::from(fields[1]),
                movie: MovieId::from(fields[2]),
                text: fields[4].to_string(),
            };
            self.lines
                .insert(line, &self.characters, &self.movies)
                .map_err(|e| IngestError::from_registry(table, line_no, e))?;
            count += 1;
        }
        self.stage = Stage::LinesLoaded;
        debug!(count, "dialog lines table loaded");
        Ok(count)
    }

    /// Load the conversations table. Requires lines to be loaded.
    pub fn load_conversations<I, S>(&mut self, raw_lines: I) -> IngestResult<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.expect_stage(Stage::LinesLoaded, "load conversations")?;
        let table = table::MOVIE_CONVERSATIONS;
        let mut count = 0;
        for (idx, raw) in raw_lines.into_iter().enumerate() {
            let line_no = idx + 1;
            let raw = raw.as_ref();
            if raw.trim().is_empty() {
                continue;
            }
            let fields = decode::split_fields(raw, 4)
                .map_err(|e| IngestError::malformed(table, line_no, e))?;
            let conversation =
                self.build_conversation(line_no, fields[0], fields[1], fields[2], fields[3])?;
            self.conversations.push(conversation);
            count += 1;
        }
        self.stage = Stage::ConversationsLoaded;
        debug!(count, "conversations table loaded");
        Ok(count)
    }

    /// Resolve and validate one conversation record.
    ///
    /// Line identifiers are taken in the order they appear in the serialized
    /// list; the resulting sequence is the conversation's line order.
    fn build_conversation(
        &self,
        line_no: usize,
        char1_id: &str,
        char2_id: &str,
        movie_id: &str,
        line_id_list: &str,
    ) -> IngestResult<Conversation> {
        let table = table::MOVIE_CONVERSATIONS;
        let char1_id = CharacterId::from(char1_id);
        let char2_id = CharacterId::from(char2_id);
        let movie_id = MovieId::from(movie_id);

        let char1 = self
            .characters
            .lookup(&char1_id)
            .map_err(|e| IngestError::from_registry(table, line_no, e))?;
        let char2 = self
            .characters
            .lookup(&char2_id)
            .map_err(|e| IngestError::from_registry(table, line_no, e))?;
        let movie = self
            .movies
            .lookup(&movie_id)
            .map_err(|e| IngestError::from_registry(table, line_no, e))?;

        if char1_id == char2_id {
            return Err(IngestError::Inconsistent {
                table,
                line: line_no,
                detail: format!("conversation participants must be distinct, got '{}' twice", char1_id),
            });
        }
        for participant in [char1, char2] {
            if participant.movie != movie.id {
                return Err(IngestError::Inconsistent {
                    table,
                    line: line_no,
                    detail: format!(
                        "character '{}' belongs to movie '{}', not '{}'",
                        participant.id, participant.movie, movie.id
                    ),
                });
            }
        }

        let mut lines = Vec::new();
        for id in decode::extract_line_ids(line_id_list) {
            let line_id = LineId::from(id);
            self.lines
                .lookup(&line_id)
                .map_err(|e| IngestError::from_registry(table, line_no, e))?;
            lines.push(line_id);
        }

        Ok(Conversation {
            characters: (char1_id, char2_id),
            movie: movie_id,
            lines,
        })
    }

    /// Publish the finished model. Requires all four tables to be loaded.
    ///
    /// Consumes the builder; this is the only way a `CorpusModel` becomes
    /// visible.
    pub fn publish(self) -> IngestResult<CorpusModel> {
        self.expect_stage(Stage::ConversationsLoaded, "publish")?;
        Ok(CorpusModel::new(
            self.movies,
            self.characters,
            self.lines,
            self.conversations,
        ))
    }
}

/// Ingest all four tables from an archive in dependency order and publish
/// the resulting model.
pub fn ingest_corpus(archive: &dyn CorpusArchive) -> IngestResult<CorpusModel> {
    let mut builder = CorpusBuilder::new();

    let movies = builder.load_movies(archive.read_lines(entry::MOVIE_TITLES)?)?;
    let characters = builder.load_characters(archive.read_lines(entry::MOVIE_CHARACTERS)?)?;
    let lines = builder.load_lines(archive.read_lines(entry::MOVIE_LINES)?)?;
    let conversations =
        builder.load_conversations(archive.read_lines(entry::MOVIE_CONVERSATIONS)?)?;

    info!(
        movies,
        characters, lines, conversations, "corpus ingestion complete"
    );
    builder.publish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEP: &str = " +++$+++ ";

    fn titles() -> Vec<String> {
        vec![format!(
            "m0{SEP}Toy Story{SEP}1995{SEP}8.3{SEP}500000{SEP}['animation']"
        )]
    }

    fn characters() -> Vec<String> {
        vec![
            format!("u0{SEP}WOODY{SEP}m0{SEP}Toy Story{SEP}m{SEP}1"),
            format!("u1{SEP}BUZZ{SEP}m0{SEP}Toy Story{SEP}?{SEP}?"),
        ]
    }

    fn lines() -> Vec<String> {
        vec![format!("L1{SEP}u0{SEP}m0{SEP}WOODY{SEP}Howdy, partner!")]
    }

    #[test]
    fn test_full_builder_pass() {
        let mut builder = CorpusBuilder::new();
        assert_eq!(builder.load_movies(titles()).unwrap(), 1);
        assert_eq!(builder.load_characters(characters()).unwrap(), 2);
        assert_eq!(builder.load_lines(lines()).unwrap(), 1);
        let convos = vec![format!("u0{SEP}u1{SEP}m0{SEP}['L1']")];
        assert_eq!(builder.load_conversations(convos).unwrap(), 1);

        let model = builder.publish().unwrap();
        assert_eq!(model.conversation_count(), 1);
    }

    #[test]
    fn test_out_of_order_stage_rejected() {
        let mut builder = CorpusBuilder::new();
        let err = builder.load_characters(characters()).unwrap_err();
        assert!(matches!(err, IngestError::OutOfOrder { .. }));
    }

    #[test]
    fn test_publish_before_completion_rejected() {
        let mut builder = CorpusBuilder::new();
        builder.load_movies(titles()).unwrap();
        let err = builder.publish().unwrap_err();
        assert!(matches!(err, IngestError::OutOfOrder { .. }));
    }

    #[test]
    fn test_malformed_record_carries_table_and_line() {
        let mut builder = CorpusBuilder::new();
        let bad = vec![
            format!("m0{SEP}Toy Story{SEP}1995{SEP}8.3{SEP}500000{SEP}['animation']"),
            "m1 only-two-fields".to_string(),
        ];
        let err = builder.load_movies(bad).unwrap_err();
        match err {
            IngestError::MalformedRecord { table, line, .. } => {
                assert_eq!(table, table::MOVIE_TITLES);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dangling_movie_reference_aborts() {
        let mut builder = CorpusBuilder::new();
        builder.load_movies(titles()).unwrap();
        let bad = vec![format!("u0{SEP}WOODY{SEP}m9{SEP}Unknown{SEP}m{SEP}1")];
        let err = builder.load_characters(bad).unwrap_err();
        match err {
            IngestError::UnknownReference { table, line, id } => {
                assert_eq!(table, table::MOVIE_CHARACTERS);
                assert_eq!(line, 1);
                assert_eq!(id, "m9");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_conversation_same_participant_twice_is_inconsistent() {
        let mut builder = CorpusBuilder::new();
        builder.load_movies(titles()).unwrap();
        builder.load_characters(characters()).unwrap();
        builder.load_lines(lines()).unwrap();
        let convos = vec![format!("u0{SEP}u0{SEP}m0{SEP}['L1']")];
        let err = builder.load_conversations(convos).unwrap_err();
        assert!(matches!(err, IngestError::Inconsistent { .. }));
    }

    #[test]
    fn test_conversation_participant_from_other_movie_is_inconsistent() {
        let mut builder = CorpusBuilder::new();
        let two_movies = vec![
            format!("m0{SEP}Toy Story{SEP}1995{SEP}8.3{SEP}500000{SEP}['animation']"),
            format!("m1{SEP}Heat{SEP}1995{SEP}8.2{SEP}400000{SEP}['crime']"),
        ];
        builder.load_movies(two_movies).unwrap();
        let cast = vec![
            format!("u0{SEP}WOODY{SEP}m0{SEP}Toy Story{SEP}m{SEP}1"),
            format!("u1{SEP}NEIL{SEP}m1{SEP}Heat{SEP}m{SEP}1"),
        ];
        builder.load_characters(cast).unwrap();
        builder
            .load_lines(vec![format!("L1{SEP}u0{SEP}m0{SEP}WOODY{SEP}Howdy.")])
            .unwrap();
        let convos = vec![format!("u0{SEP}u1{SEP}m0{SEP}['L1']")];
        let err = builder.load_conversations(convos).unwrap_err();
        assert!(matches!(err, IngestError::Inconsistent { .. }));
    }

    #[test]
    fn test_unknown_line_id_in_conversation_aborts() {
        let mut builder = CorpusBuilder::new();
        builder.load_movies(titles()).unwrap();
        builder.load_characters(characters()).unwrap();
        builder.load_lines(lines()).unwrap();
        let convos = vec![format!("u0{SEP}u1{SEP}m0{SEP}['L1', 'L999']")];
        let err = builder.load_conversations(convos).unwrap_err();
        match err {
            IngestError::UnknownReference { id, .. } => assert_eq!(id, "L999"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_lines_skipped_but_counted_for_numbering() {
        let mut builder = CorpusBuilder::new();
        let with_blank = vec![
            format!("m0{SEP}Toy Story{SEP}1995{SEP}8.3{SEP}500000{SEP}['animation']"),
            String::new(),
            "broken".to_string(),
        ];
        let err = builder.load_movies(with_blank).unwrap_err();
        match err {
            IngestError::MalformedRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}

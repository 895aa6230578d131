//! SQLite storage backend for the corpus model

use super::traits::{CorpusStore, OpenStore, StorageError, StorageResult, StoredCounts};
use crate::corpus::{
    Character, CharacterId, CharacterRegistry, Conversation, CorpusModel, DialogLine, LineId,
    LineRegistry, Movie, MovieId, MovieRegistry, RegistryError,
};
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed corpus store
///
/// Uses a single database file with one table per corpus table plus a join
/// table for conversation line ordering. `save_corpus` replaces the stored
/// snapshot wholesale inside one transaction. Thread-safe via an internal
/// mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS movies (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                year INTEGER NOT NULL,
                imdb_rating REAL NOT NULL,
                imdb_vote_count INTEGER NOT NULL,
                genres_json TEXT NOT NULL,
                seq INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                movie_id TEXT NOT NULL,
                gender TEXT,
                credit_position INTEGER,
                seq INTEGER NOT NULL,
                FOREIGN KEY (movie_id) REFERENCES movies(id)
            );

            CREATE TABLE IF NOT EXISTS lines (
                id TEXT PRIMARY KEY,
                character_id TEXT NOT NULL,
                movie_id TEXT NOT NULL,
                text TEXT NOT NULL,
                seq INTEGER NOT NULL,
                FOREIGN KEY (character_id) REFERENCES characters(id),
                FOREIGN KEY (movie_id) REFERENCES movies(id)
            );

            CREATE TABLE IF NOT EXISTS conversations (
                seq INTEGER PRIMARY KEY,
                character1_id TEXT NOT NULL,
                character2_id TEXT NOT NULL,
                movie_id TEXT NOT NULL,
                FOREIGN KEY (character1_id) REFERENCES characters(id),
                FOREIGN KEY (character2_id) REFERENCES characters(id),
                FOREIGN KEY (movie_id) REFERENCES movies(id)
            );

            -- Line ordering within a conversation is positional, not keyed.
            CREATE TABLE IF NOT EXISTS conversation_lines (
                conversation_seq INTEGER NOT NULL,
                position INTEGER NOT NULL,
                line_id TEXT NOT NULL,
                PRIMARY KEY (conversation_seq, position),
                FOREIGN KEY (conversation_seq) REFERENCES conversations(seq) ON DELETE CASCADE,
                FOREIGN KEY (line_id) REFERENCES lines(id)
            );

            CREATE INDEX IF NOT EXISTS idx_characters_movie ON characters(movie_id);
            CREATE INDEX IF NOT EXISTS idx_lines_character ON lines(character_id);
            CREATE INDEX IF NOT EXISTS idx_lines_movie ON lines(movie_id);

            PRAGMA foreign_keys = ON;
            "#,
        )?;
        Ok(())
    }

    /// Delete the database file at `path`.
    ///
    /// A missing file counts as success; any other failure propagates.
    pub fn reset(path: impl AsRef<Path>) -> StorageResult<()> {
        match std::fs::remove_file(path.as_ref()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn corrupt(err: RegistryError) -> StorageError {
        StorageError::Corrupt(err.to_string())
    }
}

impl CorpusStore for SqliteStore {
    fn save_corpus(&self, model: &CorpusModel) -> StorageResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        // Wholesale replace, children before parents.
        tx.execute("DELETE FROM conversation_lines", [])?;
        tx.execute("DELETE FROM conversations", [])?;
        tx.execute("DELETE FROM lines", [])?;
        tx.execute("DELETE FROM characters", [])?;
        tx.execute("DELETE FROM movies", [])?;

        for (seq, movie) in model.movies().enumerate() {
            tx.execute(
                "INSERT INTO movies (id, title, year, imdb_rating, imdb_vote_count, genres_json, seq)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    movie.id.as_str(),
                    movie.title,
                    movie.year,
                    movie.imdb_rating,
                    movie.imdb_vote_count,
                    serde_json::to_string(&movie.genres)?,
                    seq,
                ],
            )?;
        }

        for (seq, character) in model.characters().enumerate() {
            tx.execute(
                "INSERT INTO characters (id, name, movie_id, gender, credit_position, seq)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    character.id.as_str(),
                    character.name,
                    character.movie.as_str(),
                    character.gender,
                    character.credit_position,
                    seq,
                ],
            )?;
        }

        for (seq, line) in model.lines().enumerate() {
            tx.execute(
                "INSERT INTO lines (id, character_id, movie_id, text, seq)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    line.id.as_str(),
                    line.character.as_str(),
                    line.movie.as_str(),
                    line.text,
                    seq,
                ],
            )?;
        }

        for (seq, conversation) in model.conversations().enumerate() {
            tx.execute(
                "INSERT INTO conversations (seq, character1_id, character2_id, movie_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    seq,
                    conversation.characters.0.as_str(),
                    conversation.characters.1.as_str(),
                    conversation.movie.as_str(),
                ],
            )?;
            for (position, line_id) in conversation.lines.iter().enumerate() {
                tx.execute(
                    "INSERT INTO conversation_lines (conversation_seq, position, line_id)
                     VALUES (?1, ?2, ?3)",
                    params![seq, position, line_id.as_str()],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load_corpus(&self) -> StorageResult<Option<CorpusModel>> {
        let conn = self.conn.lock().unwrap();

        let mut movies = MovieRegistry::new();
        let mut stmt = conn.prepare(
            "SELECT id, title, year, imdb_rating, imdb_vote_count, genres_json
             FROM movies ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u16>(2)?,
                row.get::<_, f64>(3)?,
                row.get::<_, u64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;
        for row in rows {
            let (id, title, year, imdb_rating, imdb_vote_count, genres_json) = row?;
            let movie = Movie {
                id: MovieId::from(id),
                title,
                year,
                imdb_rating,
                imdb_vote_count,
                genres: serde_json::from_str(&genres_json)?,
            };
            movies.insert(movie).map_err(Self::corrupt)?;
        }
        drop(stmt);

        let mut characters = CharacterRegistry::new();
        let mut stmt = conn.prepare(
            "SELECT id, name, movie_id, gender, credit_position
             FROM characters ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<i32>>(4)?,
            ))
        })?;
        for row in rows {
            let (id, name, movie_id, gender, credit_position) = row?;
            let character = Character {
                id: CharacterId::from(id),
                name,
                movie: MovieId::from(movie_id),
                gender,
                credit_position,
            };
            characters.insert(character, &movies).map_err(Self::corrupt)?;
        }
        drop(stmt);

        let mut lines = LineRegistry::new();
        let mut stmt = conn.prepare(
            "SELECT id, character_id, movie_id, text FROM lines ORDER BY seq",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (id, character_id, movie_id, text) = row?;
            let line = DialogLine {
                id: LineId::from(id),
                character: CharacterId::from(character_id),
                movie: MovieId::from(movie_id),
                text,
            };
            lines
                .insert(line, &characters, &movies)
                .map_err(Self::corrupt)?;
        }
        drop(stmt);

        let mut conversations = Vec::new();
        let mut stmt = conn.prepare(
            "SELECT seq, character1_id, character2_id, movie_id
             FROM conversations ORDER BY seq",
        )?;
        let mut line_stmt = conn.prepare(
            "SELECT line_id FROM conversation_lines
             WHERE conversation_seq = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        for row in rows {
            let (seq, char1, char2, movie_id) = row?;
            let char1 = CharacterId::from(char1);
            let char2 = CharacterId::from(char2);
            let movie_id = MovieId::from(movie_id);
            characters.lookup(&char1).map_err(Self::corrupt)?;
            characters.lookup(&char2).map_err(Self::corrupt)?;
            movies.lookup(&movie_id).map_err(Self::corrupt)?;

            let mut conversation_lines = Vec::new();
            let line_rows = line_stmt.query_map(params![seq], |row| row.get::<_, String>(0))?;
            for line_row in line_rows {
                let line_id = LineId::from(line_row?);
                lines.lookup(&line_id).map_err(Self::corrupt)?;
                conversation_lines.push(line_id);
            }
            conversations.push(Conversation {
                characters: (char1, char2),
                movie: movie_id,
                lines: conversation_lines,
            });
        }
        drop(line_stmt);
        drop(stmt);

        if movies.is_empty() && characters.is_empty() && lines.is_empty() && conversations.is_empty()
        {
            return Ok(None);
        }
        Ok(Some(CorpusModel::new(
            movies,
            characters,
            lines,
            conversations,
        )))
    }

    fn counts(&self) -> StorageResult<StoredCounts> {
        let conn = self.conn.lock().unwrap();
        let count = |table: &str| -> StorageResult<usize> {
            let n: i64 =
                conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
            Ok(n as usize)
        };
        Ok(StoredCounts {
            movies: count("movies")?,
            characters: count("characters")?,
            lines: count("lines")?,
            conversations: count("conversations")?,
        })
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

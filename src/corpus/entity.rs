//! Corpus entity types
//!
//! Entities reference one another by corpus-native identifier, never by
//! back-pointer; the registries own the entities themselves (see `registry`).
//! All entities are immutable once constructed.

use serde::{Deserialize, Serialize};

macro_rules! corpus_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create an identifier from its corpus-native string form
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string value
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

corpus_id!(
    /// Corpus-native movie identifier (a single-letter prefix plus digits, e.g. `m42`)
    MovieId
);

corpus_id!(
    /// Corpus-native character identifier (e.g. `u1043`)
    CharacterId
);

corpus_id!(
    /// Corpus-native dialog line identifier (e.g. `L19024`)
    LineId
);

/// A movie described by the titles table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Corpus-native identifier
    pub id: MovieId,
    /// Title as it appears in the corpus
    pub title: String,
    /// Release year
    pub year: u16,
    /// IMDB aggregate rating
    pub imdb_rating: f64,
    /// IMDB vote count
    pub imdb_vote_count: u64,
    /// Genre labels, in corpus order
    pub genres: Vec<String>,
}

/// A character belonging to one movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Corpus-native identifier
    pub id: CharacterId,
    /// Display name (typically uppercase in the corpus)
    pub name: String,
    /// The movie this character appears in
    pub movie: MovieId,
    /// Gender, verbatim from the corpus; `None` when the corpus marks it unknown
    pub gender: Option<String>,
    /// Position in the credits; `None` when unknown
    pub credit_position: Option<i32>,
}

/// A single dialog line spoken by one character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogLine {
    /// Corpus-native identifier
    pub id: LineId,
    /// The speaking character
    pub character: CharacterId,
    /// The movie the line belongs to
    pub movie: MovieId,
    /// Utterance text, verbatim (may contain the field separator token)
    pub text: String,
}

/// An ordered exchange of dialog lines between exactly two characters
/// within one movie.
///
/// Conversations carry no corpus-native identifier; their identity is
/// their position in the model's conversation sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    /// The two (distinct) participants
    pub characters: (CharacterId, CharacterId),
    /// The movie the conversation belongs to
    pub movie: MovieId,
    /// Line identifiers in source order, not registry order
    pub lines: Vec<LineId>,
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) - {}/10", self.title, self.year, self.imdb_rating)
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.movie)?;
        if let Some(ref gender) = self.gender {
            write!(f, " - {}", gender)?;
        }
        Ok(())
    }
}

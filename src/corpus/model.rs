//! The published corpus aggregate

use super::entity::{Character, CharacterId, Conversation, DialogLine, LineId, Movie, MovieId};
use super::registry::{CharacterRegistry, LineRegistry, MovieRegistry};
use serde::Serialize;

/// The fully cross-referenced, validated corpus model.
///
/// Owns the three registries and the ordered conversation sequence. A model
/// only exists after a complete, successful ingestion pass: every reference
/// held by any entity resolves within the model, and nothing is mutable.
/// The model is plain owned data and safe for unsynchronized concurrent
/// reads.
///
/// Cross-entity views ("all lines for a character") are computed on demand
/// from identifiers rather than stored as back-pointers.
#[derive(Debug, Clone, Serialize)]
pub struct CorpusModel {
    movies: MovieRegistry,
    characters: CharacterRegistry,
    lines: LineRegistry,
    conversations: Vec<Conversation>,
}

impl CorpusModel {
    pub(crate) fn new(
        movies: MovieRegistry,
        characters: CharacterRegistry,
        lines: LineRegistry,
        conversations: Vec<Conversation>,
    ) -> Self {
        Self {
            movies,
            characters,
            lines,
            conversations,
        }
    }

    pub fn movie_count(&self) -> usize {
        self.movies.len()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.len()
    }

    /// Look up a movie by identifier
    pub fn movie(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.get(id)
    }

    /// Look up a character by identifier
    pub fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.get(id)
    }

    /// Look up a dialog line by identifier
    pub fn line(&self, id: &LineId) -> Option<&DialogLine> {
        self.lines.get(id)
    }

    /// Iterate movies in corpus order
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    /// Iterate characters in corpus order
    pub fn characters(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    /// Iterate dialog lines in corpus order
    pub fn lines(&self) -> impl Iterator<Item = &DialogLine> {
        self.lines.iter()
    }

    /// Iterate conversations in corpus order
    pub fn conversations(&self) -> impl Iterator<Item = &Conversation> {
        self.conversations.iter()
    }

    /// Resolve a conversation's line identifiers to the lines themselves,
    /// preserving the conversation's own ordering.
    pub fn conversation_lines<'a>(&'a self, conversation: &'a Conversation) -> Vec<&'a DialogLine> {
        conversation
            .lines
            .iter()
            .filter_map(|id| self.lines.get(id))
            .collect()
    }

    /// All dialog lines spoken by a character, in corpus order.
    ///
    /// Computed by scanning the line registry; the model stores no
    /// back-references.
    pub fn lines_for_character(&self, id: &CharacterId) -> Vec<&DialogLine> {
        self.lines.iter().filter(|l| &l.character == id).collect()
    }

    /// All characters belonging to a movie, in corpus order.
    pub fn characters_for_movie(&self, id: &MovieId) -> Vec<&Character> {
        self.characters.iter().filter(|c| &c.movie == id).collect()
    }
}

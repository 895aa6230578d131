//! Append-only, identifier-keyed registries
//!
//! Each registry owns one entity type, enforces identifier uniqueness, and
//! (for dependent types) resolves foreign identifiers against the registries
//! built before it. There is no update or delete: a registry only grows, and
//! insertion order is preserved for iteration.

use super::entity::{Character, CharacterId, DialogLine, LineId, Movie, MovieId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised by registry insertion and lookup
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate identifier '{0}'")]
    Duplicate(String),

    #[error("unknown identifier '{0}'")]
    Unknown(String),
}

/// Registry of movies, the root of the reference graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieRegistry {
    movies: HashMap<MovieId, Movie>,
    order: Vec<MovieId>,
}

impl MovieRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a movie, failing on identifier collision
    pub fn insert(&mut self, movie: Movie) -> Result<(), RegistryError> {
        if self.movies.contains_key(&movie.id) {
            return Err(RegistryError::Duplicate(movie.id.to_string()));
        }
        self.order.push(movie.id.clone());
        self.movies.insert(movie.id.clone(), movie);
        Ok(())
    }

    /// Get a movie by identifier
    pub fn get(&self, id: &MovieId) -> Option<&Movie> {
        self.movies.get(id)
    }

    /// Resolve a movie reference, failing if absent
    pub fn lookup(&self, id: &MovieId) -> Result<&Movie, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::Unknown(id.to_string()))
    }

    /// Iterate movies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.order.iter().filter_map(|id| self.movies.get(id))
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Registry of characters; every character references a known movie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterRegistry {
    characters: HashMap<CharacterId, Character>,
    order: Vec<CharacterId>,
}

impl CharacterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character, resolving its movie reference first
    ///
    /// Fails with `Unknown` if the referenced movie is absent and with
    /// `Duplicate` on identifier collision.
    pub fn insert(&mut self, character: Character, movies: &MovieRegistry) -> Result<(), RegistryError> {
        movies.lookup(&character.movie)?;
        if self.characters.contains_key(&character.id) {
            return Err(RegistryError::Duplicate(character.id.to_string()));
        }
        self.order.push(character.id.clone());
        self.characters.insert(character.id.clone(), character);
        Ok(())
    }

    /// Get a character by identifier
    pub fn get(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.get(id)
    }

    /// Resolve a character reference, failing if absent
    pub fn lookup(&self, id: &CharacterId) -> Result<&Character, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::Unknown(id.to_string()))
    }

    /// Iterate characters in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.order.iter().filter_map(|id| self.characters.get(id))
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

/// Registry of dialog lines; every line references a known character and movie
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineRegistry {
    lines: HashMap<LineId, DialogLine>,
    order: Vec<LineId>,
}

impl LineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dialog line, resolving its character and movie references first
    pub fn insert(
        &mut self,
        line: DialogLine,
        characters: &CharacterRegistry,
        movies: &MovieRegistry,
    ) -> Result<(), RegistryError> {
        characters.lookup(&line.character)?;
        movies.lookup(&line.movie)?;
        if self.lines.contains_key(&line.id) {
            return Err(RegistryError::Duplicate(line.id.to_string()));
        }
        self.order.push(line.id.clone());
        self.lines.insert(line.id.clone(), line);
        Ok(())
    }

    /// Get a line by identifier
    pub fn get(&self, id: &LineId) -> Option<&DialogLine> {
        self.lines.get(id)
    }

    /// Resolve a line reference, failing if absent
    pub fn lookup(&self, id: &LineId) -> Result<&DialogLine, RegistryError> {
        self.get(id)
            .ok_or_else(|| RegistryError::Unknown(id.to_string()))
    }

    /// Iterate lines in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &DialogLine> {
        self.order.iter().filter_map(|id| self.lines.get(id))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str) -> Movie {
        Movie {
            id: MovieId::from(id),
            title: "Test Movie".to_string(),
            year: 1999,
            imdb_rating: 7.0,
            imdb_vote_count: 1000,
            genres: vec!["drama".to_string()],
        }
    }

    fn character(id: &str, movie: &str) -> Character {
        Character {
            id: CharacterId::from(id),
            name: "TEST".to_string(),
            movie: MovieId::from(movie),
            gender: None,
            credit_position: None,
        }
    }

    #[test]
    fn test_movie_insert_and_lookup() {
        let mut movies = MovieRegistry::new();
        movies.insert(movie("m0")).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies.lookup(&MovieId::from("m0")).unwrap().year, 1999);
    }

    #[test]
    fn test_movie_duplicate_rejected() {
        let mut movies = MovieRegistry::new();
        movies.insert(movie("m0")).unwrap();
        let err = movies.insert(movie("m0")).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate(_)));
        assert_eq!(movies.len(), 1);
    }

    #[test]
    fn test_movie_unknown_lookup() {
        let movies = MovieRegistry::new();
        let err = movies.lookup(&MovieId::from("m9")).unwrap_err();
        assert!(matches!(err, RegistryError::Unknown(_)));
    }

    #[test]
    fn test_character_insert_resolves_movie() {
        let mut movies = MovieRegistry::new();
        movies.insert(movie("m0")).unwrap();

        let mut characters = CharacterRegistry::new();
        characters.insert(character("u0", "m0"), &movies).unwrap();
        assert_eq!(characters.len(), 1);
    }

    #[test]
    fn test_character_dangling_movie_rejected() {
        let movies = MovieRegistry::new();
        let mut characters = CharacterRegistry::new();
        let err = characters.insert(character("u0", "m9"), &movies).unwrap_err();
        assert!(matches!(err, RegistryError::Unknown(_)));
        assert!(characters.is_empty());
    }

    #[test]
    fn test_line_insert_resolves_both_references() {
        let mut movies = MovieRegistry::new();
        movies.insert(movie("m0")).unwrap();
        let mut characters = CharacterRegistry::new();
        characters.insert(character("u0", "m0"), &movies).unwrap();

        let mut lines = LineRegistry::new();
        let line = DialogLine {
            id: LineId::from("L1"),
            character: CharacterId::from("u0"),
            movie: MovieId::from("m0"),
            text: "Howdy.".to_string(),
        };
        lines.insert(line, &characters, &movies).unwrap();

        let dangling = DialogLine {
            id: LineId::from("L2"),
            character: CharacterId::from("u9"),
            movie: MovieId::from("m0"),
            text: "nope".to_string(),
        };
        assert!(lines.insert(dangling, &characters, &movies).is_err());
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let mut movies = MovieRegistry::new();
        for id in ["m2", "m0", "m1"] {
            movies.insert(movie(id)).unwrap();
        }
        let ids: Vec<&str> = movies.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["m2", "m0", "m1"]);
    }
}

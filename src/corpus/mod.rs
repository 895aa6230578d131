//! Core corpus data structures

mod entity;
mod model;
mod registry;


pub use entity::{Character, CharacterId, Conversation, DialogLine, LineId, Movie, MovieId};
pub use model::CorpusModel;
pub use registry::{CharacterRegistry, LineRegistry, MovieRegistry, RegistryError};

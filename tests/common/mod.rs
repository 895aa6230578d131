//! Shared fixtures for integration tests

use colloquy::archive::entry;
use colloquy::MemArchive;

pub const SEP: &str = " +++$+++ ";

/// A small but complete corpus: two movies, four characters, five lines,
/// two conversations.
pub fn sample_archive() -> MemArchive {
    MemArchive::new()
        .with_entry(
            entry::MOVIE_TITLES,
            [
                format!("m0{SEP}Toy Story{SEP}1995{SEP}8.3{SEP}500000{SEP}['animation', 'comedy']"),
                format!("m1{SEP}Heat{SEP}1995{SEP}8.2{SEP}400000{SEP}['crime', 'drama']"),
            ],
        )
        .with_entry(
            entry::MOVIE_CHARACTERS,
            [
                format!("u0{SEP}WOODY{SEP}m0{SEP}Toy Story{SEP}m{SEP}1"),
                format!("u1{SEP}BUZZ{SEP}m0{SEP}Toy Story{SEP}?{SEP}?"),
                format!("u2{SEP}NEIL{SEP}m1{SEP}Heat{SEP}m{SEP}2"),
                format!("u3{SEP}VINCENT{SEP}m1{SEP}Heat{SEP}m{SEP}1"),
            ],
        )
        .with_entry(
            entry::MOVIE_LINES,
            [
                format!("L1{SEP}u0{SEP}m0{SEP}WOODY{SEP}Howdy, partner!"),
                format!("L2{SEP}u1{SEP}m0{SEP}BUZZ{SEP}To infinity and beyond."),
                format!("L3{SEP}u0{SEP}m0{SEP}WOODY{SEP}Reach for the sky."),
                format!("L4{SEP}u2{SEP}m1{SEP}NEIL{SEP}Don't let yourself get attached."),
                format!("L5{SEP}u3{SEP}m1{SEP}VINCENT{SEP}I do what I do best."),
            ],
        )
        .with_entry(
            entry::MOVIE_CONVERSATIONS,
            [
                format!("u0{SEP}u1{SEP}m0{SEP}['L3', 'L1', 'L2']"),
                format!("u2{SEP}u3{SEP}m1{SEP}['L4', 'L5']"),
            ],
        )
}

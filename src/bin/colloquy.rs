//! Colloquy CLI — ingest the movie-dialogs corpus, persist it, summarize it.
//!
//! Usage:
//!   colloquy ingest <dir> [--db path] [--no-save]
//!   colloquy summary [--db path]
//!   colloquy reset [--db path]

use clap::{Parser, Subcommand};
use colloquy::{ingest_corpus, CorpusModel, CorpusStore, DirArchive, OpenStore, SqliteStore};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "colloquy",
    version,
    about = "Movie-dialog corpus ingestion engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest an extracted corpus directory and persist the model
    Ingest {
        /// Directory containing the four corpus table files
        dir: PathBuf,
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// Build and validate the model without persisting it
        #[arg(long)]
        no_save: bool,
    },
    /// Print counts from a previously saved corpus
    Summary {
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Delete the saved corpus database
    Reset {
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Get the default database path (~/.local/share/colloquy/colloquy.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let colloquy_dir = data_dir.join("colloquy");
    std::fs::create_dir_all(&colloquy_dir).ok();
    colloquy_dir.join("colloquy.db")
}

fn print_summary(source: &str, model: &CorpusModel) {
    println!("Successfully processed corpus data from {}:", source);
    println!(" -  {} movies", model.movie_count());
    println!(" -  {} characters", model.character_count());
    println!(" -  {} lines", model.line_count());
    println!(" -  {} conversations", model.conversation_count());
}

fn cmd_ingest(dir: &Path, db: Option<PathBuf>, no_save: bool) -> i32 {
    let archive = DirArchive::new(dir);
    let model = match ingest_corpus(&archive) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error: ingestion failed: {}", e);
            return 1;
        }
    };
    print_summary(&dir.display().to_string(), &model);

    if no_save {
        return 0;
    }
    let db_path = db.unwrap_or_else(default_db_path);
    let store = match SqliteStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: failed to open database: {}", e);
            return 1;
        }
    };
    match store.save_corpus(&model) {
        Ok(()) => {
            println!("Saved corpus to {}", db_path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: failed to save corpus: {}", e);
            1
        }
    }
}

fn cmd_summary(db: Option<PathBuf>) -> i32 {
    let db_path = db.unwrap_or_else(default_db_path);
    let store = match SqliteStore::open(&db_path) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: failed to open database: {}", e);
            return 1;
        }
    };
    match store.counts() {
        Ok(counts) if counts.is_empty() => {
            println!("No corpus saved at {}", db_path.display());
            0
        }
        Ok(counts) => {
            println!("Corpus at {}:", db_path.display());
            println!(" -  {} movies", counts.movies);
            println!(" -  {} characters", counts.characters);
            println!(" -  {} lines", counts.lines);
            println!(" -  {} conversations", counts.conversations);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_reset(db: Option<PathBuf>) -> i32 {
    let db_path = db.unwrap_or_else(default_db_path);
    match SqliteStore::reset(&db_path) {
        Ok(()) => {
            println!("Removed {}", db_path.display());
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Ingest { dir, db, no_save } => cmd_ingest(&dir, db, no_save),
        Commands::Summary { db } => cmd_summary(db),
        Commands::Reset { db } => cmd_reset(db),
    };
    std::process::exit(code);
}

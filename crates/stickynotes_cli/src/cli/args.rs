//! Argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use stickynotes_core::NoteColor;

/// Sticky notes kept in a local database.
#[derive(Parser, Debug)]
#[command(name = "stickynotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configured location
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a note at the top of the board
    Add {
        /// Note text; empty when omitted
        #[arg(default_value = "")]
        content: String,

        /// yellow|pink|green|blue; the configured default when omitted
        #[arg(short = 'k', long, value_parser = parse_color)]
        color: Option<NoteColor>,
    },

    /// List notes in board order
    List {
        /// Only notes containing this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Print the matching notes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a note's text or color
    Edit {
        id: String,

        #[arg(long)]
        content: Option<String>,

        #[arg(short = 'k', long, value_parser = parse_color)]
        color: Option<NoteColor>,
    },

    /// Delete one note
    Delete { id: String },

    /// Move a note between board positions
    Move {
        from: usize,
        to: usize,

        /// Positions refer to the list filtered by this text
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Merge notes from an exported JSON file
    Import { file: PathBuf },

    /// Write every note to a date-stamped JSON file
    Export {
        /// Output file; `sticky-notes-<date>.json` in the current directory by default
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete every note
    Clear {
        /// Confirm deleting all notes; this cannot be undone
        #[arg(long)]
        yes: bool,
    },

    /// Remote sync (not available yet)
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    /// Show sync provider state
    Status,
    /// Push every note to the remote
    Push,
}

fn parse_color(value: &str) -> Result<NoteColor, String> {
    value.parse::<NoteColor>().map_err(|err| err.to_string())
}

//! CLI module for Kurs.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Kurs - training documents from recorded walkthroughs
///
/// Transcribes a subject-matter expert's recording, turns it into a structured
/// training document, and lets you ask questions about it.
#[derive(Parser, Debug)]
#[command(name = "kurs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe a recording, structure it, and start a question session
    Run {
        /// Audio or video file (prompts from the inputs folder if omitted)
        file: Option<String>,
    },

    /// Structure an existing transcript and save the document
    Structure {
        /// Plain text transcript file
        #[arg(short, long)]
        transcript: String,
    },

    /// Ask questions about a saved structured document
    Chat {
        /// Structured document JSON file
        #[arg(short, long)]
        doc: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

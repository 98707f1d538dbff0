//! CLI module for docvox.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use crate::pipeline::FileTarget;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// docvox - knowledge-base documents in, answers and narration out
///
/// Runs documents from a remote knowledge base through a hosted chat model,
/// saves each answer as a report, and can narrate answers with a preset or
/// cloned voice.
#[derive(Parser, Debug)]
#[command(name = "docvox")]
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

/// Voice options shared by commands that narrate.
#[derive(clap::Args, Debug, Clone)]
pub struct NarrationArgs {
    /// Emotion (neutral, happy, sad, angry, fearful, disgusted, surprised)
    #[arg(short, long, default_value = "neutral")]
    pub emotion: String,

    /// Audio style (direct, feedback)
    #[arg(short, long, default_value = "direct")]
    pub style: String,

    /// Preset voice name (see 'docvox voices presets')
    #[arg(long, conflicts_with = "voice_id")]
    pub voice: Option<String>,

    /// Identifier of a cloned voice
    #[arg(long)]
    pub voice_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check configuration and service connectivity
    Doctor,

    /// List models available for chat completion
    Models,

    /// List knowledge bases and their files
    Kbs {
        /// Only show this knowledge base
        #[arg(long)]
        kb: Option<String>,
    },

    /// Create a knowledge base
    CreateKb {
        /// Knowledge base name
        name: String,

        /// Knowledge base description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Upload files, optionally adding them to a knowledge base
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Knowledge base to add the uploaded files to
        #[arg(long)]
        kb: Option<String>,

        /// Upload purpose
        #[arg(long, default_value = "fine-tune")]
        purpose: String,
    },

    /// Search uploaded files by name
    FindFile {
        /// File name to search for
        name: String,
    },

    /// Ask the model about knowledge-base documents and save the answers
    Process {
        /// Knowledge base holding FILES
        #[arg(long)]
        kb: Option<String>,

        /// File names within --kb
        files: Vec<String>,

        /// Process every file in --kb
        #[arg(long, requires = "kb")]
        all: bool,

        /// Extra documents as KB:FILE (repeatable)
        #[arg(short, long = "target")]
        targets: Vec<FileTarget>,

        /// System prompt (defaults to chat.system_prompt)
        #[arg(long)]
        system: Option<String>,

        /// User prompt (defaults to chat.user_prompt)
        #[arg(long)]
        user: Option<String>,

        /// Load the system prompt from a knowledge-base document (KB:FILE)
        #[arg(long, conflicts_with = "system")]
        instructions: Option<FileTarget>,

        /// Model to use (see 'docvox models')
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature (0.0-2.0)
        #[arg(long)]
        temperature: Option<f32>,

        /// Narrate each answer after processing
        #[arg(long)]
        narrate: bool,

        #[command(flatten)]
        narration: NarrationArgs,
    },

    /// Narrate a saved answer from a text file
    Narrate {
        /// Text file to narrate
        input: PathBuf,

        /// Name used for the output file (defaults to the input file name)
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        narration: NarrationArgs,
    },

    /// Manage voices
    Voices {
        #[command(subcommand)]
        action: VoicesAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum VoicesAction {
    /// List voices on the account (preset and cloned)
    List,

    /// List the built-in preset voice names
    Presets,

    /// Clone a voice from audio samples
    Clone {
        /// Name for the cloned voice
        name: String,

        /// Audio samples (1-3 clips of 30 seconds to 5 minutes work best)
        #[arg(required = true)]
        samples: Vec<PathBuf>,

        /// Description of the voice
        #[arg(short, long, default_value = "Cloned voice")]
        description: String,
    },

    /// Delete a cloned voice
    Delete {
        /// Voice identifier
        voice_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

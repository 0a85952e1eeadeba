//! CLI module for Vidra.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Vidra - Grounded Q&A for YouTube Videos
///
/// A local-first CLI tool for asking questions about YouTube videos and
/// getting answers grounded in the video's own text, with cited sources.
#[derive(Parser, Debug)]
#[command(name = "vidra")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
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
    /// Initialize Vidra and verify system requirements
    Init,

    /// Check system requirements and configuration
    Doctor,

    /// Fetch a video's text and index it for question answering
    Process {
        /// YouTube URL or bare video ID
        input: String,

        /// Chunk size in characters (default from config)
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Chunk overlap in characters (default from config)
        #[arg(long)]
        chunk_overlap: Option<usize>,
    },

    /// Ask a question about an ingested video
    Ask {
        /// The question to ask
        question: String,

        /// Video ID or URL of the ingested video
        #[arg(short = 'i', long)]
        video: String,

        /// LLM model to use for answer generation
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature (lower = more factual)
        #[arg(short, long)]
        temperature: Option<f32>,

        /// Maximum tokens in the generated answer
        #[arg(long)]
        max_tokens: Option<u32>,
    },

    /// List ingested videos
    List,

    /// Delete an ingested video's collection
    Delete {
        /// Video ID to delete
        video_id: String,
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

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

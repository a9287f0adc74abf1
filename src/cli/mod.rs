use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::generate::Platform;

pub mod progress;

pub use progress::SpinnerProgress;

#[derive(Parser)]
#[command(
    name = "socialgen",
    about = "Transcript Social - Generate social media posts from YouTube video transcripts",
    version,
    long_about = "A CLI tool that fetches the transcript of a YouTube video and uses an OpenAI-compatible model to write platform-specific posts for LinkedIn, Instagram, Twitter/X, Facebook, YouTube community posts, Reddit and blogs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate posts for one video
    Generate {
        /// YouTube video URL or video ID
        #[arg(value_name = "URL_OR_ID")]
        video: String,

        /// What you want to generate (e.g. "a professional post highlighting key takeaways")
        #[arg(short, long, value_name = "TEXT")]
        intent: Option<String>,

        /// Target platform; repeat for several (defaults to the configured platforms)
        #[arg(short, long = "platform", value_name = "PLATFORM")]
        platforms: Vec<Platform>,

        /// Caption language in priority order; repeat for fallbacks
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        /// Output format (defaults to the configured format)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Generate all platforms concurrently
        #[arg(long)]
        parallel: bool,
    },

    /// Interactive form: enter a video, an intent and platforms, repeat
    Form,

    /// Fetch and print a video's transcript
    Transcript {
        /// YouTube video URL or video ID
        #[arg(value_name = "URL_OR_ID")]
        video: String,

        /// Caption language in priority order; repeat for fallbacks
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<String>,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show or initialize the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,
    },

    /// List supported platforms
    Platforms,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text
    Text,
    /// Markdown sections
    Markdown,
    /// JSON document
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

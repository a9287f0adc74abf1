//! Transcript Social - turn YouTube video transcripts into social media posts
//!
//! This library resolves a video identifier from user input, fetches the video's captions,
//! and asks an OpenAI-compatible text-generation API to write platform-specific copy
//! (LinkedIn, Instagram, Twitter/X, Facebook, YouTube community posts, Reddit, blogs).

pub mod cli;
pub mod config;
pub mod form;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod transcript;
pub mod utils;
pub mod video;

pub use cli::{Cli, Commands, OutputFormat};
pub use config::Config;
pub use generate::{ContentGenerator, GenerationResult, GenerationStatus, Platform};
pub use pipeline::{ContentPipeline, Submission, SubmissionReport};
pub use transcript::{FetchOutcome, TranscriptFetcher, TranscriptText};
pub use video::VideoId;

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types surfaced by a content generation submission
#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcript not available for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("Unexpected transcript provider error: {0}")]
    UnexpectedProvider(String),

    #[error("rate limit or insufficient quota")]
    GenerationQuotaExceeded,

    #[error("{0}")]
    GenerationFailed(String),

    #[error("Missing API key: {env_var} environment variable is not set")]
    MissingApiKey { env_var: String },
}

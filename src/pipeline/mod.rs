use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::generate::{ContentGenerator, GenerationResult, Platform};
use crate::transcript::{FetchOutcome, TranscriptFetcher, TranscriptText};
use crate::video::VideoId;
use crate::ContentError;

/// One form submission
#[derive(Debug, Clone, Default)]
pub struct Submission {
    /// Video URL or ID as typed by the user
    pub video: String,

    /// Free-form instruction for the model
    pub intent: Option<String>,

    /// Selected platforms, in selection order
    pub platforms: Vec<Platform>,
}

/// Pipeline stage reported to a [`ProgressReporter`]
#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
    Validating,
    Resolving,
    FetchingTranscript(VideoId),
    Generating(Platform),
    Done,
}

/// Receives stage changes, e.g. to drive spinners
pub trait ProgressReporter: Send + Sync {
    fn stage(&self, stage: &Stage);

    fn platform_finished(&self, _result: &GenerationResult) {}
}

/// Reporter that ignores everything
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn stage(&self, _stage: &Stage) {}
}

/// Everything produced for one submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReport {
    pub submission_id: Uuid,
    pub video_id: VideoId,
    pub transcript_chars: usize,
    pub generated_at: DateTime<Utc>,
    pub posts: Vec<GenerationResult>,
}

/// Resolve, fetch, then generate once per selected platform
pub struct ContentPipeline {
    fetcher: TranscriptFetcher,
    generator: ContentGenerator,
    languages: Vec<String>,
    parallel: bool,
}

impl ContentPipeline {
    /// Build the pipeline from configuration; fails fast without an API key
    pub fn new(config: &Config) -> Result<Self, ContentError> {
        let generator = ContentGenerator::new(&config.generation)?;
        let fetcher = TranscriptFetcher::new()
            .map_err(|e| ContentError::UnexpectedProvider(e.to_string()))?;

        Ok(Self::with_components(
            fetcher,
            generator,
            config.transcript.languages.clone(),
        )
        .parallel(config.app.parallel_platforms))
    }

    pub fn with_components(
        fetcher: TranscriptFetcher,
        generator: ContentGenerator,
        languages: Vec<String>,
    ) -> Self {
        Self {
            fetcher,
            generator,
            languages,
            parallel: false,
        }
    }

    /// Generate all platforms concurrently
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Replace the caption language priority list
    pub fn languages(mut self, languages: Vec<String>) -> Self {
        if !languages.is_empty() {
            self.languages = languages;
        }
        self
    }

    pub fn fetcher(&self) -> &TranscriptFetcher {
        &self.fetcher
    }

    /// Check required fields and return the de-duplicated platform list
    pub fn validate(submission: &Submission) -> Result<Vec<Platform>, ContentError> {
        if submission.video.trim().is_empty() {
            return Err(ContentError::InvalidInput(
                "a video URL or ID is required".to_string(),
            ));
        }

        let mut platforms = Vec::with_capacity(submission.platforms.len());
        for platform in &submission.platforms {
            if !platforms.contains(platform) {
                platforms.push(*platform);
            }
        }

        if platforms.is_empty() {
            return Err(ContentError::InvalidInput(
                "select at least one platform".to_string(),
            ));
        }

        Ok(platforms)
    }

    /// Fetch a transcript, turning provider outcomes into pipeline errors
    pub async fn fetch_transcript(&self, video_id: &VideoId) -> Result<TranscriptText, ContentError> {
        match self.fetcher.fetch(video_id, &self.languages).await {
            Ok(FetchOutcome::Available(text)) => Ok(text),
            Ok(FetchOutcome::Unavailable { reason }) => Err(ContentError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason,
            }),
            Err(e) => Err(ContentError::UnexpectedProvider(e.to_string())),
        }
    }

    /// Process one submission
    pub async fn run(
        &self,
        submission: &Submission,
        progress: &dyn ProgressReporter,
    ) -> Result<SubmissionReport, ContentError> {
        let submission_id = Uuid::new_v4();

        progress.stage(&Stage::Validating);
        let platforms = Self::validate(submission)?;

        progress.stage(&Stage::Resolving);
        let video_id = VideoId::resolve(&submission.video)?;
        tracing::info!("Submission {} resolved video {}", submission_id, video_id);

        progress.stage(&Stage::FetchingTranscript(video_id.clone()));
        let transcript = self.fetch_transcript(&video_id).await?;
        tracing::info!(
            "Transcript loaded for {} ({} characters)",
            video_id,
            transcript.char_count()
        );
        tracing::debug!(
            "Transcript preview: {}",
            crate::utils::truncate_chars(transcript.as_str(), 120)
        );

        let intent = submission.intent.as_deref();
        let posts = if self.parallel {
            let tasks = platforms.iter().map(|platform| {
                progress.stage(&Stage::Generating(*platform));
                self.generator.generate(&transcript, *platform, intent)
            });
            let posts = join_all(tasks).await;
            posts.iter().for_each(|post| progress.platform_finished(post));
            posts
        } else {
            let mut posts = Vec::with_capacity(platforms.len());
            for platform in &platforms {
                progress.stage(&Stage::Generating(*platform));
                let post = self.generator.generate(&transcript, *platform, intent).await;
                progress.platform_finished(&post);
                posts.push(post);
            }
            posts
        };

        let failed = posts.iter().filter(|post| !post.is_generated()).count();
        if failed > 0 {
            tracing::warn!(
                "{} of {} platforms failed for video {}",
                failed,
                posts.len(),
                video_id
            );
        }

        progress.stage(&Stage::Done);

        Ok(SubmissionReport {
            submission_id,
            video_id,
            transcript_chars: transcript.char_count(),
            generated_at: Utc::now(),
            posts,
        })
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

pub mod youtube;

use crate::video::VideoId;

/// Language used when the caller gives no preference
pub const DEFAULT_LANGUAGE: &str = "en";

/// Failures raised by a transcript source
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("Subtitles are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Video {0} is no longer available")]
    VideoUnavailable(String),

    #[error("Invalid video ID: {0}")]
    InvalidVideoId(String),

    #[error("Could not retrieve a transcript for video {video_id}: {reason}")]
    CouldNotRetrieve { video_id: String, reason: String },

    #[error("Request to the transcript provider failed for video {video_id}: {reason}")]
    Transport { video_id: String, reason: String },

    #[error("Could not set up the transcript client: {0}")]
    ClientSetup(String),
}

impl TranscriptError {
    pub(crate) fn could_not_retrieve(video_id: &VideoId, reason: impl Into<String>) -> Self {
        TranscriptError::CouldNotRetrieve {
            video_id: video_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the provider confirmed that no usable transcript exists
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            TranscriptError::TranscriptsDisabled(_)
                | TranscriptError::NoTranscriptFound { .. }
                | TranscriptError::VideoUnavailable(_)
                | TranscriptError::InvalidVideoId(_)
                | TranscriptError::CouldNotRetrieve { .. }
        )
    }

    /// Unavailable for a reason no other source could change
    pub fn is_confirmed_unavailable(&self) -> bool {
        self.is_unavailable() && !matches!(self, TranscriptError::CouldNotRetrieve { .. })
    }
}

/// One timed caption cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,

    /// Display text
    pub text: String,
}

impl Segment {
    pub fn new(start: f64, duration: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            duration,
            text: text.into(),
        }
    }
}

/// Concatenated caption text for one video; never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TranscriptText(String);

impl TranscriptText {
    /// Wrap already-joined text, rejecting blank input
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    /// Join segment texts in order with single spaces, skipping blank cues
    pub fn from_segments(segments: &[Segment]) -> Option<Self> {
        let joined = segments
            .iter()
            .map(|segment| segment.text.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        Self::new(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the transcript
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for TranscriptText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a transcript lookup that did not hit an unexpected fault
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Available(TranscriptText),
    Unavailable { reason: String },
}

impl FetchOutcome {
    pub fn transcript(&self) -> Option<&TranscriptText> {
        match self {
            FetchOutcome::Available(text) => Some(text),
            FetchOutcome::Unavailable { .. } => None,
        }
    }
}

/// A way of pulling caption segments from the transcript provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch ordered caption segments, picking the first available language
    async fn fetch_segments(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<Segment>, TranscriptError>;

    /// Short name used in logs
    fn name(&self) -> &'static str;
}

/// Fetches transcripts through an ordered list of sources and memoizes successes
pub struct TranscriptFetcher {
    sources: Vec<Box<dyn TranscriptSource>>,
    cache: Mutex<HashMap<VideoId, TranscriptText>>,
}

impl TranscriptFetcher {
    /// Create a fetcher with the default YouTube sources
    pub fn new() -> Result<Self, TranscriptError> {
        let api = youtube::transcript_api()?;
        let mut fetcher = Self::with_sources(Vec::new());

        // Register in fallback order
        fetcher.register(Box::new(youtube::DirectSource::new(api.clone())));
        fetcher.register(Box::new(youtube::TrackListSource::new(api, Client::new())));

        Ok(fetcher)
    }

    pub fn with_sources(sources: Vec<Box<dyn TranscriptSource>>) -> Self {
        Self {
            sources,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Append a source to the end of the fallback order
    pub fn register(&mut self, source: Box<dyn TranscriptSource>) {
        self.sources.push(source);
    }

    /// Source names in the order they are tried
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Previously fetched transcript for this video, if any
    pub fn cached(&self, video_id: &VideoId) -> Option<TranscriptText> {
        self.cache
            .lock()
            .ok()
            .and_then(|cache| cache.get(video_id).cloned())
    }

    /// Try each source in order and return the first successful segment list
    pub async fn fetch_segments(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<Segment>, TranscriptError> {
        let default_languages = [DEFAULT_LANGUAGE.to_string()];
        let languages = if languages.is_empty() {
            &default_languages[..]
        } else {
            languages
        };

        let mut unavailable = None;
        let mut last_error = None;

        for source in &self.sources {
            tracing::debug!("Fetching transcript for {} via {}", video_id, source.name());

            match source.fetch_segments(video_id, languages).await {
                Ok(segments) => {
                    tracing::debug!(
                        "{} returned {} segments for {}",
                        source.name(),
                        segments.len(),
                        video_id
                    );
                    return Ok(segments);
                }
                Err(e) if e.is_confirmed_unavailable() => {
                    tracing::debug!("{} confirmed no transcript for {}: {}", source.name(), video_id, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::debug!("{} failed for {}: {}", source.name(), video_id, e);
                    if e.is_unavailable() {
                        unavailable.get_or_insert(e);
                    } else {
                        last_error = Some(e);
                    }
                }
            }
        }

        // a provider-side refusal outranks a transport fault in a later source
        Err(unavailable.or(last_error).unwrap_or_else(|| {
            TranscriptError::could_not_retrieve(video_id, "no transcript sources configured")
        }))
    }

    /// Fetch and concatenate the transcript, classifying provider failures
    pub async fn fetch(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<FetchOutcome, TranscriptError> {
        if let Some(text) = self.cached(video_id) {
            tracing::debug!("Using cached transcript for {}", video_id);
            return Ok(FetchOutcome::Available(text));
        }

        match self.fetch_segments(video_id, languages).await {
            Ok(segments) => match TranscriptText::from_segments(&segments) {
                Some(text) => {
                    if let Ok(mut cache) = self.cache.lock() {
                        cache.insert(video_id.clone(), text.clone());
                    }
                    Ok(FetchOutcome::Available(text))
                }
                None => {
                    tracing::warn!("Transcript for video {} is empty", video_id);
                    Ok(FetchOutcome::Unavailable {
                        reason: "transcript is empty".to_string(),
                    })
                }
            },
            Err(e) if e.is_unavailable() => {
                tracing::warn!("Transcript not available for video {}: {}", video_id, e);
                Ok(FetchOutcome::Unavailable {
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                tracing::error!("Unexpected error fetching transcript for {}: {}", video_id, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn video() -> VideoId {
        VideoId::parse("abc12345678").unwrap()
    }

    fn segments(texts: &[&str]) -> Vec<Segment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Segment::new(i as f64, 1.0, *text))
            .collect()
    }

    fn source_returning(
        result: fn() -> Result<Vec<Segment>, TranscriptError>,
    ) -> MockTranscriptSource {
        let mut source = MockTranscriptSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_fetch_segments()
            .times(1)
            .returning(move |_, _| result());
        source
    }

    #[test]
    fn test_concatenation_preserves_order_with_single_space() {
        let text = TranscriptText::from_segments(&segments(&["Hello", "world"])).unwrap();
        assert_eq!(text.as_str(), "Hello world");
    }

    #[test]
    fn test_concatenation_collapses_whitespace_and_skips_blank_cues() {
        let text =
            TranscriptText::from_segments(&segments(&[" Hello\n", "", "\n", "big  world "])).unwrap();
        assert_eq!(text.as_str(), "Hello big world");
        assert_eq!(text.char_count(), 15);
    }

    #[test]
    fn test_blank_segments_yield_nothing() {
        assert!(TranscriptText::from_segments(&segments(&["", " \n"])).is_none());
        assert!(TranscriptText::from_segments(&[]).is_none());
    }

    #[tokio::test]
    async fn test_disabled_transcript_is_unavailable() {
        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(source_returning(|| {
            Err(TranscriptError::TranscriptsDisabled("abc12345678".to_string()))
        }))]);

        let outcome = fetcher.fetch(&video(), &["en".to_string()]).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_empty_transcript_is_unavailable() {
        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(source_returning(|| {
            Ok(segments(&["", " "]))
        }))]);

        let outcome = fetcher.fetch(&video(), &[]).await.unwrap();
        assert_eq!(
            outcome,
            FetchOutcome::Unavailable {
                reason: "transcript is empty".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_unexpected_error_propagates() {
        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(source_returning(|| {
            Err(TranscriptError::Transport {
                video_id: "abc12345678".to_string(),
                reason: "connection reset".to_string(),
            })
        }))]);

        let result = fetcher.fetch(&video(), &[]).await;
        assert!(matches!(result, Err(TranscriptError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_falls_back_to_next_source_in_order() {
        let mut seq = Sequence::new();

        let mut first = MockTranscriptSource::new();
        first.expect_name().return_const("first");
        first
            .expect_fetch_segments()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id, _| Err(TranscriptError::could_not_retrieve(id, "HTTP 403")));

        let mut second = MockTranscriptSource::new();
        second.expect_name().return_const("second");
        second
            .expect_fetch_segments()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(segments(&["Hi", "there"])));

        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(first), Box::new(second)]);
        assert_eq!(fetcher.source_names(), vec!["first", "second"]);

        let outcome = fetcher.fetch(&video(), &[]).await.unwrap();
        assert_eq!(outcome.transcript().map(|t| t.as_str()), Some("Hi there"));
    }

    #[tokio::test]
    async fn test_confirmed_unavailable_stops_the_fallback() {
        let first = source_returning(|| {
            Err(TranscriptError::TranscriptsDisabled("abc12345678".to_string()))
        });

        let mut second = MockTranscriptSource::new();
        second.expect_name().return_const("second");
        second.expect_fetch_segments().times(0);

        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(first), Box::new(second)]);
        let outcome = fetcher.fetch(&video(), &[]).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_refusal_outranks_later_transport_fault() {
        let first = source_returning(|| {
            Err(TranscriptError::CouldNotRetrieve {
                video_id: "abc12345678".to_string(),
                reason: "age restricted".to_string(),
            })
        });
        let second = source_returning(|| {
            Err(TranscriptError::Transport {
                video_id: "abc12345678".to_string(),
                reason: "empty body".to_string(),
            })
        });

        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(first), Box::new(second)]);
        let outcome = fetcher.fetch(&video(), &[]).await.unwrap();
        match outcome {
            FetchOutcome::Unavailable { reason } => assert!(reason.contains("age restricted")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_first_success_skips_remaining_sources() {
        let first = source_returning(|| Ok(segments(&["only"])));

        let mut second = MockTranscriptSource::new();
        second.expect_name().return_const("second");
        second.expect_fetch_segments().times(0);

        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(first), Box::new(second)]);
        let outcome = fetcher.fetch(&video(), &[]).await.unwrap();
        assert_eq!(outcome.transcript().map(|t| t.as_str()), Some("only"));
    }

    #[tokio::test]
    async fn test_default_language_when_none_given() {
        let mut source = MockTranscriptSource::new();
        source.expect_name().return_const("mock");
        source
            .expect_fetch_segments()
            .withf(|_, languages| languages.len() == 1 && languages[0] == "en")
            .times(1)
            .returning(|_, _| Ok(segments(&["hello"])));

        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(source)]);
        assert!(fetcher.fetch(&video(), &[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_successful_fetch_is_memoized() {
        let fetcher = TranscriptFetcher::with_sources(vec![Box::new(source_returning(|| {
            Ok(segments(&["cached", "text"]))
        }))]);

        let first = fetcher.fetch(&video(), &[]).await.unwrap();
        let second = fetcher.fetch(&video(), &[]).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(
            fetcher.cached(&video()).map(|t| t.into_string()),
            Some("cached text".to_string())
        );
    }

    #[tokio::test]
    async fn test_no_sources_is_unavailable() {
        let fetcher = TranscriptFetcher::with_sources(Vec::new());
        let outcome = fetcher.fetch(&video(), &[]).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Unavailable { .. }));
    }

    #[test]
    fn test_default_fetcher_source_order() {
        let fetcher = TranscriptFetcher::new().unwrap();
        assert_eq!(fetcher.source_names(), vec!["direct", "track-list"]);
    }
}

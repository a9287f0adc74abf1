use async_trait::async_trait;
use reqwest::Client;
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};
use yt_transcript_rs::FetchedTranscript;

use super::{Segment, TranscriptError, TranscriptSource};
use crate::video::VideoId;

/// Build the provider client shared by the YouTube sources
pub fn transcript_api() -> Result<YouTubeTranscriptApi, TranscriptError> {
    YouTubeTranscriptApi::new(None, None, None)
        .map_err(|e| TranscriptError::ClientSetup(e.to_string()))
}

/// One-call lookup: the provider picks the first matching language
pub struct DirectSource {
    api: YouTubeTranscriptApi,
}

impl DirectSource {
    pub fn new(api: YouTubeTranscriptApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TranscriptSource for DirectSource {
    async fn fetch_segments(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<Segment>, TranscriptError> {
        let langs = language_refs(languages);

        let transcript = self
            .api
            .fetch_transcript(video_id.as_str(), &langs, false)
            .await
            .map_err(|e| classify(video_id, languages, e))?;

        Ok(into_segments(transcript))
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Lists the caption tracks first, then downloads the best match
pub struct TrackListSource {
    api: YouTubeTranscriptApi,
    client: Client,
}

impl TrackListSource {
    pub fn new(api: YouTubeTranscriptApi, client: Client) -> Self {
        Self { api, client }
    }
}

#[async_trait]
impl TranscriptSource for TrackListSource {
    async fn fetch_segments(
        &self,
        video_id: &VideoId,
        languages: &[String],
    ) -> Result<Vec<Segment>, TranscriptError> {
        let langs = language_refs(languages);

        let tracks = self
            .api
            .list_transcripts(video_id.as_str())
            .await
            .map_err(|e| classify(video_id, languages, e))?;

        // manual tracks win over generated ones for the same language
        let track = tracks
            .find_transcript(&langs)
            .map_err(|e| classify(video_id, languages, e))?;

        tracing::debug!(
            "Selected {} track ({}, generated: {}) for {}",
            track.language(),
            track.language_code(),
            track.is_generated(),
            video_id
        );

        let transcript = track
            .fetch(&self.client, false)
            .await
            .map_err(|e| classify(video_id, languages, e))?;

        Ok(into_segments(transcript))
    }

    fn name(&self) -> &'static str {
        "track-list"
    }
}

fn language_refs(languages: &[String]) -> Vec<&str> {
    languages.iter().map(String::as_str).collect()
}

fn into_segments(transcript: FetchedTranscript) -> Vec<Segment> {
    transcript
        .snippets
        .into_iter()
        .map(|snippet| Segment::new(snippet.start, snippet.duration, snippet.text))
        .collect()
}

/// Map a provider failure onto our transcript error classes
pub(crate) fn classify(
    video_id: &VideoId,
    languages: &[String],
    error: CouldNotRetrieveTranscript,
) -> TranscriptError {
    let id = video_id.to_string();

    match &error.reason {
        Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled) => {
            TranscriptError::TranscriptsDisabled(id)
        }
        Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
            TranscriptError::NoTranscriptFound {
                video_id: id,
                languages: languages.to_vec(),
            }
        }
        Some(CouldNotRetrieveTranscriptReason::VideoUnavailable) => {
            TranscriptError::VideoUnavailable(id)
        }
        Some(CouldNotRetrieveTranscriptReason::InvalidVideoId) => {
            TranscriptError::InvalidVideoId(id)
        }
        Some(CouldNotRetrieveTranscriptReason::YouTubeRequestFailed(..)) => {
            TranscriptError::Transport {
                video_id: id,
                reason: error.to_string(),
            }
        }
        _ => TranscriptError::CouldNotRetrieve {
            video_id: id,
            reason: error.to_string(),
        },
    }
}

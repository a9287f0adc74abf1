use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub mod client;
pub mod platform;
pub mod response;

pub use platform::Platform;

use crate::config::GenerationConfig;
use crate::transcript::TranscriptText;
use crate::ContentError;

/// Start of every diagnostic placeholder
pub const PLACEHOLDER_PREFIX: &str = "[Generation request failed: ";

/// Marker contained in the placeholder for quota and rate-limit failures
pub const QUOTA_MARKER: &str = "rate limit or insufficient quota";

/// Failures reported by a generation backend
#[derive(thiserror::Error, Debug)]
pub enum GenerationError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A single, non-streaming completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub max_output_tokens: u32,
}

/// Text-generation service the generator talks to
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send one user message and return the raw reply document
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, GenerationError>;
}

/// Everything needed to write one platform's post
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub transcript: &'a TranscriptText,
    pub platform: Platform,
    pub intent: Option<&'a str>,
}

impl<'a> GenerationRequest<'a> {
    pub fn new(transcript: &'a TranscriptText, platform: Platform, intent: Option<&'a str>) -> Self {
        Self {
            transcript,
            platform,
            intent: intent.map(str::trim).filter(|intent| !intent.is_empty()),
        }
    }

    /// Render the prompt sent to the model
    pub fn prompt(&self) -> String {
        let mut prompt = String::new();

        if let Some(intent) = self.intent {
            prompt.push_str(intent);
            prompt.push_str("\n\n");
        }

        prompt.push_str("Here is the video transcript:\n");
        prompt.push_str(self.transcript.as_str());
        prompt.push_str("\n\n");
        prompt.push_str(&format!(
            "Generate engaging content suitable for {} based on this transcript. {}",
            self.platform.label(),
            self.platform.style_hint()
        ));

        prompt
    }
}

/// How a platform's generation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Generated,
    QuotaExceeded,
    Failed,
}

/// Generated post, or a diagnostic placeholder when generation failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub platform: Platform,
    pub content: String,
    pub status: GenerationStatus,
}

impl GenerationResult {
    pub fn is_generated(&self) -> bool {
        self.status == GenerationStatus::Generated
    }
}

/// Placeholder text shown instead of content for a failed generation
pub fn placeholder(error: &ContentError) -> String {
    format!("{}{}]", PLACEHOLDER_PREFIX, error)
}

/// Writes platform-specific posts from a transcript
pub struct ContentGenerator {
    backend: Arc<dyn GenerationBackend>,
    model: String,
    max_output_tokens: u32,
}

impl ContentGenerator {
    /// Build a generator for the configured HTTP API; fails when no API key is set
    pub fn new(config: &GenerationConfig) -> Result<Self, ContentError> {
        let api_key = config.require_api_key()?;
        let backend = client::OpenAiBackend::new(&config.base_url, api_key, config.api_style);

        Ok(Self::with_backend(
            Arc::new(backend),
            config.model.clone(),
            config.max_output_tokens,
        ))
    }

    pub fn with_backend(
        backend: Arc<dyn GenerationBackend>,
        model: impl Into<String>,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            backend,
            model: model.into(),
            max_output_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate content for one platform; failures become placeholders
    pub async fn generate(
        &self,
        transcript: &TranscriptText,
        platform: Platform,
        intent: Option<&str>,
    ) -> GenerationResult {
        self.generate_request(&GenerationRequest::new(transcript, platform, intent))
            .await
    }

    pub async fn generate_request(&self, request: &GenerationRequest<'_>) -> GenerationResult {
        let platform = request.platform;
        tracing::info!("Generating content for {}", platform);

        let completion = CompletionRequest {
            model: self.model.clone(),
            prompt: request.prompt(),
            max_output_tokens: self.max_output_tokens,
        };

        match self.backend.complete(&completion).await {
            Ok(reply) => GenerationResult {
                platform,
                content: response::extract_text(&reply),
                status: GenerationStatus::Generated,
            },
            Err(GenerationError::RateLimited(detail)) => {
                tracing::warn!("Rate limit / quota error for {}: {}", platform, detail);
                GenerationResult {
                    platform,
                    content: placeholder(&ContentError::GenerationQuotaExceeded),
                    status: GenerationStatus::QuotaExceeded,
                }
            }
            Err(e) => {
                tracing::warn!("Generation failed for {}: {}", platform, e);
                GenerationResult {
                    platform,
                    content: placeholder(&ContentError::GenerationFailed(e.to_string())),
                    status: GenerationStatus::Failed,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transcript() -> TranscriptText {
        TranscriptText::new("Hi there").unwrap()
    }

    fn generator(backend: MockGenerationBackend) -> ContentGenerator {
        ContentGenerator::with_backend(Arc::new(backend), "test-model", 2500)
    }

    #[test]
    fn test_prompt_template_with_intent() {
        let text = transcript();
        let prompt = GenerationRequest::new(&text, Platform::LinkedIn, Some("  summarize ")).prompt();

        assert!(prompt.starts_with("summarize\n\nHere is the video transcript:\nHi there\n\n"));
        assert!(prompt.contains("Generate engaging content suitable for LinkedIn based on this transcript."));
        assert!(prompt.ends_with(Platform::LinkedIn.style_hint()));
    }

    #[test]
    fn test_prompt_template_without_intent() {
        let text = transcript();
        for intent in [None, Some(""), Some("   ")] {
            let prompt = GenerationRequest::new(&text, Platform::Reddit, intent).prompt();
            assert!(prompt.starts_with("Here is the video transcript:\nHi there"));
            assert!(prompt.contains("suitable for Reddit"));
        }
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_and_token_budget() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_complete()
            .withf(|request| {
                request.model == "test-model"
                    && request.max_output_tokens == 2500
                    && request.prompt.contains("summarize")
                    && request.prompt.contains("Hi there")
                    && request.prompt.contains("LinkedIn")
            })
            .times(1)
            .returning(|_| Ok(json!({"output_text": "Great post!"})));

        let result = generator(backend)
            .generate(&transcript(), Platform::LinkedIn, Some("summarize"))
            .await;

        assert_eq!(result.content, "Great post!");
        assert_eq!(result.status, GenerationStatus::Generated);
        assert!(result.is_generated());
    }

    #[tokio::test]
    async fn test_quota_failure_yields_marker_placeholder() {
        let mut backend = MockGenerationBackend::new();
        backend
            .expect_complete()
            .returning(|_| Err(GenerationError::RateLimited("quota".to_string())));

        let result = generator(backend)
            .generate(&transcript(), Platform::Instagram, None)
            .await;

        assert_eq!(result.status, GenerationStatus::QuotaExceeded);
        assert!(result.content.starts_with(PLACEHOLDER_PREFIX));
        assert!(result.content.contains(QUOTA_MARKER));
        assert_eq!(result.platform, Platform::Instagram);
    }

    #[tokio::test]
    async fn test_other_failure_embeds_detail() {
        let mut backend = MockGenerationBackend::new();
        backend.expect_complete().returning(|_| {
            Err(GenerationError::Api {
                status: 500,
                message: "model overloaded".to_string(),
            })
        });

        let result = generator(backend)
            .generate(&transcript(), Platform::Blog, None)
            .await;

        assert_eq!(result.status, GenerationStatus::Failed);
        assert_eq!(
            result.content,
            "[Generation request failed: API returned HTTP 500: model overloaded]"
        );
        assert!(!result.content.contains(QUOTA_MARKER));
    }

    #[test]
    fn test_new_requires_api_key() {
        let config = GenerationConfig::default();
        assert!(matches!(
            ContentGenerator::new(&config),
            Err(ContentError::MissingApiKey { .. })
        ));

        let config = GenerationConfig {
            api_key: Some("test-key".to_string()),
            ..GenerationConfig::default()
        };
        let generator = ContentGenerator::new(&config).unwrap();
        assert_eq!(generator.model(), config.model);
    }
}

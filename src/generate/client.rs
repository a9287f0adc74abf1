use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::{CompletionRequest, GenerationBackend, GenerationError};
use crate::config::ApiStyle;

/// Longest error body kept in error messages
const MAX_ERROR_BODY: usize = 500;

/// Backend for OpenAI-compatible HTTP APIs (OpenAI, Groq, ...)
pub struct OpenAiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    api_style: ApiStyle,
}

impl OpenAiBackend {
    pub fn new(base_url: &str, api_key: impl Into<String>, api_style: ApiStyle) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_style,
        }
    }

    fn endpoint(&self) -> String {
        match self.api_style {
            ApiStyle::Responses => format!("{}/responses", self.base_url),
            ApiStyle::ChatCompletions => format!("{}/chat/completions", self.base_url),
        }
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let messages = json!([{ "role": "user", "content": request.prompt }]);

        match self.api_style {
            ApiStyle::Responses => json!({
                "model": request.model,
                "input": messages,
                "max_output_tokens": request.max_output_tokens,
            }),
            ApiStyle::ChatCompletions => json!({
                "model": request.model,
                "messages": messages,
                "max_tokens": request.max_output_tokens,
            }),
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, GenerationError> {
        let endpoint = self.endpoint();
        tracing::debug!("POST {} (model: {})", endpoint, request.model);

        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        Ok(parse_reply(body))
    }
}

/// Reply document of a successful call; non-JSON bodies become a plain string
fn parse_reply(body: String) -> Value {
    match serde_json::from_str(&body) {
        Ok(reply) => reply,
        Err(_) => Value::String(body),
    }
}

/// Turn an unsuccessful HTTP reply into a typed error
pub fn classify_failure(status: StatusCode, body: &str) -> GenerationError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    let message = parsed
        .as_ref()
        .and_then(|v| v.pointer("/error/message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY).collect());

    let quota_hint = |text: &str| text.contains("insufficient_quota") || text.contains("rate_limit");

    if status == StatusCode::TOO_MANY_REQUESTS
        || quota_hint(error_field(parsed.as_ref(), "code"))
        || quota_hint(error_field(parsed.as_ref(), "type"))
        || quota_hint(&message)
    {
        GenerationError::RateLimited(message)
    } else {
        GenerationError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// String value of `error.{name}`; empty when missing or not a string
fn error_field<'a>(parsed: Option<&'a Value>, name: &str) -> &'a str {
    parsed
        .and_then(|v| v.get("error"))
        .and_then(|error| error.get(name))
        .and_then(Value::as_str)
        .unwrap_or("")
}

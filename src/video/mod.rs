use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::ContentError;

/// Length of a YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

/// Path prefixes that carry the identifier as the following segment
const ID_PATH_PREFIXES: &[&str] = &["embed", "v", "shorts", "live"];

/// Canonical YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Accept a bare identifier only
    pub fn parse(token: &str) -> Result<Self, ContentError> {
        if is_valid_token(token) {
            Ok(Self(token.to_string()))
        } else {
            Err(ContentError::InvalidInput(format!(
                "'{}' is not a valid video ID (expected {} characters of A-Z, a-z, 0-9, '-' or '_')",
                token, VIDEO_ID_LEN
            )))
        }
    }

    /// Resolve user input (watch, short-link or embed URL, or a bare ID) into a canonical ID
    pub fn resolve(raw: &str) -> Result<Self, ContentError> {
        let input = raw.trim();

        if input.is_empty() {
            return Err(ContentError::InvalidInput(
                "video URL or ID must not be empty".to_string(),
            ));
        }

        if is_valid_token(input) {
            return Ok(Self(input.to_string()));
        }

        let token = extract_from_url(input).ok_or_else(|| {
            ContentError::InvalidInput(format!("could not find a video ID in '{}'", input))
        })?;

        Self::parse(&token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Watch page URL for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for VideoId {
    type Error = ContentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

fn is_valid_token(token: &str) -> bool {
    token.len() == VIDEO_ID_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_youtube_host(host: &str) -> bool {
    let host = host.trim_start_matches("www.");
    matches!(
        host,
        "youtube.com" | "m.youtube.com" | "music.youtube.com" | "youtube-nocookie.com"
    )
}

/// Pull the raw identifier component out of a YouTube URL without validating it
fn extract_from_url(input: &str) -> Option<String> {
    let lower = input.to_lowercase();
    let url_str = if lower.starts_with("http://") || lower.starts_with("https://") {
        input.to_string()
    } else if lower.contains("youtube.com") || lower.contains("youtu.be") {
        format!("https://{}", input)
    } else {
        return None;
    };

    let url = Url::parse(&url_str).ok()?;
    let host = url.host_str()?.to_lowercase();

    if host == "youtu.be" || host == "www.youtu.be" {
        return url
            .path_segments()
            .and_then(|mut segments| segments.next())
            .filter(|segment| !segment.is_empty())
            .map(|segment| segment.to_string());
    }

    if !is_youtube_host(&host) {
        return None;
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    match segments.as_slice() {
        ["watch", ..] => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty()),
        [prefix, id, ..] if ID_PATH_PREFIXES.contains(prefix) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn test_all_url_shapes_resolve_to_same_id() {
        let inputs = [
            "dQw4w9WgXcQ",
            "  dQw4w9WgXcQ  ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120s&list=PL123",
            "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=VSFea_rMwtaiR8Q7",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ?start=10",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/live/dQw4w9WgXcQ?feature=shared",
        ];

        for input in inputs {
            let id = VideoId::resolve(input).unwrap_or_else(|e| panic!("{}: {}", input, e));
            assert_eq!(id.as_str(), ID, "input: {}", input);
        }
    }

    #[test]
    fn test_empty_input_is_invalid() {
        assert!(matches!(VideoId::resolve(""), Err(ContentError::InvalidInput(_))));
        assert!(matches!(VideoId::resolve("   "), Err(ContentError::InvalidInput(_))));
    }

    #[test]
    fn test_tokenless_input_is_invalid() {
        let inputs = [
            "hello world",
            "https://www.youtube.com/",
            "https://www.youtube.com/watch?list=PL123",
            "https://www.youtube.com/channel/UCxyz",
            "https://youtu.be/",
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://www.youtube.com/watch?v=tooshort",
            "dQw4w9WgXc!",
        ];

        for input in inputs {
            assert!(
                matches!(VideoId::resolve(input), Err(ContentError::InvalidInput(_))),
                "input should be invalid: {}",
                input
            );
        }
    }

    #[test]
    fn test_parse_rejects_urls() {
        assert!(VideoId::parse("abc12345678").is_ok());
        assert!(VideoId::parse("https://youtu.be/dQw4w9WgXcQ").is_err());
    }

    #[test]
    fn test_watch_url() {
        let id = VideoId::parse(ID).unwrap();
        assert_eq!(id.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(id.to_string(), ID);
    }

    #[test]
    fn test_serde_validates() {
        let id: VideoId = serde_json::from_str("\"dQw4w9WgXcQ\"").unwrap();
        assert_eq!(id.as_str(), ID);
        assert!(serde_json::from_str::<VideoId>("\"nope\"").is_err());
    }
}

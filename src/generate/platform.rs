use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContentError;

/// Social media platforms content can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "LinkedIn")]
    LinkedIn,
    #[serde(rename = "Instagram")]
    Instagram,
    #[serde(rename = "Twitter/X")]
    TwitterX,
    #[serde(rename = "Facebook")]
    Facebook,
    #[serde(rename = "YouTube Community Post")]
    YoutubeCommunityPost,
    #[serde(rename = "Reddit")]
    Reddit,
    #[serde(rename = "Blog")]
    Blog,
}

impl Platform {
    /// Every platform, in display order
    pub const ALL: [Platform; 7] = [
        Platform::LinkedIn,
        Platform::Instagram,
        Platform::TwitterX,
        Platform::Facebook,
        Platform::YoutubeCommunityPost,
        Platform::Reddit,
        Platform::Blog,
    ];

    /// Label shown to users and embedded in prompts
    pub fn label(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
            Platform::TwitterX => "Twitter/X",
            Platform::Facebook => "Facebook",
            Platform::YoutubeCommunityPost => "YouTube Community Post",
            Platform::Reddit => "Reddit",
            Platform::Blog => "Blog",
        }
    }

    /// Platform-specific writing guidance appended to the prompt
    pub fn style_hint(&self) -> &'static str {
        match self {
            Platform::LinkedIn => {
                "Use a professional tone, open with a strong hook and finish with a few relevant hashtags."
            }
            Platform::Instagram => {
                "Write a lively caption with emojis, a call to action and a block of relevant hashtags."
            }
            Platform::TwitterX => {
                "Keep every post under 280 characters; a short numbered thread is fine."
            }
            Platform::Facebook => "Use a conversational tone that invites comments and shares.",
            Platform::YoutubeCommunityPost => {
                "Write a short community update that teases the video and asks viewers a question."
            }
            Platform::Reddit => {
                "Write an informative, non-promotional post with a descriptive title and a discussion prompt."
            }
            Platform::Blog => {
                "Write a structured article with a title, section headings and a short conclusion."
            }
        }
    }

    /// Lowercase alphanumeric spellings accepted when parsing
    fn keys(&self) -> &'static [&'static str] {
        match self {
            Platform::LinkedIn => &["linkedin"],
            Platform::Instagram => &["instagram", "ig"],
            Platform::TwitterX => &["twitterx", "twitter", "x"],
            Platform::Facebook => &["facebook", "fb"],
            Platform::YoutubeCommunityPost => &[
                "youtubecommunitypost",
                "youtubecommunity",
                "youtube",
                "community",
            ],
            Platform::Reddit => &["reddit"],
            Platform::Blog => &["blog", "blogpost"],
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Platform {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        Platform::ALL
            .iter()
            .copied()
            .find(|platform| platform.keys().contains(&key.as_str()))
            .ok_or_else(|| {
                let supported: Vec<&str> = Platform::ALL.iter().map(|p| p.label()).collect();
                ContentError::InvalidInput(format!(
                    "unknown platform '{}' (supported: {})",
                    s,
                    supported.join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for platform in Platform::ALL {
            assert_eq!(platform.label().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_aliases() {
        assert_eq!("twitter".parse::<Platform>().unwrap(), Platform::TwitterX);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::TwitterX);
        assert_eq!("linked-in".parse::<Platform>().unwrap(), Platform::LinkedIn);
        assert_eq!(
            "youtube-community".parse::<Platform>().unwrap(),
            Platform::YoutubeCommunityPost
        );
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(ContentError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Platform::TwitterX).unwrap(),
            "\"Twitter/X\""
        );
    }
}

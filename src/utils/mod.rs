use anyhow::Result;
use url::Url;

/// Validate a URL and return normalized version
pub fn validate_and_normalize_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|_| anyhow::anyhow!("Invalid URL format: {}", url))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    Ok(parsed.to_string())
}

/// First `max_chars` characters of `text`, with an ellipsis when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();

    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Parse language code and return the form YouTube uses for caption tracks
pub fn normalize_language_code(lang: &str) -> String {
    let lang = lang.trim();

    // Common language name mappings
    let normalized = match lang.to_lowercase().as_str() {
        "english" => "en",
        "spanish" => "es",
        "french" => "fr",
        "german" => "de",
        "italian" => "it",
        "portuguese" => "pt",
        "japanese" => "ja",
        "korean" => "ko",
        "chinese" => "zh-Hans",
        "arabic" => "ar",
        "hindi" => "hi",
        "russian" => "ru",
        _ => return normalize_code_case(lang),
    };

    normalized.to_string()
}

/// `EN-us` -> `en-US`, `zh-hans` -> `zh-Hans`
fn normalize_code_case(code: &str) -> String {
    let mut parts = code.split(['-', '_']);
    let primary = parts.next().unwrap_or_default().to_lowercase();

    let rest: Vec<String> = parts
        .map(|part| match part.len() {
            2 => part.to_uppercase(),
            4 => {
                let mut chars = part.chars();
                chars
                    .next()
                    .map(|first| {
                        first
                            .to_uppercase()
                            .chain(chars.flat_map(char::to_lowercase))
                            .collect::<String>()
                    })
                    .unwrap_or_default()
            }
            _ => part.to_string(),
        })
        .collect();

    std::iter::once(primary)
        .chain(rest)
        .collect::<Vec<_>>()
        .join("-")
}

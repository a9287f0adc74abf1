//! Best-effort extraction of generated text from the many reply shapes
//! OpenAI-compatible services produce.

use serde_json::Value;

/// Deepest nesting the `output` walker will descend into
const MAX_DEPTH: usize = 8;

/// Rendering used when the reply is an empty body
const EMPTY_REPLY: &str = "[empty response from generation service]";

/// Plain text of a generation reply; never empty
pub fn extract_text(reply: &Value) -> String {
    direct_text(reply)
        .or_else(|| output_text(reply))
        .or_else(|| choices_text(reply))
        .unwrap_or_else(|| render_raw(reply))
}

/// Top-level `output_text` field
fn direct_text(reply: &Value) -> Option<String> {
    reply
        .get("output_text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Text of the `output` field, space-joined.
///
/// When output items carry a `type` tag only `message` items and their
/// `output_text` parts count, so reasoning traces stay out of the post.
fn output_text(reply: &Value) -> Option<String> {
    let output = reply.get("output")?;

    let mut parts = Vec::new();
    match output.as_array() {
        Some(items) if items.iter().any(|item| item_type(item).is_some()) => {
            for item in items.iter().filter(|item| item_type(item) == Some("message")) {
                collect_message(item, &mut parts);
            }
        }
        _ => collect_text(output, 0, &mut parts),
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn item_type(value: &Value) -> Option<&str> {
    value.get("type").and_then(Value::as_str)
}

fn collect_message<'a>(item: &'a Value, parts: &mut Vec<&'a str>) {
    match item.get("content") {
        Some(Value::Array(content)) => {
            for part in content {
                if matches!(item_type(part), None | Some("output_text")) {
                    collect_text(part, 2, parts);
                }
            }
        }
        Some(content) => collect_text(content, 2, parts),
        None => collect_text(item, 1, parts),
    }
}

fn collect_text<'a>(value: &'a Value, depth: usize, parts: &mut Vec<&'a str>) {
    if depth > MAX_DEPTH {
        return;
    }

    match value {
        Value::String(text) if !text.is_empty() => parts.push(text),
        Value::Array(items) => {
            for item in items {
                collect_text(item, depth + 1, parts);
            }
        }
        Value::Object(map) => {
            if let Some(text) = map.get("text").and_then(Value::as_str) {
                if !text.is_empty() {
                    parts.push(text);
                }
            } else if let Some(content) = map.get("content") {
                collect_text(content, depth + 1, parts);
            }
        }
        _ => {}
    }
}

/// Chat-completions shape: `choices[*].message.content`
fn choices_text(reply: &Value) -> Option<String> {
    let parts: Vec<&str> = reply
        .get("choices")?
        .as_array()?
        .iter()
        .filter_map(|choice| choice.pointer("/message/content").and_then(Value::as_str))
        .filter(|text| !text.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// String rendering of the whole reply
fn render_raw(reply: &Value) -> String {
    let rendered = match reply {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };

    if rendered.trim().is_empty() {
        EMPTY_REPLY.to_string()
    } else {
        rendered
    }
}

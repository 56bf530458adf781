//! Searchable-text extraction from opaque payloads.
//!
//! The store never interprets a payload except here. Extraction walks the
//! content generator's well-known shape — `data.title`, `data.summary`,
//! then each `data.sections[]` entry's `title` and `content`, in that
//! order — and falls back to `payload.content`, then to the payload itself,
//! for anything else. The result is capped at
//! [`SEARCHABLE_TEXT_BUDGET`](super::types::SEARCHABLE_TEXT_BUDGET) chars.

use serde_json::Value;

use super::truncate_chars;
use super::types::SEARCHABLE_TEXT_BUDGET;

/// Fields lifted from a payload when a document is stored or updated.
#[derive(Debug)]
pub struct ExtractedContent {
    /// Caller-supplied id (`data.contentId`), if any.
    pub content_id: Option<String>,
    /// Category tag (`data.contentType`), if any.
    pub content_type: Option<String>,
    /// Display title, `"Untitled"` when absent.
    pub title: String,
    /// Flattened text for embedding and previews.
    pub searchable_text: String,
}

/// Extract the indexable fields from a payload.
pub fn extract(payload: &Value) -> ExtractedContent {
    let data = payload.get("data").filter(|d| d.is_object());

    let content_id = data
        .and_then(|d| d.get("contentId"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let content_type = data
        .and_then(|d| d.get("contentType"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let title = data
        .and_then(|d| d.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("Untitled")
        .to_string();

    ExtractedContent {
        content_id,
        content_type,
        title,
        searchable_text: searchable_text(payload),
    }
}

/// Flatten a payload into searchable text.
///
/// Precedence: a payload that is already a string is taken verbatim; a
/// `data` object contributes title, summary, then section titles and
/// bodies in document order; a `content` field is stringified; anything
/// else is serialized whole as compact JSON.
fn searchable_text(payload: &Value) -> String {
    if let Value::String(text) = payload {
        return truncate_chars(text, SEARCHABLE_TEXT_BUDGET);
    }

    if let Some(data) = payload.get("data").filter(|d| d.is_object()) {
        let mut parts: Vec<&str> = Vec::new();
        push_text(&mut parts, data.get("title"));
        push_text(&mut parts, data.get("summary"));
        if let Some(sections) = data.get("sections").and_then(Value::as_array) {
            for section in sections {
                push_text(&mut parts, section.get("title"));
                push_text(&mut parts, section.get("content"));
            }
        }
        if !parts.is_empty() {
            return truncate_chars(&parts.join(" "), SEARCHABLE_TEXT_BUDGET);
        }
    }

    if let Some(content) = payload.get("content") {
        return truncate_chars(&stringify(content), SEARCHABLE_TEXT_BUDGET);
    }

    truncate_chars(&payload.to_string(), SEARCHABLE_TEXT_BUDGET)
}

fn push_text<'a>(parts: &mut Vec<&'a str>, value: Option<&'a Value>) {
    if let Some(text) = value.and_then(Value::as_str) {
        if !text.is_empty() {
            parts.push(text);
        }
    }
}

/// Plain strings stay as-is; everything else becomes compact JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_generator_shape_in_order() {
        let payload = json!({
            "data": {
                "title": "Sleep Tech",
                "summary": "Smart mattress AI",
                "sections": [
                    {"title": "Intro", "content": "Welcome to sleep tech."},
                    {"title": "Outlook", "content": "The future is restful."}
                ]
            }
        });
        let extracted = extract(&payload);
        assert_eq!(extracted.title, "Sleep Tech");
        assert_eq!(
            extracted.searchable_text,
            "Sleep Tech Smart mattress AI Intro Welcome to sleep tech. Outlook The future is restful."
        );
    }

    #[test]
    fn lifts_content_id_and_type() {
        let payload = json!({
            "data": {"contentId": "ai_content_42", "contentType": "blog_post", "title": "T"}
        });
        let extracted = extract(&payload);
        assert_eq!(extracted.content_id.as_deref(), Some("ai_content_42"));
        assert_eq!(extracted.content_type.as_deref(), Some("blog_post"));
    }

    #[test]
    fn missing_title_defaults_to_untitled() {
        let extracted = extract(&json!({"data": {"summary": "just a summary"}}));
        assert_eq!(extracted.title, "Untitled");
        assert_eq!(extracted.searchable_text, "just a summary");
    }

    #[test]
    fn string_payload_is_taken_verbatim() {
        let extracted = extract(&json!("raw text payload"));
        assert_eq!(extracted.searchable_text, "raw text payload");
        assert_eq!(extracted.title, "Untitled");
    }

    #[test]
    fn content_field_fallback() {
        let extracted = extract(&json!({"content": "body text"}));
        assert_eq!(extracted.searchable_text, "body text");

        // Non-string content is stringified
        let extracted = extract(&json!({"content": {"nested": true}}));
        assert_eq!(extracted.searchable_text, r#"{"nested":true}"#);
    }

    #[test]
    fn unknown_shape_is_serialized_whole() {
        let extracted = extract(&json!({"foo": 1}));
        assert_eq!(extracted.searchable_text, r#"{"foo":1}"#);
    }

    #[test]
    fn empty_data_object_falls_through() {
        let extracted = extract(&json!({"data": {}, "content": "fallback body"}));
        assert_eq!(extracted.searchable_text, "fallback body");
    }

    #[test]
    fn searchable_text_is_capped() {
        let long = "x".repeat(SEARCHABLE_TEXT_BUDGET + 500);
        let extracted = extract(&json!({"data": {"summary": long}}));
        assert_eq!(extracted.searchable_text.len(), SEARCHABLE_TEXT_BUDGET);
    }
}

//! Metadata block stored inside a PR body
//!
//! GitHub has no per-issue key-value store, so values live as JSON in a
//! hidden HTML comment appended to the PR description:
//!
//! ```text
//! <!-- semantic-pr = {"locked_bc_merge_conflict":true} -->
//! ```

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static METADATA_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\n*<!-- semantic-pr = (?P<json>\{.*?\}) -->").expect("Invalid regex")
});

/// Parse the metadata block out of a body. Missing or corrupt blocks are empty.
pub fn extract_metadata(body: &str) -> Map<String, Value> {
    METADATA_REGEX
        .captures(body)
        .and_then(|caps| serde_json::from_str::<Map<String, Value>>(&caps["json"]).ok())
        .unwrap_or_default()
}

/// Body text with the metadata block removed
pub fn strip_metadata(body: &str) -> String {
    METADATA_REGEX.replace_all(body, "").trim_end().to_string()
}

/// Replace any metadata block in `body` with `metadata`
pub fn embed_metadata(body: &str, metadata: &Map<String, Value>) -> String {
    let body = strip_metadata(body);
    if metadata.is_empty() {
        return body;
    }
    let json = Value::Object(metadata.clone()).to_string();
    if body.is_empty() {
        format!("<!-- semantic-pr = {json} -->")
    } else {
        format!("{body}\n\n<!-- semantic-pr = {json} -->")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_extract_from_plain_body() {
        assert!(extract_metadata("## Features\n\n* thing").is_empty());
    }

    #[test]
    fn test_embed_then_extract() {
        let meta = map(json!({"locked_bc_merge_conflict": true}));
        let body = embed_metadata("## Features\n\n* thing", &meta);
        assert!(body.starts_with("## Features\n\n* thing\n\n<!-- semantic-pr = "));
        assert_eq!(extract_metadata(&body), meta);
        assert_eq!(strip_metadata(&body), "## Features\n\n* thing");
    }

    #[test]
    fn test_embed_replaces_existing_block() {
        let first = embed_metadata("body", &map(json!({"a": 1})));
        let second = embed_metadata(&first, &map(json!({"a": 2})));
        assert_eq!(second.matches("<!-- semantic-pr").count(), 1);
        assert_eq!(extract_metadata(&second)["a"], json!(2));
    }

    #[test]
    fn test_embed_into_empty_body() {
        let body = embed_metadata("", &map(json!({"k": false})));
        assert_eq!(body, "<!-- semantic-pr = {\"k\":false} -->");
    }

    #[test]
    fn test_empty_metadata_leaves_body_clean() {
        assert_eq!(embed_metadata("text", &Map::new()), "text");
    }

    #[test]
    fn test_corrupt_block_reads_as_empty() {
        assert!(extract_metadata("x\n\n<!-- semantic-pr = {nope} -->").is_empty());
    }
}

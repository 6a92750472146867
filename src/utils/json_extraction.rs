//! JSON extraction utilities for parsing LLM responses.
//!
//! Completions often arrive wrapped in markdown or surrounded by prose.
//!
//! # Extraction Strategies
//!
//! The extraction functions try the following strategies in order:
//! 1. Direct JSON (the whole trimmed content parses)
//! 2. The first fenced code block, with or without a `json` tag
//!
//! Nothing else is attempted: a response that passes neither is rejected
//! rather than guessed at.
//!
//! # Example
//!
//! ```
//! use launchpad::utils::json_extraction::parse_structured;
//!
//! let response = "Sure!\n```json\n{\"blurb\": \"A todo app\"}\n```";
//! let value: serde_json::Value = parse_structured(response).unwrap();
//! assert_eq!(value["blurb"], "A todo app");
//! ```

use std::sync::OnceLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;

const PREVIEW_CHARS: usize = 80;

/// Error type for JSON extraction failures
#[derive(Debug, Clone, Error, PartialEq)]
pub enum JsonExtractionError {
    #[error("No JSON content found in response. Content starts with: '{content_preview}'")]
    NotFound { content_preview: String },

    #[error("JSON does not match the expected shape: {message}")]
    Mismatch { message: String },
}

fn fenced_block_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"```(?:json)?\s*([\s\S]*?)\s*```").expect("fenced block pattern is valid")
    })
}

/// Return the contents of the first fenced code block, if any.
///
/// The opening fence may carry a `json` tag; the contents are trimmed.
pub fn extract_fenced_block(content: &str) -> Option<&str> {
    fenced_block_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn preview(content: &str) -> String {
    content.trim().chars().take(PREVIEW_CHARS).collect()
}

/// Parse a completion as `T`.
///
/// Tries the whole content first, then the first fenced block. When the
/// content is valid JSON of the wrong shape, the error says so instead of
/// reporting that nothing was found.
pub fn parse_structured<T: DeserializeOwned>(content: &str) -> Result<T, JsonExtractionError> {
    let direct = serde_json::from_str::<T>(content.trim());
    let direct_err = match direct {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    if let Some(block) = extract_fenced_block(content) {
        return serde_json::from_str::<T>(block).map_err(|e| {
            if e.is_data() {
                JsonExtractionError::Mismatch {
                    message: e.to_string(),
                }
            } else {
                JsonExtractionError::NotFound {
                    content_preview: preview(content),
                }
            }
        });
    }

    if direct_err.is_data() {
        return Err(JsonExtractionError::Mismatch {
            message: direct_err.to_string(),
        });
    }

    Err(JsonExtractionError::NotFound {
        content_preview: preview(content),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::Value;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Blurb {
        blurb: String,
    }

    #[test]
    fn test_direct_json() {
        let parsed: Blurb = parse_structured("  {\"blurb\": \"hello\"}  ").unwrap();
        assert_eq!(parsed.blurb, "hello");
    }

    #[test]
    fn test_json_tagged_fence() {
        let content = "Here you go:\n```json\n[{\"a\": 1}]\n```\nEnjoy!";
        let parsed: Value = parse_structured(content).unwrap();
        assert_eq!(parsed[0]["a"], 1);
    }

    #[test]
    fn test_untagged_fence() {
        let content = "```\n{\"blurb\": \"from fence\"}\n```";
        let parsed: Blurb = parse_structured(content).unwrap();
        assert_eq!(parsed.blurb, "from fence");
    }

    #[test]
    fn test_first_fence_wins() {
        let content = "```json\n{\"blurb\": \"one\"}\n```\n```json\n{\"blurb\": \"two\"}\n```";
        let parsed: Blurb = parse_structured(content).unwrap();
        assert_eq!(parsed.blurb, "one");
    }

    #[test]
    fn test_prose_is_not_found() {
        let err = parse_structured::<Value>("I cannot help with that.").unwrap_err();
        assert!(matches!(err, JsonExtractionError::NotFound { .. }));
    }

    #[test]
    fn test_bare_object_in_prose_is_not_extracted() {
        let err = parse_structured::<Value>("Result: {\"a\": 1}").unwrap_err();
        assert!(matches!(err, JsonExtractionError::NotFound { .. }));
    }

    #[test]
    fn test_wrong_shape_is_mismatch() {
        let err = parse_structured::<Blurb>("{\"text\": \"no blurb field\"}").unwrap_err();
        assert!(matches!(err, JsonExtractionError::Mismatch { .. }));

        let err = parse_structured::<Blurb>("```json\n[1, 2]\n```").unwrap_err();
        assert!(matches!(err, JsonExtractionError::Mismatch { .. }));
    }

    #[test]
    fn test_extract_fenced_block() {
        assert_eq!(extract_fenced_block("a ```json\n {} \n``` b"), Some("{}"));
        assert_eq!(extract_fenced_block("no fences"), None);
    }
}

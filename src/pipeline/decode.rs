//! Response decoding: raw API response → validated [`SummaryRecord`].
//!
//! Models are told to reply with a bare JSON object but sometimes wrap it in
//! ```` ```json ```` fences anyway, so the fences are stripped before parsing.
//! Validation is strict: a reply missing any of the five fields is a
//! [`SummaryError::MalformedSummary`], never a partially filled record.

use crate::error::SummaryError;
use crate::pipeline::transport::RawResponse;
use crate::summary::SummaryRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Body of a successful messages response. Only the parts we read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<ResponsePart>,
    #[serde(default)]
    pub stop_reason: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// A typed content part of a response. Non-text parts are kept as `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponsePart {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Token accounting reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
}

impl MessagesResponse {
    /// Text of the first `text` part, or `""` when there is none.
    pub fn first_text(&self) -> &str {
        self.content
            .iter()
            .find_map(|part| match part {
                ResponsePart::Text { text } => Some(text.as_str()),
                ResponsePart::Other => None,
            })
            .unwrap_or("")
    }
}

/// Decode a raw response body into a summary.
pub fn decode(raw: &RawResponse) -> Result<SummaryRecord, SummaryError> {
    let response: MessagesResponse = serde_json::from_str(&raw.body)
        .map_err(|e| SummaryError::malformed(format!("response body is not valid JSON: {e}")))?;

    if let Some(usage) = response.usage {
        debug!(
            "{} input tokens, {} output tokens",
            usage.input_tokens, usage.output_tokens
        );
    }
    if response.stop_reason.as_deref() == Some("max_tokens") {
        warn!("Reply was cut off by the max_tokens limit");
    }

    decode_text(response.first_text())
}

/// Decode the model's reply text into a summary.
pub fn decode_text(text: &str) -> Result<SummaryRecord, SummaryError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(SummaryError::malformed("the reply contained no text"));
    }

    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| SummaryError::malformed(format!("reply is not valid JSON: {e}")))?;

    SummaryRecord::from_json(&value)
}

static RE_LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_-]*[ \t]*\r?\n?").unwrap());

static RE_TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n?```\s*$").unwrap());

/// Remove a leading ```` ```json ```` / ```` ``` ```` marker and a trailing
/// ```` ``` ```` marker, then trim whitespace.
pub fn strip_code_fences(text: &str) -> String {
    let s = text.trim();
    let s = RE_LEADING_FENCE.replace(s, "");
    let s = RE_TRAILING_FENCE.replace(&s, "");
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RECORD: &str = r#"{"product":"X","quickStart":"a","safety":"b","maintenance":"c","troubleshooting":"d"}"#;

    fn raw(body: Value) -> RawResponse {
        RawResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    fn expected() -> SummaryRecord {
        SummaryRecord {
            product: "X".into(),
            quick_start: "a".into(),
            safety: "b".into(),
            maintenance: "c".into(),
            troubleshooting: "d".into(),
        }
    }

    #[test]
    fn fenced_json_decodes() {
        let text = format!("```json\n{RECORD}\n```");
        let body = json!({"content": [{"type": "text", "text": text}]});
        assert_eq!(decode(&raw(body)).unwrap(), expected());
    }

    #[test]
    fn bare_json_decodes() {
        assert_eq!(decode_text(RECORD).unwrap(), expected());
    }

    #[test]
    fn fence_variants() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  ```json\r\n{}\r\n```  \n"), "{}");
        assert_eq!(strip_code_fences("```JSON {}```"), "{}");
        assert_eq!(strip_code_fences("{\"a\":\"```\"}"), "{\"a\":\"```\"}");
        assert_eq!(strip_code_fences("plain"), "plain");
    }

    #[test]
    fn first_text_part_wins() {
        let body = json!({
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": RECORD},
                {"type": "text", "text": "ignored"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 1500, "output_tokens": 120}
        });
        assert_eq!(decode(&raw(body)).unwrap(), expected());
    }

    #[test]
    fn no_text_part_is_malformed() {
        let body = json!({"content": [{"type": "tool_use", "id": "t1"}]});
        let err = decode(&raw(body)).unwrap_err();
        assert!(matches!(err, SummaryError::MalformedSummary { .. }));
        assert!(err.to_string().contains("no text"));
    }

    #[test]
    fn missing_content_is_malformed() {
        assert!(decode(&raw(json!({"id": "msg_1"}))).is_err());
    }

    #[test]
    fn missing_field_is_malformed() {
        for key in crate::summary::SUMMARY_FIELDS {
            let mut v: Value = serde_json::from_str(RECORD).unwrap();
            v.as_object_mut().unwrap().remove(key);
            let err = decode_text(&v.to_string()).unwrap_err();
            assert!(matches!(err, SummaryError::MalformedSummary { .. }), "{key}");
        }
    }

    #[test]
    fn prose_reply_is_malformed() {
        let err = decode_text("Sorry, I can't read this document.").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let r = RawResponse {
            status: 200,
            body: "<html></html>".into(),
        };
        assert!(matches!(decode(&r), Err(SummaryError::MalformedSummary { .. })));
    }
}

//! Request construction: payload + media kind → messages API body.
//!
//! ## Message Layout
//!
//! One `user` message with two content parts, always in this order:
//! 1. the document (`document` part for PDFs, `image` part for photos),
//!    base64-encoded with its media type
//! 2. the instruction text from [`crate::prompts`]

use crate::config::AnalysisConfig;
use crate::document::MediaKind;
use crate::pipeline::encode::EncodedPayload;
use crate::prompts::instruction_for;
use serde::{Deserialize, Serialize};

/// Body of a `POST /v1/messages` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentPart>,
}

/// A typed content part of a request message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Document { source: Base64Source },
    Image { source: Base64Source },
    Text { text: String },
}

/// Inline base64 source of a document or image part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Base64Source {
    #[serde(rename = "type")]
    pub source_type: String,
    pub media_type: String,
    pub data: String,
}

impl ContentPart {
    fn media(payload: EncodedPayload, kind: &MediaKind) -> Self {
        let source = Base64Source {
            source_type: "base64".to_string(),
            media_type: kind.media_type().to_string(),
            data: payload.data,
        };
        match kind {
            MediaKind::Pdf => ContentPart::Document { source },
            MediaKind::Image(_) => ContentPart::Image { source },
        }
    }
}

/// Build the request for `payload` of the given `kind`.
pub fn build_request(
    payload: EncodedPayload,
    kind: &MediaKind,
    config: &AnalysisConfig,
) -> MessagesRequest {
    let instruction = instruction_for(kind, config.language);

    MessagesRequest {
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        messages: vec![Message {
            role: "user".to_string(),
            content: vec![
                ContentPart::media(payload, kind),
                ContentPart::Text { text: instruction },
            ],
        }],
    }
}

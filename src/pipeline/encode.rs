//! Document encoding: `SourceDocument` → base64 payload.
//!
//! The messages API takes documents and images as base64 text inside the
//! JSON request body, using the standard alphabet with padding.

use crate::document::SourceDocument;
use crate::error::SummaryError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// A document ready to be embedded in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload {
    /// Base64 text.
    pub data: String,
    /// MIME type for the request's `media_type` field.
    pub media_type: String,
    /// Size of the original content in bytes.
    pub byte_len: usize,
}

/// Read the full document and encode it.
///
/// Files are read through `tokio::fs`. Fails with [`SummaryError::Encoding`]
/// when the file cannot be read.
pub async fn encode(document: &SourceDocument) -> Result<EncodedPayload, SummaryError> {
    let bytes = document.read_bytes().await?;
    Ok(wrap(document, &bytes))
}

/// Blocking variant of [`encode`] for synchronous callers.
pub fn encode_blocking(document: &SourceDocument) -> Result<EncodedPayload, SummaryError> {
    let bytes = document.read_bytes_blocking()?;
    Ok(wrap(document, &bytes))
}

fn wrap(document: &SourceDocument, bytes: &[u8]) -> EncodedPayload {
    let data = STANDARD.encode(bytes);
    debug!(
        "Encoded {} → {} bytes ({} bytes base64)",
        document.filename(),
        bytes.len(),
        data.len()
    );

    EncodedPayload {
        data,
        media_type: document.kind().media_type().to_string(),
        byte_len: bytes.len(),
    }
}

/// `data:` URL of the document, for previews.
pub fn data_url(document: &SourceDocument) -> Result<String, SummaryError> {
    let payload = encode_blocking(document)?;
    Ok(format!("data:{};base64,{}", payload.media_type, payload.data))
}

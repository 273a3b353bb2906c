//! Error type for the quickmanual library.
//!
//! Every failure path of an analysis attempt (file selection, camera,
//! encoding, network, decoding) maps onto one [`SummaryError`] variant. All
//! variants are terminal for the current attempt: nothing here is retried
//! automatically, and the `Display` text is what the front end shows as the
//! single inline error message.

use crate::document::InputMode;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the quickmanual library.
#[derive(Debug, Error)]
pub enum SummaryError {
    // ── Selection errors ──────────────────────────────────────────────────
    /// The chosen file does not match the active input mode.
    #[error("'{filename}' is {found}, but {expected} mode only accepts {accepted}")]
    FileTypeRejected {
        filename: String,
        expected: InputMode,
        accepted: &'static str,
        found: String,
    },

    /// The camera could not be opened (permission refused, no device, ...).
    #[error("Camera access denied: {reason}\nAllow camera access and try again.")]
    CameraAccessDenied { reason: String },

    /// Analysis was triggered with nothing selected.
    #[error("No document selected for {mode} mode")]
    NoDocument { mode: InputMode },

    // ── Encoding errors ───────────────────────────────────────────────────
    /// The document bytes could not be read.
    #[error("Could not read '{}': {source}", path.display())]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── API errors ────────────────────────────────────────────────────────
    /// Non-success HTTP status or a transport failure.
    ///
    /// `message` is the vendor's `error.message` verbatim when present,
    /// otherwise `HTTP <status>` or the transport error text.
    #[error("{message}")]
    NetworkOrApi {
        status: Option<u16>,
        message: String,
    },

    /// The response could not be decoded into a complete summary.
    #[error("Malformed summary: {reason}")]
    MalformedSummary { reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// A live backend was requested without an API key.
    #[error("No API key configured.\nSet {var} to enable live analysis, or use the demo backend.")]
    ApiKeyMissing { var: &'static str },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SummaryError {
    /// HTTP status attached to the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            SummaryError::NetworkOrApi { status, .. } => *status,
            _ => None,
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        SummaryError::MalformedSummary {
            reason: reason.into(),
        }
    }
}

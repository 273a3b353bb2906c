//! # quickmanual
//!
//! Summarise a product manual (PDF) or a product photo into four short
//! cards, quick start, safety, maintenance and troubleshooting, using a
//! multimodal LLM messages API.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file / camera frame
//!  │
//!  ├─ 1. Select   sniff media type, accept for the active mode
//!  ├─ 2. Encode   bytes → base64
//!  ├─ 3. Request  [document|image part, instruction part], max_tokens 2000
//!  ├─ 4. Send     one POST, no retry; vendor error message surfaced verbatim
//!  └─ 5. Decode   first text part → strip fences → JSON → validated record
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quickmanual::{backend_from_config, AnalysisConfig, InputMode, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // API key read from ANTHROPIC_API_KEY
//!     let config = AnalysisConfig::default();
//!     let backend = backend_from_config(&config)?;
//!
//!     let mut session = Session::new(InputMode::Pdf);
//!     session.select_file("manual.pdf")?;
//!     let summary = session.analyze(backend.as_ref()).await?;
//!     println!("{}: {}", summary.product, summary.quick_start);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `quickmanual` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod backend;
pub mod camera;
pub mod config;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod session;
pub mod summary;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use backend::{backend_from_config, AnalysisBackend, DemoBackend, LiveBackend};
pub use camera::{CameraSession, CommandCamera, MediaDevices, MediaStream};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, BackendKind, Language, API_KEY_ENV};
pub use document::{InputMode, MediaKind, SourceDocument};
pub use error::SummaryError;
pub use progress::{AnalysisProgressCallback, NoopProgressCallback, ProgressCallback};
pub use session::Session;
pub use summary::SummaryRecord;

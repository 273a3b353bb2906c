//! Analysis backends.
//!
//! The demo front end and the live one used to be two copies of the same
//! screen. Here they are one [`AnalysisBackend`] trait with two
//! implementations, picked by [`crate::config::BackendKind`]:
//!
//! * [`DemoBackend`]: fixture summaries after a simulated delay
//! * [`LiveBackend`]: encode → request → transport → decode over HTTP

mod demo;
mod live;

pub use demo::{demo_summary, DemoBackend};
pub use live::LiveBackend;

use crate::config::{AnalysisConfig, BackendKind};
use crate::document::SourceDocument;
use crate::error::SummaryError;
use crate::summary::SummaryRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// Something that turns a document into a summary.
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Short name for logs ("demo", "live").
    fn name(&self) -> &'static str;

    /// Analyse `document`. One attempt, no retry.
    async fn analyze(&self, document: &SourceDocument) -> Result<SummaryRecord, SummaryError>;
}

/// Build the backend selected by `config.backend`.
///
/// The live backend requires an API key; its absence is reported here,
/// before any network call.
pub fn backend_from_config(
    config: &AnalysisConfig,
) -> Result<Arc<dyn AnalysisBackend>, SummaryError> {
    match config.backend {
        BackendKind::Demo => Ok(Arc::new(DemoBackend::new(config.clone()))),
        BackendKind::Live => Ok(Arc::new(LiveBackend::new(config.clone())?)),
    }
}

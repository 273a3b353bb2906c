use super::AnalysisBackend;
use crate::config::{AnalysisConfig, API_KEY_ENV};
use crate::document::SourceDocument;
use crate::error::SummaryError;
use crate::pipeline::{decode, encode, request, transport};
use crate::summary::SummaryRecord;
use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info};

/// Backend that calls the messages API.
///
/// Stateless apart from the pooled HTTP client; one analysis is one POST.
pub struct LiveBackend {
    config: AnalysisConfig,
    client: reqwest::Client,
}

impl LiveBackend {
    /// Fails with [`SummaryError::ApiKeyMissing`] when no key is configured.
    pub fn new(config: AnalysisConfig) -> Result<Self, SummaryError> {
        if config.api_key.is_none() {
            return Err(SummaryError::ApiKeyMissing { var: API_KEY_ENV });
        }
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    /// Use a caller-built HTTP client (proxies, custom TLS roots, ...).
    pub fn with_client(config: AnalysisConfig, client: reqwest::Client) -> Result<Self, SummaryError> {
        let mut backend = Self::new(config)?;
        backend.client = client;
        Ok(backend)
    }

    async fn run(&self, document: &SourceDocument) -> Result<SummaryRecord, SummaryError> {
        let payload = encode::encode(document).await?;
        let payload_len = payload.data.len();
        let req = request::build_request(payload, document.kind(), &self.config);

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_request_sent(&req.model, payload_len);
        }
        let raw = transport::send(&self.client, &req, &self.config).await?;
        decode::decode(&raw)
    }
}

#[async_trait]
impl AnalysisBackend for LiveBackend {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn analyze(&self, document: &SourceDocument) -> Result<SummaryRecord, SummaryError> {
        let start = Instant::now();
        info!(
            "Analysing {} ({}) with {}",
            document.filename(),
            document.kind().media_type(),
            self.config.model
        );
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_analysis_start(document.filename(), document.kind().media_type());
        }

        let result = self.run(document).await;

        match (&result, self.config.progress_callback.as_ref()) {
            (Ok(summary), Some(cb)) => cb.on_analysis_complete(&summary.product),
            (Err(e), Some(cb)) => cb.on_analysis_error(&e.to_string()),
            _ => {}
        }
        debug!("Analysis finished in {:?}", start.elapsed());
        result
    }
}

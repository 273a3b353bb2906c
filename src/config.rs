//! Configuration for an analysis.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. The API key is the only value normally taken
//! from the environment ([`API_KEY_ENV`]); everything else has a documented
//! default.

use crate::error::SummaryError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Environment variable holding the messages API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Default messages endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";

/// Value of the `anthropic-version` header.
pub const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default response length cap.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Configuration for analysing a document.
///
/// # Example
/// ```rust
/// use quickmanual::{AnalysisConfig, BackendKind, Language};
///
/// let config = AnalysisConfig::builder()
///     .backend(BackendKind::Demo)
///     .language(Language::En)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_tokens, 2000);
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Which backend answers the analysis. Default: [`BackendKind::Live`].
    pub backend: BackendKind,

    /// API key for the live backend. Default: read from [`API_KEY_ENV`].
    pub api_key: Option<String>,

    /// Messages endpoint URL. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// `anthropic-version` header value. Default: [`DEFAULT_API_VERSION`].
    pub api_version: String,

    /// Model identifier. Default: [`DEFAULT_MODEL`].
    pub model: String,

    /// Maximum tokens the model may generate. Default: 2000.
    ///
    /// Five short paragraphs fit comfortably; the cap bounds latency and cost.
    pub max_tokens: u32,

    /// Working language of the summary and of the card labels. Default: French.
    pub language: Language,

    /// Per-request timeout. Default: none (transport default).
    pub request_timeout_secs: Option<u64>,

    /// Simulated latency of the demo backend in milliseconds. Default: 2000.
    pub demo_delay_ms: u64,

    /// Optional progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            api_key: api_key_from_env(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            language: Language::default(),
            request_timeout_secs: None,
            demo_delay_ms: 2000,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("backend", &self.backend)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("api_version", &self.api_version)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("language", &self.language)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("demo_delay_ms", &self.demo_delay_ms)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn AnalysisProgressCallback>"),
            )
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }

    /// Warning to show instead of attempting a live call, if any.
    ///
    /// `None` when the demo backend is selected or a key is present.
    pub fn api_key_warning(&self) -> Option<SummaryError> {
        match (self.backend, self.api_key.as_deref()) {
            (BackendKind::Live, None) => Some(SummaryError::ApiKeyMissing { var: API_KEY_ENV }),
            _ => None,
        }
    }

    pub(crate) fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Read the API key from the environment; empty values count as absent.
pub fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.config.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    /// Forget any key picked up from the environment.
    pub fn without_api_key(mut self) -> Self {
        self.config.api_key = None;
        self
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.config.language = language;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn demo_delay_ms(mut self, ms: u64) -> Self {
        self.config.demo_delay_ms = ms;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    ///
    /// A missing API key is not a build error: it is reported by
    /// [`AnalysisConfig::api_key_warning`] and when the live backend is built.
    pub fn build(self) -> Result<AnalysisConfig, SummaryError> {
        let c = &self.config;
        if c.max_tokens == 0 {
            return Err(SummaryError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        if c.model.trim().is_empty() {
            return Err(SummaryError::InvalidConfig("model must not be empty".into()));
        }
        if !(c.endpoint.starts_with("http://") || c.endpoint.starts_with("https://")) {
            return Err(SummaryError::InvalidConfig(format!(
                "endpoint must be an HTTP/HTTPS URL, got '{}'",
                c.endpoint
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(SummaryError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which implementation answers an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Fixture data after a simulated delay. No network, no key.
    Demo,
    /// Real call to the messages API. (default)
    #[default]
    Live,
}

/// Working language of the generated summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// French. (default)
    #[default]
    Fr,
    /// English.
    En,
}

impl Language {
    /// Name of the language as written into the instruction text.
    pub fn name(self) -> &'static str {
        match self {
            Language::Fr => "French",
            Language::En => "English",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = AnalysisConfig::builder().without_api_key().build().unwrap();
        assert_eq!(c.backend, BackendKind::Live);
        assert_eq!(c.max_tokens, 2000);
        assert_eq!(c.model, DEFAULT_MODEL);
        assert_eq!(c.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(c.api_version, "2023-06-01");
        assert_eq!(c.language, Language::Fr);
        assert!(c.request_timeout().is_none());
    }

    #[test]
    fn zero_max_tokens_rejected() {
        let err = AnalysisConfig::builder().max_tokens(0).build().unwrap_err();
        assert!(matches!(err, SummaryError::InvalidConfig(_)));
    }

    #[test]
    fn bad_endpoint_rejected() {
        assert!(AnalysisConfig::builder()
            .endpoint("ftp://example.com")
            .build()
            .is_err());
    }

    #[test]
    fn missing_key_warns_only_for_live() {
        let live = AnalysisConfig::builder().without_api_key().build().unwrap();
        assert!(matches!(
            live.api_key_warning(),
            Some(SummaryError::ApiKeyMissing { .. })
        ));

        let demo = AnalysisConfig::builder()
            .without_api_key()
            .backend(BackendKind::Demo)
            .build()
            .unwrap();
        assert!(demo.api_key_warning().is_none());

        let keyed = AnalysisConfig::builder().api_key("sk-test").build().unwrap();
        assert!(keyed.api_key_warning().is_none());
    }

    #[test]
    fn blank_key_counts_as_absent() {
        let c = AnalysisConfig::builder().api_key("   ").build().unwrap();
        assert!(c.api_key.is_none());
    }

    #[test]
    fn debug_redacts_key() {
        let c = AnalysisConfig::builder().api_key("sk-secret").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("<redacted>"));
    }
}

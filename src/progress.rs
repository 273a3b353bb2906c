//! Progress-callback trait for analysis events.
//!
//! Inject an [`Arc<dyn AnalysisProgressCallback>`] via
//! [`crate::config::AnalysisConfigBuilder::progress_callback`] to observe an
//! analysis as it moves through encoding, the network call and decoding. The
//! CLI uses it to drive a spinner; tests use it to count events.
//!
//! # Example
//!
//! ```rust
//! use quickmanual::{AnalysisConfig, AnalysisProgressCallback};
//! use std::sync::Arc;
//!
//! struct Log;
//!
//! impl AnalysisProgressCallback for Log {
//!     fn on_request_sent(&self, model: &str, payload_bytes: usize) {
//!         eprintln!("asking {model} about {payload_bytes} bytes");
//!     }
//! }
//!
//! let config = AnalysisConfig::builder()
//!     .progress_callback(Arc::new(Log) as Arc<dyn AnalysisProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the backends as an analysis progresses.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait AnalysisProgressCallback: Send + Sync {
    /// Called once before the document is read.
    fn on_analysis_start(&self, filename: &str, media_type: &str) {
        let _ = (filename, media_type);
    }

    /// Called just before the request leaves the process.
    ///
    /// # Arguments
    /// * `model`        : model identifier (`"demo"` for the demo backend)
    /// * `payload_bytes`: size of the base64 payload
    fn on_request_sent(&self, model: &str, payload_bytes: usize) {
        let _ = (model, payload_bytes);
    }

    /// Called when a complete summary was decoded.
    fn on_analysis_complete(&self, product: &str) {
        let _ = product;
    }

    /// Called when the attempt failed, with the user-visible message.
    fn on_analysis_error(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl AnalysisProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::AnalysisConfig`].
pub type ProgressCallback = Arc<dyn AnalysisProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        sent: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl AnalysisProgressCallback for TrackingCallback {
        fn on_analysis_start(&self, _filename: &str, _media_type: &str) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_request_sent(&self, _model: &str, _payload_bytes: usize) {
            self.sent.fetch_add(1, Ordering::SeqCst);
        }

        fn on_analysis_complete(&self, _product: &str) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_analysis_error(&self, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_analysis_start("manual.pdf", "application/pdf");
        cb.on_request_sent("model", 42);
        cb.on_analysis_complete("Kettle");
        cb.on_analysis_error("bad key");
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_analysis_start("a.pdf", "application/pdf");
        tracker.on_request_sent("m", 10);
        tracker.on_analysis_error("HTTP 500");
        tracker.on_analysis_start("a.pdf", "application/pdf");
        tracker.on_request_sent("m", 10);
        tracker.on_analysis_complete("Kettle");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.sent.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_analysis_start("capture.jpg", "image/jpeg");
    }
}

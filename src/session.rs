//! Session state owned by the front end.
//!
//! Everything the screen used to keep in scattered component state lives
//! here: the active input mode, the selected document, the last summary, the
//! last error message and the camera preview. Backends stay stateless and
//! receive the document by reference.
//!
//! [`Session::analyze`] takes `&mut self`, so a second analysis cannot start
//! while one is outstanding on the same session.

use crate::backend::AnalysisBackend;
use crate::camera::{CameraSession, MediaDevices};
use crate::document::{InputMode, SourceDocument};
use crate::error::SummaryError;
use crate::pipeline::encode;
use crate::summary::SummaryRecord;
use std::path::Path;
use tracing::{info, warn};

/// State of one interactive session.
#[derive(Default)]
pub struct Session {
    mode: InputMode,
    document: Option<SourceDocument>,
    summary: Option<SummaryRecord>,
    error: Option<String>,
    camera: Option<CameraSession>,
}

impl Session {
    pub fn new(mode: InputMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn document(&self) -> Option<&SourceDocument> {
        self.document.as_ref()
    }

    pub fn summary(&self) -> Option<&SummaryRecord> {
        self.summary.as_ref()
    }

    /// Last user-visible error message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn camera_active(&self) -> bool {
        self.camera.as_ref().is_some_and(CameraSession::is_active)
    }

    /// Switch input mode.
    ///
    /// Releases the camera, and drops the selected document when it does not
    /// belong to the new mode.
    pub fn switch_mode(&mut self, mode: InputMode) {
        self.stop_camera();
        if self
            .document
            .as_ref()
            .is_some_and(|d| d.kind().mode() != mode)
        {
            self.document = None;
        }
        self.mode = mode;
    }

    /// Select a file on disk for the active mode.
    ///
    /// A rejected file leaves the current document untouched.
    pub fn select_file(&mut self, path: impl AsRef<Path>) -> Result<(), SummaryError> {
        let doc = SourceDocument::open(path, self.mode);
        self.accept(doc)
    }

    /// Select in-memory content for the active mode.
    pub fn accept_bytes(
        &mut self,
        bytes: Vec<u8>,
        filename: impl Into<String>,
    ) -> Result<(), SummaryError> {
        let doc = SourceDocument::from_bytes(bytes, filename, self.mode);
        self.accept(doc)
    }

    fn accept(&mut self, doc: Result<SourceDocument, SummaryError>) -> Result<(), SummaryError> {
        match doc {
            Ok(doc) => {
                info!("Selected {}", doc.filename());
                self.document = Some(doc);
                self.summary = None;
                self.error = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Open the camera preview. Only available in image mode.
    pub fn start_camera(&mut self, devices: &dyn MediaDevices) -> Result<(), SummaryError> {
        if self.mode != InputMode::Image {
            self.switch_mode(InputMode::Image);
        }
        self.stop_camera();
        match CameraSession::start(devices) {
            Ok(camera) => {
                self.camera = Some(camera);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Capture a photo from the running preview and select it.
    pub fn capture_photo(&mut self) -> Result<(), SummaryError> {
        let Some(camera) = self.camera.take() else {
            return Err(self.fail(SummaryError::CameraAccessDenied {
                reason: "camera is not running".into(),
            }));
        };
        let doc = camera.capture();
        self.accept(doc)
    }

    /// Close the preview without capturing.
    pub fn cancel_camera(&mut self) {
        self.stop_camera();
    }

    fn stop_camera(&mut self) {
        if let Some(camera) = self.camera.take() {
            camera.cancel();
        }
    }

    /// `data:` URL of the selected document, for previews.
    pub fn preview_data_url(&self) -> Option<Result<String, SummaryError>> {
        self.document.as_ref().map(encode::data_url)
    }

    /// Analyse the selected document with `backend`.
    ///
    /// Clears the previous summary and error first; on failure the message is
    /// kept in [`Session::error`] until the next attempt.
    pub async fn analyze(
        &mut self,
        backend: &dyn AnalysisBackend,
    ) -> Result<&SummaryRecord, SummaryError> {
        let Some(document) = self.document.as_ref() else {
            return Err(self.fail(SummaryError::NoDocument { mode: self.mode }));
        };
        self.summary = None;
        self.error = None;

        match backend.analyze(document).await {
            Ok(summary) => {
                info!("{} backend identified '{}'", backend.name(), summary.product);
                Ok(self.summary.insert(summary))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, e: SummaryError) -> SummaryError {
        warn!("{}", e);
        self.error = Some(e.to_string());
        e
    }
}

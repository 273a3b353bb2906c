//! Camera capture with guaranteed release of the device.
//!
//! A [`MediaDevices`] implementation opens a [`MediaStream`], which holds the
//! camera through one or more tracks. [`CameraSession`] owns the stream and
//! stops every track on each way out: after [`CameraSession::capture`], on
//! [`CameraSession::cancel`], and on drop (which is what a mode switch does).
//! No path leaves the camera held.
//!
//! [`CommandCamera`] is the bundled implementation: it runs an external
//! capture program (`fswebcam --no-banner -`, `libcamera-still -o -`, ...)
//! that writes one JPEG frame to stdout. The child process is the track.

use crate::document::SourceDocument;
use crate::error::SummaryError;
use std::io::{ErrorKind, Read};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

/// Source of camera streams.
pub trait MediaDevices: Send + Sync {
    /// Acquire the camera. Fails with [`SummaryError::CameraAccessDenied`].
    fn open(&self) -> Result<Box<dyn MediaStream>, SummaryError>;
}

/// An acquired camera stream.
pub trait MediaStream: Send {
    /// Grab one JPEG-encoded frame.
    fn grab_frame(&mut self) -> Result<Vec<u8>, SummaryError>;

    /// Number of tracks still holding the device.
    fn active_tracks(&self) -> usize;

    /// Stop all tracks. Must be idempotent.
    fn stop(&mut self);
}

/// A live camera preview. Dropping it releases the camera.
pub struct CameraSession {
    stream: Option<Box<dyn MediaStream>>,
}

impl CameraSession {
    /// Acquire the camera from `devices`.
    pub fn start(devices: &dyn MediaDevices) -> Result<Self, SummaryError> {
        let stream = devices.open()?;
        info!("Camera started ({} track(s))", stream.active_tracks());
        Ok(Self {
            stream: Some(stream),
        })
    }

    pub fn is_active(&self) -> bool {
        self.stream
            .as_ref()
            .is_some_and(|s| s.active_tracks() > 0)
    }

    /// Grab a frame, release the camera, and wrap the frame as a photo.
    ///
    /// The camera is released whether or not the grab succeeds.
    pub fn capture(mut self) -> Result<SourceDocument, SummaryError> {
        let frame = match self.stream.as_mut() {
            Some(stream) => stream.grab_frame(),
            None => Err(SummaryError::CameraAccessDenied {
                reason: "camera is not running".into(),
            }),
        };
        self.release();

        let frame = frame?;
        if !matches!(image::guess_format(&frame), Ok(image::ImageFormat::Jpeg)) {
            return Err(SummaryError::CameraAccessDenied {
                reason: "the camera did not return a JPEG frame".into(),
            });
        }
        debug!("Captured {} byte frame", frame.len());
        Ok(SourceDocument::from_capture(frame))
    }

    /// Close the preview without capturing.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("Camera released");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

// ── External-command camera ───────────────────────────────────────────────

/// Camera backed by an external capture program.
#[derive(Debug, Clone)]
pub struct CommandCamera {
    program: String,
    args: Vec<String>,
}

impl CommandCamera {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Parse a whitespace-separated command line (no shell quoting).
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self::new(program, parts.collect()))
    }
}

impl MediaDevices for CommandCamera {
    fn open(&self) -> Result<Box<dyn MediaStream>, SummaryError> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SummaryError::CameraAccessDenied {
                reason: match e.kind() {
                    ErrorKind::NotFound => format!("capture program '{}' not found", self.program),
                    ErrorKind::PermissionDenied => {
                        format!("not allowed to run '{}'", self.program)
                    }
                    _ => format!("could not start '{}': {e}", self.program),
                },
            })?;
        debug!("Spawned capture program {} (pid {})", self.program, child.id());
        Ok(Box::new(CommandStream { child: Some(child) }))
    }
}

struct CommandStream {
    child: Option<Child>,
}

impl MediaStream for CommandStream {
    fn grab_frame(&mut self) -> Result<Vec<u8>, SummaryError> {
        let child = self
            .child
            .as_mut()
            .ok_or_else(|| SummaryError::CameraAccessDenied {
                reason: "camera already stopped".into(),
            })?;

        let mut frame = Vec::new();
        if let Some(mut stdout) = child.stdout.take() {
            stdout
                .read_to_end(&mut frame)
                .map_err(|e| SummaryError::CameraAccessDenied {
                    reason: format!("reading frame failed: {e}"),
                })?;
        }
        let status = child.wait().map_err(|e| SummaryError::CameraAccessDenied {
            reason: format!("capture program failed: {e}"),
        })?;
        self.child = None;

        if !status.success() || frame.is_empty() {
            return Err(SummaryError::CameraAccessDenied {
                reason: format!("capture program exited with {status}"),
            });
        }
        Ok(frame)
    }

    fn active_tracks(&self) -> usize {
        usize::from(self.child.is_some())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                if e.kind() != ErrorKind::InvalidInput {
                    warn!("Could not stop capture program: {}", e);
                }
            }
            let _ = child.wait();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const JPEG: &[u8] = b"\xFF\xD8\xFF\xE0\0\x10JFIF\0";

    /// Fake camera whose open tracks are visible through a shared counter.
    struct FakeDevices {
        tracks: Arc<AtomicUsize>,
        frame: Vec<u8>,
        deny: bool,
    }

    struct FakeStream {
        tracks: Arc<AtomicUsize>,
        held: usize,
        frame: Vec<u8>,
    }

    impl MediaDevices for FakeDevices {
        fn open(&self) -> Result<Box<dyn MediaStream>, SummaryError> {
            if self.deny {
                return Err(SummaryError::CameraAccessDenied {
                    reason: "permission refused".into(),
                });
            }
            self.tracks.fetch_add(2, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                tracks: Arc::clone(&self.tracks),
                held: 2,
                frame: self.frame.clone(),
            }))
        }
    }

    impl MediaStream for FakeStream {
        fn grab_frame(&mut self) -> Result<Vec<u8>, SummaryError> {
            Ok(self.frame.clone())
        }

        fn active_tracks(&self) -> usize {
            self.held
        }

        fn stop(&mut self) {
            self.tracks.fetch_sub(self.held, Ordering::SeqCst);
            self.held = 0;
        }
    }

    fn devices(frame: &[u8]) -> (FakeDevices, Arc<AtomicUsize>) {
        let tracks = Arc::new(AtomicUsize::new(0));
        let d = FakeDevices {
            tracks: Arc::clone(&tracks),
            frame: frame.to_vec(),
            deny: false,
        };
        (d, tracks)
    }

    #[test]
    fn capture_releases_camera() {
        let (d, tracks) = devices(JPEG);
        let session = CameraSession::start(&d).unwrap();
        assert!(session.is_active());
        assert_eq!(tracks.load(Ordering::SeqCst), 2);

        let doc = session.capture().unwrap();
        assert_eq!(tracks.load(Ordering::SeqCst), 0);
        assert_eq!(doc.filename(), "capture.jpg");
        assert_eq!(doc.kind().media_type(), "image/jpeg");
    }

    #[test]
    fn cancel_releases_camera() {
        let (d, tracks) = devices(JPEG);
        CameraSession::start(&d).unwrap().cancel();
        assert_eq!(tracks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn drop_releases_camera() {
        let (d, tracks) = devices(JPEG);
        {
            let _session = CameraSession::start(&d).unwrap();
            assert_eq!(tracks.load(Ordering::SeqCst), 2);
        }
        assert_eq!(tracks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_capture_still_releases() {
        let (d, tracks) = devices(b"not a jpeg");
        let err = CameraSession::start(&d).unwrap().capture().unwrap_err();
        assert!(matches!(err, SummaryError::CameraAccessDenied { .. }));
        assert_eq!(tracks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn denied_access_surfaces() {
        let (mut d, tracks) = devices(JPEG);
        d.deny = true;
        assert!(matches!(
            CameraSession::start(&d),
            Err(SummaryError::CameraAccessDenied { .. })
        ));
        assert_eq!(tracks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn command_line_parsing() {
        let cam = CommandCamera::from_command_line("fswebcam --no-banner -").unwrap();
        assert_eq!(cam.program, "fswebcam");
        assert_eq!(cam.args, vec!["--no-banner", "-"]);
        assert!(CommandCamera::from_command_line("   ").is_none());
    }

    #[test]
    fn missing_program_is_access_denied() {
        let cam = CommandCamera::new("quickmanual-no-such-capture-tool", vec![]);
        let err = CameraSession::start(&cam).err().unwrap();
        assert!(err.to_string().contains("not found"), "got: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn command_camera_reads_stdout_frame() {
        let cam = CommandCamera::new(
            "printf",
            vec![r"\377\330\377\340JFIF".to_string()],
        );
        let session = CameraSession::start(&cam).unwrap();
        let doc = session.capture().unwrap();
        assert_eq!(doc.read_bytes_blocking().unwrap().as_ref(), b"\xFF\xD8\xFF\xE0JFIF");
    }

    #[cfg(unix)]
    #[test]
    fn command_camera_cancel_kills_child() {
        let cam = CommandCamera::new("sleep", vec!["30".to_string()]);
        let session = CameraSession::start(&cam).unwrap();
        assert!(session.is_active());
        let started = std::time::Instant::now();
        session.cancel();
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
    }
}

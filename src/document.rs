//! Source documents: the file the user picked, tagged with its media kind.
//!
//! A [`SourceDocument`] only exists once it has been accepted by an
//! [`InputMode`]. Selection never reads more than the first kilobyte (for
//! magic-byte sniffing); the full content is read lazily by
//! [`crate::pipeline::encode`]. An unreadable file surfaces as
//! [`SummaryError::Encoding`], at selection when its extension says nothing
//! and at encoding otherwise.

use crate::error::SummaryError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wire media type for PDF manuals.
pub const PDF_MIME: &str = "application/pdf";

/// Filename given to frames grabbed from the camera.
pub const CAPTURE_FILENAME: &str = "capture.jpg";

const OCTET_STREAM: &str = "application/octet-stream";

/// PDF readers accept the `%PDF-` marker anywhere in the first kilobyte.
const SNIFF_LEN: usize = 1024;

/// Image types the messages API accepts. Other sniffed formats must agree
/// with the file extension to count.
const API_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

/// The two input modes of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// PDF manual upload. (default)
    #[default]
    Pdf,
    /// Product photo, from a file or the camera.
    Image,
}

impl InputMode {
    /// Human-readable description of what this mode accepts.
    pub fn accepted(self) -> &'static str {
        match self {
            InputMode::Pdf => PDF_MIME,
            InputMode::Image => "image/*",
        }
    }

    /// Whether a document of `media_type` may be selected in this mode.
    pub fn accepts(self, media_type: &str) -> bool {
        match self {
            InputMode::Pdf => media_type == PDF_MIME,
            InputMode::Image => media_type.starts_with("image/"),
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Pdf => f.write_str("PDF"),
            InputMode::Image => f.write_str("photo"),
        }
    }
}

/// Media kind of an accepted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    /// A PDF manual.
    Pdf,
    /// A product photo with its original MIME type (e.g. `image/jpeg`).
    Image(String),
}

impl MediaKind {
    /// MIME type sent in the request's `media_type` field.
    pub fn media_type(&self) -> &str {
        match self {
            MediaKind::Pdf => PDF_MIME,
            MediaKind::Image(mime) => mime,
        }
    }

    /// The input mode this kind belongs to.
    pub fn mode(&self) -> InputMode {
        match self {
            MediaKind::Pdf => InputMode::Pdf,
            MediaKind::Image(_) => InputMode::Image,
        }
    }

    fn from_media_type(media_type: &str) -> Option<Self> {
        if media_type == PDF_MIME {
            Some(MediaKind::Pdf)
        } else if media_type.starts_with("image/") {
            Some(MediaKind::Image(media_type.to_string()))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
enum Content {
    Memory(Vec<u8>),
    File(PathBuf),
}

/// A user-chosen input accepted by an [`InputMode`].
#[derive(Debug, Clone)]
pub struct SourceDocument {
    content: Content,
    kind: MediaKind,
    filename: String,
}

impl SourceDocument {
    /// Select a file on disk for `mode`.
    ///
    /// The media type is sniffed from the first bytes when the file is
    /// readable, falling back to the extension. An unreadable file with a
    /// known extension is still accepted; reading it later fails with
    /// [`SummaryError::Encoding`]. Without one it fails here, the same way.
    pub fn open(path: impl AsRef<Path>, mode: InputMode) -> Result<Self, SummaryError> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let media_type = match read_header(path) {
            Ok(header) => detect_media_type(&header, &filename),
            Err(source) if mime_from_extension(&filename) == OCTET_STREAM => {
                return Err(encoding_error(path, source));
            }
            Err(e) => {
                debug!("Cannot sniff {}: {}", path.display(), e);
                mime_from_extension(&filename).to_string()
            }
        };
        let kind = accept(mode, &media_type, &filename)?;

        debug!("Selected {} ({}) for {} mode", filename, media_type, mode);
        Ok(Self {
            content: Content::File(path.to_path_buf()),
            kind,
            filename,
        })
    }

    /// Select in-memory content for `mode`.
    pub fn from_bytes(
        bytes: Vec<u8>,
        filename: impl Into<String>,
        mode: InputMode,
    ) -> Result<Self, SummaryError> {
        let filename = filename.into();
        let media_type = detect_media_type(&bytes, &filename);
        let kind = accept(mode, &media_type, &filename)?;
        Ok(Self {
            content: Content::Memory(bytes),
            kind,
            filename,
        })
    }

    /// Wrap a JPEG frame grabbed from the camera.
    pub fn from_capture(frame: Vec<u8>) -> Self {
        Self {
            content: Content::Memory(frame),
            kind: MediaKind::Image("image/jpeg".to_string()),
            filename: CAPTURE_FILENAME.to_string(),
        }
    }

    pub fn kind(&self) -> &MediaKind {
        &self.kind
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Path on disk, when the document was selected from a file.
    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            Content::File(p) => Some(p),
            Content::Memory(_) => None,
        }
    }

    /// Read the full content without blocking the runtime.
    pub async fn read_bytes(&self) -> Result<Cow<'_, [u8]>, SummaryError> {
        match &self.content {
            Content::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
            Content::File(path) => tokio::fs::read(path)
                .await
                .map(Cow::Owned)
                .map_err(|source| encoding_error(path, source)),
        }
    }

    /// Blocking variant of [`SourceDocument::read_bytes`], for previews.
    pub fn read_bytes_blocking(&self) -> Result<Cow<'_, [u8]>, SummaryError> {
        match &self.content {
            Content::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
            Content::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|source| encoding_error(path, source)),
        }
    }
}

fn accept(mode: InputMode, media_type: &str, filename: &str) -> Result<MediaKind, SummaryError> {
    match MediaKind::from_media_type(media_type) {
        Some(kind) if mode.accepts(media_type) => Ok(kind),
        _ => Err(SummaryError::FileTypeRejected {
            filename: filename.to_string(),
            expected: mode,
            accepted: mode.accepted(),
            found: media_type.to_string(),
        }),
    }
}

fn encoding_error(path: &Path, source: std::io::Error) -> SummaryError {
    SummaryError::Encoding {
        path: path.to_path_buf(),
        source,
    }
}

fn read_header(path: &Path) -> std::io::Result<Vec<u8>> {
    let file = std::fs::File::open(path)?;
    let mut header = Vec::with_capacity(SNIFF_LEN);
    file.take(SNIFF_LEN as u64).read_to_end(&mut header)?;
    Ok(header)
}

/// Pick the input mode for a file: photos go to image mode, anything else to
/// PDF mode (where non-PDFs are then rejected).
pub fn guess_mode(path: impl AsRef<Path>) -> InputMode {
    let path = path.as_ref();
    let header = read_header(path).unwrap_or_default();
    let name = path.to_string_lossy();
    if InputMode::Image.accepts(&detect_media_type(&header, &name)) {
        InputMode::Image
    } else {
        InputMode::Pdf
    }
}

/// Determine a MIME type from magic bytes, falling back to the file extension.
///
/// A sniffed image format wins only when the API accepts it or the
/// extension agrees; loose signatures such as `P1` (PBM) would otherwise
/// claim plain text files.
pub fn detect_media_type(header: &[u8], filename: &str) -> String {
    let by_extension = mime_from_extension(filename);
    let sniffed = image::guess_format(header).ok().map(|f| f.to_mime_type());

    if let Some(mime) = sniffed.filter(|m| API_IMAGE_TYPES.contains(m)) {
        return mime.to_string();
    }
    if has_pdf_marker(header) {
        return PDF_MIME.to_string();
    }
    match sniffed {
        Some(mime) if mime == by_extension => mime.to_string(),
        _ => by_extension.to_string(),
    }
}

fn has_pdf_marker(header: &[u8]) -> bool {
    let head = &header[..header.len().min(SNIFF_LEN)];
    head.windows(5).any(|w| w == b"%PDF-")
}

fn mime_from_extension(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MIME,
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "heic" => "image/heic",
        "txt" => "text/plain",
        _ => OCTET_STREAM,
    }
}

//! Upload domain: public API.
//!
//! Owns the file-input boundary: reading a user-chosen file, the MIME
//! allow-list, and the preview shown next to a selected certificate.

mod preview;

pub use preview::Preview;

use std::path::Path;
use std::sync::Arc;

/// MIME type reported for files whose extension is not an image we know.
const UNKNOWN_MIME: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid file type. Please upload a PNG, JPG, or WEBP image.")]
    UnsupportedType(String),
}

/// The image types a certificate may be uploaded as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageMime {
    Jpeg,
    Png,
    Webp,
}

impl ImageMime {
    pub const ALLOWED: [ImageMime; 3] = [ImageMime::Jpeg, ImageMime::Png, ImageMime::Webp];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageMime::Jpeg => "image/jpeg",
            ImageMime::Png => "image/png",
            ImageMime::Webp => "image/webp",
        }
    }

    /// Match a declared MIME string against the allow-list.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        Self::ALLOWED.into_iter().find(|m| m.as_str() == mime)
    }
}

impl std::fmt::Display for ImageMime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file the user picked, before any validation.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub declared_mime: String,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, declared_mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            declared_mime: declared_mime.into(),
            bytes,
        }
    }
}

/// A candidate that passed the allow-list.
///
/// Bytes are shared so handing the file to an in-flight verification
/// does not copy the image.
#[derive(Debug, Clone)]
pub struct CertificateFile {
    pub name: String,
    pub mime: ImageMime,
    pub bytes: Arc<[u8]>,
}

impl CertificateFile {
    pub fn accept(candidate: CandidateFile) -> Result<Self, UploadError> {
        let mime = ImageMime::from_mime(&candidate.declared_mime)
            .ok_or(UploadError::UnsupportedType(candidate.declared_mime))?;
        Ok(Self {
            name: candidate.name,
            mime,
            bytes: Arc::from(candidate.bytes),
        })
    }
}

/// Declared MIME type for a path, derived from its extension the way a
/// browser fills in `File.type`.
pub fn mime_from_path(path: &Path) -> String {
    image::ImageFormat::from_path(path)
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MIME.to_string())
}

/// Read a user-chosen file into a candidate.
///
/// Files whose declared type is outside the allow-list are not read; the
/// candidate carries no bytes and is rejected by [`CertificateFile::accept`].
pub async fn read_candidate(path: &Path) -> Result<CandidateFile, UploadError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let declared_mime = mime_from_path(path);
    if ImageMime::from_mime(&declared_mime).is_none() {
        log::info!("[UPLOAD] Skipping read of {} (declared {})", name, declared_mime);
        return Ok(CandidateFile::new(name, declared_mime, Vec::new()));
    }

    let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
        path: path.display().to_string(),
        source,
    })?;
    log::info!(
        "[UPLOAD] Read {} ({} bytes, declared {})",
        name,
        bytes.len(),
        declared_mime
    );
    Ok(CandidateFile::new(name, declared_mime, bytes))
}

//! Preview summary for a selected certificate.
//!
//! Stands in for the thumbnail of a graphical front end: name, type, size,
//! pixel dimensions and a SHA-256 fingerprint of the exact bytes sent.

use std::io::Cursor;

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::CertificateFile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub file_name: String,
    pub mime: String,
    pub size_bytes: usize,
    /// `None` when the image header cannot be read.
    pub dimensions: Option<(u32, u32)>,
    pub sha256: String,
}

impl Preview {
    pub fn of(file: &CertificateFile) -> Self {
        let dimensions = read_dimensions(&file.bytes);
        if dimensions.is_none() {
            log::warn!("[UPLOAD] Could not read image header of {}", file.name);
        }

        if let Ok(sniffed) = image::guess_format(&file.bytes) {
            if sniffed.to_mime_type() != file.mime.as_str() {
                log::warn!(
                    "[UPLOAD] {} is declared {} but looks like {}",
                    file.name,
                    file.mime,
                    sniffed.to_mime_type()
                );
            }
        }

        Self {
            file_name: file.name.clone(),
            mime: file.mime.as_str().to_string(),
            size_bytes: file.bytes.len(),
            dimensions,
            sha256: format!("{:x}", Sha256::digest(&file.bytes)),
        }
    }

    /// Human-readable size, e.g. `2.0 MB`.
    pub fn size_label(&self) -> String {
        const KB: f64 = 1024.0;
        let bytes = self.size_bytes as f64;
        if bytes >= KB * KB {
            format!("{:.1} MB", bytes / (KB * KB))
        } else if bytes >= KB {
            format!("{:.1} KB", bytes / KB)
        } else {
            format!("{} B", self.size_bytes)
        }
    }
}

fn read_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::{CandidateFile, CertificateFile};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([240, 240, 240]));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn preview_reads_dimensions_and_fingerprint() {
        let bytes = png_bytes(12, 7);
        let len = bytes.len();
        let file =
            CertificateFile::accept(CandidateFile::new("diploma.png", "image/png", bytes)).unwrap();
        let preview = Preview::of(&file);
        assert_eq!(preview.file_name, "diploma.png");
        assert_eq!(preview.mime, "image/png");
        assert_eq!(preview.size_bytes, len);
        assert_eq!(preview.dimensions, Some((12, 7)));
        assert_eq!(preview.sha256.len(), 64);
    }

    #[test]
    fn unreadable_header_has_no_dimensions() {
        let file =
            CertificateFile::accept(CandidateFile::new("x.jpg", "image/jpeg", vec![0; 32])).unwrap();
        assert_eq!(Preview::of(&file).dimensions, None);
    }

    #[test]
    fn size_label_scales() {
        let mut preview = Preview {
            file_name: String::new(),
            mime: "image/png".to_string(),
            size_bytes: 512,
            dimensions: None,
            sha256: String::new(),
        };
        assert_eq!(preview.size_label(), "512 B");
        preview.size_bytes = 2048;
        assert_eq!(preview.size_label(), "2.0 KB");
        preview.size_bytes = 2 * 1024 * 1024;
        assert_eq!(preview.size_label(), "2.0 MB");
    }
}

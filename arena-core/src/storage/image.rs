//! Upload inspection: magic-byte format detection, pixel dimensions and a
//! content checksum.

use std::io::Cursor;

use image::ImageReader;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::error::{ArenaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
    Gif,
}

impl ImageKind {
    pub fn content_type(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Png => "image/png",
            ImageKind::WebP => "image/webp",
            ImageKind::Gif => "image/gif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::WebP => "webp",
            ImageKind::Gif => "gif",
        }
    }

    /// Detect an accepted format from the leading bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageKind::Jpeg);
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(ImageKind::Png);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageKind::WebP);
        }

        // GIF87a / GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageKind::Gif);
        }

        None
    }
}

/// A validated image body ready to be stored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub kind: ImageKind,
    pub width: u32,
    pub height: u32,
    pub size: u64,
    /// Hex-encoded SHA-256 of the bytes.
    pub checksum: String,
}

impl ImageUpload {
    pub fn inspect(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(ArenaError::invalid("upload body is empty"));
        }

        let Some(kind) = ImageKind::sniff(data) else {
            warn!(
                "Unrecognized image format, first 8 bytes: {:02X?}",
                &data[..8.min(data.len())]
            );
            return Err(ArenaError::invalid(
                "unsupported image format; use JPEG, PNG, WebP or GIF",
            ));
        };

        let (width, height) = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(ArenaError::Io)?
            .into_dimensions()
            .map_err(|e| {
                ArenaError::invalid(format!(
                    "{} data is corrupt: {e}",
                    kind.content_type()
                ))
            })?;

        Ok(Self {
            kind,
            width,
            height,
            size: data.len() as u64,
            checksum: hex::encode(Sha256::digest(data)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn encode(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut bytes, format)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn sniffs_supported_headers() {
        assert_eq!(
            ImageKind::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageKind::Jpeg)
        );
        let mut webp = [0u8; 12];
        webp[0..4].copy_from_slice(b"RIFF");
        webp[8..12].copy_from_slice(b"WEBP");
        assert_eq!(ImageKind::sniff(&webp), Some(ImageKind::WebP));
        assert_eq!(ImageKind::sniff(b"GIF89a...."), Some(ImageKind::Gif));
        assert_eq!(ImageKind::sniff(b"BM......"), None);
        assert_eq!(ImageKind::sniff(b"%PDF-1.7"), None);
    }

    #[test]
    fn inspects_png_dimensions_and_checksum() {
        let png = encode(ImageFormat::Png, 7, 3);
        let upload = ImageUpload::inspect(&png).unwrap();
        assert_eq!(upload.kind, ImageKind::Png);
        assert_eq!((upload.width, upload.height), (7, 3));
        assert_eq!(upload.size, png.len() as u64);
        assert_eq!(upload.checksum.len(), 64);
        assert_eq!(upload.checksum, ImageUpload::inspect(&png).unwrap().checksum);
    }

    #[test]
    fn inspects_jpeg() {
        let jpeg = encode(ImageFormat::Jpeg, 16, 9);
        let upload = ImageUpload::inspect(&jpeg).unwrap();
        assert_eq!(upload.kind.content_type(), "image/jpeg");
        assert_eq!(upload.kind.extension(), "jpg");
        assert_eq!((upload.width, upload.height), (16, 9));
    }

    #[test]
    fn rejects_empty_unknown_and_truncated_bodies() {
        assert!(matches!(
            ImageUpload::inspect(&[]),
            Err(ArenaError::InvalidInput(_))
        ));
        assert!(matches!(
            ImageUpload::inspect(b"just some text"),
            Err(ArenaError::InvalidInput(_))
        ));
        let png = encode(ImageFormat::Png, 4, 4);
        assert!(matches!(
            ImageUpload::inspect(&png[..10]),
            Err(ArenaError::InvalidInput(_))
        ));
    }
}

//! Content-based MIME detection.
//!
//! The sniffed type is the only source of truth for the actual format; a
//! file name can never override it.

use crate::error::PipelineError;
use crate::types::SniffedType;

/// Derives a MIME type from byte content.
pub trait MimeSniffer: Send + Sync {
    fn sniff(&self, bytes: &[u8]) -> Result<SniffedType, PipelineError>;
}

/// Magic-byte sniffer for common image containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignatureSniffer;

impl MimeSniffer for SignatureSniffer {
    fn sniff(&self, bytes: &[u8]) -> Result<SniffedType, PipelineError> {
        Self::detect(bytes)
            .map(SniffedType::new)
            .ok_or(PipelineError::MimeUndetected)
    }
}

impl SignatureSniffer {
    /// Match the header against known image signatures.
    fn detect(header: &[u8]) -> Option<&'static str> {
        // JPEG: FF D8 FF
        if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if header.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }

        // GIF: GIF87a / GIF89a
        if header.starts_with(b"GIF87a") || header.starts_with(b"GIF89a") {
            return Some("image/gif");
        }

        // WebP: RIFF....WEBP
        if header.len() >= 12 && header.starts_with(b"RIFF") && &header[8..12] == b"WEBP" {
            return Some("image/webp");
        }

        // BMP: BM
        if header.starts_with(b"BM") {
            return Some("image/bmp");
        }

        // TIFF: II (little-endian) or MM (big-endian) followed by version 42
        if header.starts_with(&[b'I', b'I', 0x2A, 0x00])
            || header.starts_with(&[b'M', b'M', 0x00, 0x2A])
        {
            return Some("image/tiff");
        }

        // ISO-BMFF: ftyp box at offset 4, brand at offset 8
        if header.len() >= 12 && &header[4..8] == b"ftyp" {
            return match &header[8..12] {
                b"avif" | b"avis" => Some("image/avif"),
                b"heic" | b"heix" | b"heim" | b"heis" | b"hevc" | b"hevx" => Some("image/heic"),
                b"mif1" | b"msf1" => Some("image/heif"),
                _ => None,
            };
        }

        None
    }
}

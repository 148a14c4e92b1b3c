//! Format-specific decoding of validated payloads.
//!
//! The dispatcher performs no format inference: it trusts the routing
//! decision and forces the matching decoder.

use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::PipelineError;
use crate::types::ImageKind;

/// A decoded pixel grid.
#[derive(Debug)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl DecodedImage {
    pub fn new(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            width,
            height,
        }
    }
}

/// Turns container bytes into pixels.
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, PipelineError>;
}

/// PNG decoder backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct PngDecoder;

impl ImageDecoder for PngDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, PipelineError> {
        decode_as(bytes, ImageFormat::Png)
    }
}

/// JPEG decoder backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegDecoder;

impl ImageDecoder for JpegDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, PipelineError> {
        decode_as(bytes, ImageFormat::Jpeg)
    }
}

fn decode_as(bytes: &[u8], format: ImageFormat) -> Result<DecodedImage, PipelineError> {
    image::load_from_memory_with_format(bytes, format)
        .map(DecodedImage::new)
        .map_err(|e| PipelineError::decode(format!("{format:?}: {e}")))
}

/// Routes validated bytes to the decoder for their format.
pub struct DecodeDispatcher {
    png: Box<dyn ImageDecoder>,
    jpeg: Box<dyn ImageDecoder>,
}

impl Default for DecodeDispatcher {
    fn default() -> Self {
        Self::new(Box::new(PngDecoder), Box::new(JpegDecoder))
    }
}

impl DecodeDispatcher {
    pub fn new(png: Box<dyn ImageDecoder>, jpeg: Box<dyn ImageDecoder>) -> Self {
        Self { png, jpeg }
    }

    pub(crate) fn set_png(&mut self, decoder: Box<dyn ImageDecoder>) {
        self.png = decoder;
    }

    pub(crate) fn set_jpeg(&mut self, decoder: Box<dyn ImageDecoder>) {
        self.jpeg = decoder;
    }

    /// Decode `bytes` with the decoder registered for `kind`.
    pub fn dispatch(&self, bytes: &[u8], kind: ImageKind) -> Result<DecodedImage, PipelineError> {
        let decoder = match kind {
            ImageKind::Png => &self.png,
            ImageKind::Jpeg => &self.jpeg,
        };
        decoder.decode(bytes)
    }
}

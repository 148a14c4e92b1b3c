//! Perceptual block hashing of decoded images.

use std::fmt::Write;

use image::{DynamicImage, GenericImageView};
use image_hasher::{HashAlg, HasherConfig};

use crate::error::PipelineError;
use crate::types::{Fingerprint, HashRequest};

use super::decode::DecodedImage;

/// Largest grid side accepted by the block hasher.
pub const MAX_GRID_BITS: u32 = 256;

/// Grid sides must be a multiple of this so the grid splits into four median bands.
pub const GRID_STEP: u32 = 4;

/// Selector for the even-block (quick) method.
pub const SELECTOR_QUICK: u8 = 1;

/// Selector for the fractional-block (precise) method.
pub const SELECTOR_PRECISE: u8 = 2;

/// Computes a fingerprint from a pixel grid.
///
/// `bits` and `selector` are passed through exactly as the caller requested.
pub trait PerceptualHasher: Send + Sync {
    fn hash(
        &self,
        image: &DecodedImage,
        bits: u32,
        selector: u8,
    ) -> Result<Fingerprint, PipelineError>;
}

/// Blockhash over a `bits x bits` grid, rendered as lowercase hex.
///
/// Selector 2 hashes the full frame, weighting pixels that straddle block
/// borders. Selector 1 first crops the frame to a multiple of the grid so
/// every block covers whole pixels.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockHasher;

impl PerceptualHasher for BlockHasher {
    fn hash(
        &self,
        image: &DecodedImage,
        bits: u32,
        selector: u8,
    ) -> Result<Fingerprint, PipelineError> {
        if bits == 0 || bits > MAX_GRID_BITS || bits % GRID_STEP != 0 {
            return Err(PipelineError::hash(format!(
                "bit length must be a multiple of {GRID_STEP} between {GRID_STEP} and {MAX_GRID_BITS}, got {bits}"
            )));
        }

        let hasher = HasherConfig::new()
            .hash_alg(HashAlg::Blockhash)
            .hash_size(bits, bits)
            .to_hasher();

        let hash = match selector {
            SELECTOR_PRECISE => hasher.hash_image(&image.image),
            SELECTOR_QUICK => hasher.hash_image(&crop_to_grid(&image.image, bits)),
            other => {
                return Err(PipelineError::hash(format!(
                    "unknown hash method selector {other}"
                )))
            }
        };

        Ok(Fingerprint::new(to_hex(hash.as_bytes())))
    }
}

/// Trim right and bottom edges so both sides divide evenly by `bits`.
///
/// Frames smaller than the grid are returned whole.
fn crop_to_grid(image: &DynamicImage, bits: u32) -> DynamicImage {
    let (width, height) = image.dimensions();
    if width < bits || height < bits {
        return image.clone();
    }
    let even_width = width - width % bits;
    let even_height = height - height % bits;
    if even_width == width && even_height == height {
        return image.clone();
    }
    image.crop_imm(0, 0, even_width, even_height)
}

fn to_hex(bytes: &[u8]) -> String {
    let mut hex = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing to a String cannot fail
        let _ = write!(hex, "{byte:02x}");
    }
    hex
}

/// Forwards a decoded image and the caller's request to the hasher.
pub struct HashInvoker {
    hasher: Box<dyn PerceptualHasher>,
}

impl Default for HashInvoker {
    fn default() -> Self {
        Self::new(Box::new(BlockHasher))
    }
}

impl HashInvoker {
    pub fn new(hasher: Box<dyn PerceptualHasher>) -> Self {
        Self { hasher }
    }

    pub fn invoke(
        &self,
        image: &DecodedImage,
        request: HashRequest,
    ) -> Result<Fingerprint, PipelineError> {
        self.hasher
            .hash(image, request.bits, request.method.selector())
    }
}

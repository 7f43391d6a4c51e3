//! Interfaces to whatever produces and consumes coefficient buffers.
//!
//! The codec works on plain `[i16]` slices. Turning a JPEG file into quantized
//! DCT coefficients and back is the job of a [`CarrierCodec`]. The crate ships
//! [`crate::container::ContainerCodec`] for its own coefficient file format.

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::error::{Result, StegoError};
use crate::BLOCK_SIZE;

/// Quantized DCT coefficients of one image, with minimal geometry.
#[derive(Clone, PartialEq, Eq)]
pub struct CoefficientImage {
    /// Coefficients in 8x8 blocks of 64, DC first.
    pub coefficients: Vec<i16>,
    pub width: u32,
    pub height: u32,
    /// Quality the coefficients are quantized at.
    pub quality: u8,
}

impl fmt::Debug for CoefficientImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoefficientImage")
            .field("coefficients", &self.coefficients.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("quality", &self.quality)
            .finish()
    }
}

impl CoefficientImage {
    pub fn new(coefficients: Vec<i16>, width: u32, height: u32, quality: u8) -> Self {
        Self {
            coefficients,
            width,
            height,
            quality,
        }
    }

    /// Number of 8x8 blocks.
    pub fn blocks(&self) -> usize {
        self.coefficients.len() / BLOCK_SIZE
    }

    /// Check the buffer is whole blocks and the quality is in range.
    pub fn validate(&self) -> Result<()> {
        if self.coefficients.len() % BLOCK_SIZE != 0 {
            return Err(StegoError::invalid_input(format!(
                "coefficient count {} is not a multiple of {BLOCK_SIZE}",
                self.coefficients.len()
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(StegoError::invalid_input(format!(
                "quality {} is outside 1..=100",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Parses carrier bytes into coefficients and writes them back.
pub trait CarrierCodec {
    fn parse(&self, data: &[u8]) -> Result<CoefficientImage>;

    /// Serialize `image`, quantized at `quality`.
    fn serialize(&self, image: &CoefficientImage, quality: u8) -> Result<Vec<u8>>;
}

/// Anything that can yield a coefficient image.
pub trait CoefficientSource {
    fn coefficients(&self) -> Result<CoefficientImage>;
}

impl CoefficientSource for CoefficientImage {
    fn coefficients(&self) -> Result<CoefficientImage> {
        Ok(self.clone())
    }
}

/// Encoded carrier bytes together with the codec that understands them.
pub struct EncodedSource<'a, C: CarrierCodec> {
    codec: &'a C,
    data: &'a [u8],
}

impl<'a, C: CarrierCodec> EncodedSource<'a, C> {
    pub fn new(codec: &'a C, data: &'a [u8]) -> Self {
        Self { codec, data }
    }
}

impl<C: CarrierCodec> CoefficientSource for EncodedSource<'_, C> {
    fn coefficients(&self) -> Result<CoefficientImage> {
        self.codec.parse(self.data)
    }
}

/// Deterministic pseudo-random coefficients, shaped roughly like a real JPEG.
///
/// DC values are large, most AC values are small with a long tail. Useful for
/// trying the codec without a decoder at hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntheticSource {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
    pub seed: u64,
}

impl SyntheticSource {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            quality: crate::options::DEFAULT_QUALITY,
            seed,
        }
    }

    fn block_count(&self) -> usize {
        let cols = (self.width as usize).div_ceil(8);
        let rows = (self.height as usize).div_ceil(8);
        cols * rows
    }
}

impl CoefficientSource for SyntheticSource {
    fn coefficients(&self) -> Result<CoefficientImage> {
        if self.width == 0 || self.height == 0 {
            return Err(StegoError::invalid_input("synthetic image has no pixels"));
        }

        let mut rng = ChaCha20Rng::seed_from_u64(self.seed);
        let mut coefficients = Vec::with_capacity(self.block_count() * BLOCK_SIZE);
        for _ in 0..self.block_count() {
            coefficients.push(rng.gen_range(-256..256i32) as i16);
            for k in 1..BLOCK_SIZE as u32 {
                // higher frequencies decay
                let spread = 4 + 48 / k;
                let magnitude = rng.gen_range(0..spread) as i16;
                let value = if rng.gen::<bool>() { -magnitude } else { magnitude };
                coefficients.push(value);
            }
        }

        Ok(CoefficientImage::new(
            coefficients,
            self.width,
            self.height,
            self.quality,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_is_deterministic() {
        let a = SyntheticSource::new(64, 48, 7).coefficients().unwrap();
        let b = SyntheticSource::new(64, 48, 7).coefficients().unwrap();
        let c = SyntheticSource::new(64, 48, 8).coefficients().unwrap();

        assert_eq!(a, b);
        assert_ne!(a.coefficients, c.coefficients);
    }

    #[test]
    fn test_synthetic_geometry() {
        let image = SyntheticSource::new(20, 10, 1).coefficients().unwrap();
        // 3 x 2 blocks
        assert_eq!(image.blocks(), 6);
        assert_eq!(image.width, 20);
        assert_eq!(image.height, 10);
        assert!(image.validate().is_ok());
    }

    #[test]
    fn test_synthetic_has_carriers() {
        let image = SyntheticSource::new(256, 256, 42).coefficients().unwrap();
        let eligible = crate::capacity::eligible_coefficients(&image.coefficients, 5);
        assert!(eligible > image.coefficients.len() / 5, "{eligible}");
    }

    #[test]
    fn test_empty_synthetic_rejected() {
        assert!(SyntheticSource::new(0, 8, 1).coefficients().is_err());
    }

    #[test]
    fn test_validate_partial_block() {
        let image = CoefficientImage::new(vec![0; 65], 8, 8, 85);
        assert!(matches!(
            image.validate(),
            Err(StegoError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_debug_shows_length_only() {
        let image = CoefficientImage::new(vec![0; 128], 16, 8, 85);
        assert_eq!(
            format!("{image:?}"),
            "CoefficientImage { coefficients: 128, width: 16, height: 8, quality: 85 }"
        );
    }
}

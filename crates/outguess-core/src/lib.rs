//! LSB Steganography in Quantized JPEG DCT Coefficients
//!
//! This crate hides an arbitrary byte payload in the least significant bits of
//! the AC coefficients of a JPEG image and recovers it later, with integrity
//! verification, optional password protection, capacity estimation, a
//! recompression robustness check and a statistical detector.
//!
//! # Layer Responsibilities
//!
//! The crate works on buffers of quantized DCT coefficients, grouped in 8x8
//! blocks of 64 with the DC coefficient first:
//! - Keyed permutation of the AC positions ([`sequence`])
//! - Bit packing into coefficient magnitudes ([`bits`])
//! - Length + CRC-32 framing ([`frame`])
//! - Password protection ([`cipher`], [`obfuscate`])
//!
//! Turning JPEG files into coefficients is left to a [`CarrierCodec`]. The
//! crate ships [`ContainerCodec`], a coefficient file format.
//!
//! # Example
//!
//! ```
//! use outguess_core::{CoefficientSource, EmbedOptions, SyntheticSource};
//!
//! let mut image = SyntheticSource::new(256, 256, 42).coefficients()?;
//! let options = EmbedOptions::default();
//!
//! let result = outguess_core::embed(&mut image.coefficients, b"hello world", &options)?;
//! assert_eq!(result.message_size, 11);
//!
//! let decoded = outguess_core::extract(&image.coefficients, None)?;
//! assert_eq!(decoded.message, "hello world");
//! # Ok::<(), outguess_core::StegoError>(())
//! ```

pub mod bits;
pub mod capacity;
pub mod carrier;
pub mod cipher;
pub mod codec;
pub mod config;
pub mod container;
pub mod detect;
mod error;
pub mod frame;
pub mod obfuscate;
pub mod options;
pub mod pool;
pub mod quality;
pub mod sequence;

pub use carrier::{
    CarrierCodec, CoefficientImage, CoefficientSource, EncodedSource, SyntheticSource,
};
pub use codec::{Codec, DecodeResult, EmbedResult, EmbeddingStats};
pub use config::Config;
pub use container::ContainerCodec;
pub use detect::DetectionReport;
pub use error::{ErrorKind, Result, StegoError};
pub use options::{min_magnitude, EmbedOptions, Password, Protection};
pub use pool::WorkerPool;
pub use sequence::{EmbeddingSequence, DEFAULT_SEED};

/// Coefficients per 8x8 DCT block.
pub const BLOCK_SIZE: usize = 64;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Embed `message` with the default [`Codec`].
pub fn embed(
    coefficients: &mut [i16],
    message: &[u8],
    options: &EmbedOptions,
) -> Result<EmbedResult> {
    Codec::default().embed(coefficients, message, options)
}

/// Extract a text message with the default [`Codec`].
pub fn extract(coefficients: &[i16], password: Option<&str>) -> Result<DecodeResult> {
    Codec::default().extract(coefficients, password)
}

/// Check if a buffer looks like it carries a payload, see [`detect`].
pub fn has_hidden_data(coefficients: &[i16]) -> bool {
    detect::has_hidden_data(coefficients)
}

/// Largest message that fits with `options` and the default [`Codec`].
pub fn max_message_size(coefficients: &[i16], options: &EmbedOptions) -> usize {
    Codec::default().max_message_size(coefficients, options)
}

/// Check if the message in `image` survives a re-encode at `quality`.
pub fn survives_recompression<C>(
    carrier: &C,
    image: &CoefficientImage,
    quality: u8,
    password: Option<&str>,
) -> bool
where
    C: CarrierCodec + ?Sized,
{
    Codec::default().survives_recompression(carrier, image, quality, password)
}

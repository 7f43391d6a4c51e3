//! Embedding into and extraction from coefficient buffers.
//!
//! Wire layout inside the carriers is `header ‖ payload`, see [`crate::frame`].
//! The carriers are the AC coefficients visited by the [`EmbeddingSequence`]
//! whose magnitude reaches the threshold of the chosen compression resistance.

use std::time::{Duration, Instant};

use log::{debug, log, Level};

use crate::bits::{count_carriers, read_bits, write_bits};
use crate::capacity;
use crate::carrier::{CarrierCodec, CoefficientImage};
use crate::cipher;
use crate::error::{Result, StegoError};
use crate::frame::{self, Header, HEADER_BITS, HEADER_LEN};
use crate::obfuscate;
use crate::options::{min_magnitude, EmbedOptions, Protection, DEFAULT_COMPRESSION_RESISTANCE};
use crate::sequence::{EmbeddingSequence, DEFAULT_SEED, MAX_COEFFICIENTS};

/// Every threshold [`min_magnitude`] can yield, lowest first.
const CARRIER_THRESHOLDS: [u16; 4] = [2, 4, 6, 8];

/// Statistics about how much of a carrier a payload occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingStats {
    /// Coefficients holding a payload bit (header included).
    pub coefficients_used: usize,
    pub total_coefficients: usize,
    /// AC coefficients at or above the threshold.
    pub eligible_coefficients: usize,
    /// `coefficients_used / eligible_coefficients`, 0 when nothing is eligible.
    pub capacity_utilization: f64,
}

impl EmbeddingStats {
    fn new(
        coefficients_used: usize,
        total_coefficients: usize,
        eligible_coefficients: usize,
    ) -> Self {
        let capacity_utilization = if eligible_coefficients == 0 {
            0.0
        } else {
            coefficients_used as f64 / eligible_coefficients as f64
        };
        Self {
            coefficients_used,
            total_coefficients,
            eligible_coefficients,
            capacity_utilization,
        }
    }
}

/// Outcome of a successful embed.
#[derive(Debug, Clone)]
pub struct EmbedResult {
    /// Message length in bytes, before protection.
    pub message_size: usize,
    /// Bytes written into the carrier, header included.
    pub payload_size: usize,
    /// Carrier size in bytes before embedding.
    pub original_size: usize,
    /// Carrier size in bytes after embedding.
    pub embedded_size: usize,
    pub stats: EmbeddingStats,
    pub elapsed: Duration,
}

impl EmbedResult {
    pub fn size_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 1.0;
        }
        self.embedded_size as f64 / self.original_size as f64
    }
}

/// Outcome of a successful extraction.
///
/// `T` is `String` for text, `Vec<u8>` for raw payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeResult<T = String> {
    pub message: T,
    /// Message length in bytes.
    pub size: usize,
    /// The payload checksum matched.
    pub verified: bool,
    pub elapsed: Duration,
}

/// Embeds and extracts payloads. Both sides must agree on seed and protection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    seed: String,
    protection: Protection,
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(DEFAULT_SEED, Protection::default())
    }
}

/// A frame found in a buffer.
struct Located {
    threshold: u16,
    header: Header,
    payload: Vec<u8>,
}

impl Codec {
    pub fn new(seed: impl Into<String>, protection: Protection) -> Self {
        Self {
            seed: seed.into(),
            protection,
        }
    }

    pub fn with_protection(mut self, protection: Protection) -> Self {
        self.protection = protection;
        self
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn protection(&self) -> Protection {
        self.protection
    }

    /// Embed `message` into `coefficients` in place.
    ///
    /// On failure the buffer is left untouched.
    pub fn embed(
        &self,
        coefficients: &mut [i16],
        message: &[u8],
        options: &EmbedOptions,
    ) -> Result<EmbedResult> {
        self.embed_with_progress(coefficients, message, options, |_| {})
    }

    /// Like [`Codec::embed`], reporting progress from 0 to 100 percent.
    pub fn embed_with_progress<F>(
        &self,
        coefficients: &mut [i16],
        message: &[u8],
        options: &EmbedOptions,
        mut progress: F,
    ) -> Result<EmbedResult>
    where
        F: FnMut(u8),
    {
        let start = Instant::now();
        progress(0);

        options.validate()?;
        check_buffer_len(coefficients)?;
        if message.is_empty() {
            return Err(StegoError::invalid_input("message is empty"));
        }
        let limit = capacity::message_limit(options, self.protection);
        if message.len() > limit {
            return Err(StegoError::MessageTooLarge {
                size: message.len(),
                max: limit,
            });
        }
        progress(10);

        let payload = match options.password.as_deref() {
            Some(password) => self.protect(message, password)?,
            None => message.to_vec(),
        };
        let framed = frame::frame(&payload)?;
        progress(30);

        let sequence = EmbeddingSequence::new(coefficients.len(), &self.seed);
        let threshold = options.min_magnitude();
        debug!(
            "sequence of {} positions, threshold {}",
            sequence.len(),
            threshold
        );
        progress(50);

        let required = framed.len() * 8;
        let available = count_carriers(coefficients, &sequence, threshold);
        if required > available {
            return Err(StegoError::InsufficientCapacity {
                required,
                available,
            });
        }

        let written = write_bits(coefficients, &sequence, &framed, threshold)?;
        debug!("{written} bits written");
        progress(90);

        let readback = read_bits(coefficients, &sequence, framed.len(), threshold)?;
        if readback != framed {
            return Err(StegoError::IntegrityCheckFailed {
                expected: crc32fast::hash(&framed),
                actual: crc32fast::hash(&readback),
            });
        }
        progress(100);

        let carrier_size = coefficients.len() * std::mem::size_of::<i16>();
        let result = EmbedResult {
            message_size: message.len(),
            payload_size: framed.len(),
            original_size: carrier_size,
            embedded_size: carrier_size,
            stats: EmbeddingStats::new(written, coefficients.len(), available),
            elapsed: start.elapsed(),
        };

        let level = if options.verbose { Level::Info } else { Level::Debug };
        log!(
            level,
            "embedded {} bytes ({} on the wire) using {:.1}% of capacity in {:?}",
            result.message_size,
            result.payload_size,
            result.stats.capacity_utilization * 100.0,
            result.elapsed
        );

        Ok(result)
    }

    /// Extract a text message.
    ///
    /// A payload that cannot be unprotected or is not UTF-8 is reported as
    /// [`StegoError::DecryptionFailed`].
    pub fn extract(&self, coefficients: &[i16], password: Option<&str>) -> Result<DecodeResult> {
        let raw = self.extract_bytes(coefficients, password)?;
        let message = String::from_utf8(raw.message).map_err(|_| StegoError::DecryptionFailed)?;

        Ok(DecodeResult {
            message,
            size: raw.size,
            verified: raw.verified,
            elapsed: raw.elapsed,
        })
    }

    /// Extract the raw payload bytes, without text decoding.
    pub fn extract_bytes(
        &self,
        coefficients: &[i16],
        password: Option<&str>,
    ) -> Result<DecodeResult<Vec<u8>>> {
        let start = Instant::now();
        let located = self.locate(coefficients)?;
        debug!(
            "found {} byte payload at threshold {}",
            located.header.length, located.threshold
        );

        let message = match password {
            Some(password) => self.unprotect(&located.payload, password)?,
            None => located.payload,
        };

        Ok(DecodeResult {
            size: message.len(),
            message,
            verified: true,
            elapsed: start.elapsed(),
        })
    }

    /// Largest message that fits with `options`, see [`capacity::max_message_size`].
    pub fn max_message_size(&self, coefficients: &[i16], options: &EmbedOptions) -> usize {
        capacity::max_message_size(coefficients, options, self.protection)
    }

    /// Usage statistics of a buffer.
    ///
    /// If the buffer holds a payload the stats describe it, otherwise the
    /// eligible count is taken at the default compression resistance.
    pub fn stats(&self, coefficients: &[i16]) -> EmbeddingStats {
        match self.locate(coefficients) {
            Ok(located) => {
                let used = (HEADER_LEN + located.payload.len()) * 8;
                let eligible = eligible_at(coefficients, located.threshold);
                EmbeddingStats::new(used, coefficients.len(), eligible)
            }
            Err(_) => {
                let eligible =
                    capacity::eligible_coefficients(coefficients, DEFAULT_COMPRESSION_RESISTANCE);
                EmbeddingStats::new(0, coefficients.len(), eligible)
            }
        }
    }

    /// Check if the message in `image` survives a re-encode at `quality`.
    ///
    /// Any failure along the way counts as not surviving.
    pub fn survives_recompression<C>(
        &self,
        carrier: &C,
        image: &CoefficientImage,
        quality: u8,
        password: Option<&str>,
    ) -> bool
    where
        C: CarrierCodec + ?Sized,
    {
        let original = match self.extract_bytes(&image.coefficients, password) {
            Ok(decoded) => decoded.message,
            Err(err) => {
                debug!("no message before recompression: {err}");
                return false;
            }
        };

        let recompressed = carrier
            .serialize(image, quality)
            .and_then(|bytes| carrier.parse(&bytes))
            .and_then(|image| self.extract_bytes(&image.coefficients, password));

        match recompressed {
            Ok(decoded) => decoded.message == original,
            Err(err) => {
                debug!("message lost at quality {quality}: {err}");
                false
            }
        }
    }

    fn protect(&self, message: &[u8], password: &str) -> Result<Vec<u8>> {
        match self.protection {
            Protection::Keystream => Ok(obfuscate::seal(message, password)),
            Protection::Sealed => Ok(cipher::seal(password, message)?),
        }
    }

    fn unprotect(&self, payload: &[u8], password: &str) -> Result<Vec<u8>> {
        match self.protection {
            Protection::Keystream => {
                obfuscate::open(payload, password).ok_or(StegoError::DecryptionFailed)
            }
            Protection::Sealed => {
                cipher::open(password, payload).map_err(|_| StegoError::DecryptionFailed)
            }
        }
    }

    /// Find the frame, trying every threshold an embedder could have used.
    ///
    /// When none verifies, the error that got furthest is returned.
    fn locate(&self, coefficients: &[i16]) -> Result<Located> {
        check_buffer_len(coefficients)?;
        let sequence = EmbeddingSequence::new(coefficients.len(), &self.seed);

        let mut best: Option<StegoError> = None;
        for threshold in CARRIER_THRESHOLDS {
            match read_frame(coefficients, &sequence, threshold) {
                Ok((header, payload)) => {
                    return Ok(Located {
                        threshold,
                        header,
                        payload,
                    })
                }
                Err(err) => {
                    if best.as_ref().map_or(true, |b| progress_rank(&err) > progress_rank(b)) {
                        best = Some(err);
                    }
                }
            }
        }

        Err(best.unwrap_or(StegoError::InsufficientCapacity {
            required: HEADER_BITS,
            available: 0,
        }))
    }
}

fn read_frame(
    coefficients: &[i16],
    sequence: &EmbeddingSequence,
    threshold: u16,
) -> Result<(Header, Vec<u8>)> {
    let header_bytes = read_bits(coefficients, sequence, HEADER_LEN, threshold)?;
    let header_bytes: [u8; HEADER_LEN] = header_bytes.as_slice().try_into().map_err(|_| {
        StegoError::InsufficientCapacity {
            required: HEADER_BITS,
            available: count_carriers(coefficients, sequence, threshold),
        }
    })?;
    let header = Header::parse(&header_bytes)?;

    let total = HEADER_LEN + header.length as usize;
    let mut framed = read_bits(coefficients, sequence, total, threshold)?;
    if framed.len() < total {
        return Err(StegoError::InsufficientCapacity {
            required: total * 8,
            available: count_carriers(coefficients, sequence, threshold),
        });
    }

    let payload = framed.split_off(HEADER_LEN);
    header.verify(&payload)?;
    Ok((header, payload))
}

/// How far an extraction attempt got before failing.
fn progress_rank(err: &StegoError) -> u8 {
    match err {
        StegoError::IntegrityCheckFailed { .. } => 3,
        StegoError::InsufficientCapacity { .. } => 2,
        StegoError::InvalidHeader { .. } => 1,
        _ => 0,
    }
}

fn eligible_at(coefficients: &[i16], threshold: u16) -> usize {
    // every resistance maps onto one of the thresholds
    let resistance = (1..=10u8)
        .find(|&r| min_magnitude(r) == threshold)
        .unwrap_or(DEFAULT_COMPRESSION_RESISTANCE);
    capacity::eligible_coefficients(coefficients, resistance)
}

fn check_buffer_len(coefficients: &[i16]) -> Result<()> {
    if coefficients.len() > MAX_COEFFICIENTS {
        return Err(StegoError::invalid_input(format!(
            "{} coefficients exceed the maximum of {MAX_COEFFICIENTS}",
            coefficients.len()
        )));
    }
    Ok(())
}

//! Payload frame construction and parsing.
//!
//! The frame is what actually travels through the coefficients:
//!
//! ```text
//! [4 bytes] payload length (big-endian u32)
//! [4 bytes] CRC-32 of the payload (big-endian u32)
//! [N bytes] payload (after password protection, if any)
//! ```
//!
//! The checksum covers the protected bytes, so an extractor can reject a
//! corrupted carrier before trying to interpret the plaintext.

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Result, StegoError};

/// Header size in bytes: 4 bytes length + 4 bytes CRC-32.
pub const HEADER_LEN: usize = 8;

/// Header size in bits.
pub const HEADER_BITS: usize = HEADER_LEN * 8;

/// Largest payload length a header may announce (10 MiB).
pub const MAX_MESSAGE_SIZE: usize = 10 * 1024 * 1024;

/// Parsed frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Payload length in bytes.
    pub length: u32,
    /// CRC-32 of the payload.
    pub checksum: u32,
}

impl Header {
    /// Build the header describing `payload`.
    pub fn for_payload(payload: &[u8]) -> Result<Self> {
        if payload.is_empty() || payload.len() > MAX_MESSAGE_SIZE {
            return Err(StegoError::invalid_input(format!(
                "payload length {} is outside 1..={}",
                payload.len(),
                MAX_MESSAGE_SIZE
            )));
        }

        Ok(Header {
            length: payload.len() as u32,
            checksum: crc32fast::hash(payload),
        })
    }

    /// Parse the 8 header bytes.
    ///
    /// # Errors
    /// `InvalidHeader` if the length is zero or exceeds [`MAX_MESSAGE_SIZE`].
    pub fn parse(bytes: &[u8; HEADER_LEN]) -> Result<Self> {
        let length = BigEndian::read_u32(&bytes[0..4]);
        let checksum = BigEndian::read_u32(&bytes[4..8]);

        if length == 0 || length as usize > MAX_MESSAGE_SIZE {
            return Err(StegoError::InvalidHeader { length });
        }

        Ok(Header { length, checksum })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        BigEndian::write_u32(&mut bytes[0..4], self.length);
        BigEndian::write_u32(&mut bytes[4..8], self.checksum);
        bytes
    }

    /// Check the extracted payload against the announced checksum.
    pub fn verify(&self, payload: &[u8]) -> Result<()> {
        let actual = crc32fast::hash(payload);
        if actual != self.checksum {
            return Err(StegoError::IntegrityCheckFailed {
                expected: self.checksum,
                actual,
            });
        }
        Ok(())
    }
}

/// Prefix `payload` with its header.
pub fn frame(payload: &[u8]) -> Result<Vec<u8>> {
    let header = Header::for_payload(payload)?;

    let mut framed = Vec::with_capacity(HEADER_LEN + payload.len());
    framed.extend_from_slice(&header.to_bytes());
    framed.extend_from_slice(payload);
    Ok(framed)
}

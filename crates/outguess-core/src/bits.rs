//! Packing payload bits into coefficient LSBs.
//!
//! Bits are taken most significant first from each payload byte. A bit
//! replaces the least significant bit of the coefficient's magnitude, so the
//! sign and all higher bits survive. Because the magnitude threshold is always
//! even, an LSB write never moves a coefficient across it and the extractor
//! sees exactly the carriers the embedder used.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::{Result, StegoError};
use crate::sequence::EmbeddingSequence;

/// Check if a coefficient can carry a bit at the given threshold.
#[inline]
pub fn is_carrier(coeff: i16, min_magnitude: u16) -> bool {
    // i16::MIN has no representable odd neighbour of the same sign
    coeff != i16::MIN && coeff.unsigned_abs() >= min_magnitude
}

/// Count carriers among the AC coefficients.
pub fn count_carriers(
    coefficients: &[i16],
    sequence: &EmbeddingSequence,
    min_magnitude: u16,
) -> usize {
    sequence
        .iter()
        .filter(|&idx| is_carrier(coefficients[idx], min_magnitude))
        .count()
}

/// Write `payload` into the coefficients along `sequence`.
///
/// # Returns
/// The number of coefficients that received a bit.
///
/// # Errors
/// `InsufficientCapacity` when the sequence runs out before the last bit.
/// Coefficients visited so far have been modified in that case, so callers
/// check capacity upfront when the buffer must stay untouched on failure.
pub fn write_bits(
    coefficients: &mut [i16],
    sequence: &EmbeddingSequence,
    payload: &[u8],
    min_magnitude: u16,
) -> Result<usize> {
    let required = payload.len() * 8;
    let mut reader = BitReader::endian(payload, BigEndian);
    let mut carriers = sequence
        .iter()
        .filter(|&idx| is_carrier(coefficients[idx], min_magnitude))
        .collect::<Vec<_>>()
        .into_iter();

    for written in 0..required {
        let bit = reader.read_bit()?;
        let idx = carriers.next().ok_or(StegoError::InsufficientCapacity {
            required,
            available: written,
        })?;
        coefficients[idx] = with_lsb(coefficients[idx], bit);
    }

    Ok(required)
}

/// Read `expected_bytes` bytes from the coefficients along `sequence`.
///
/// Returns fewer bytes only when the sequence is exhausted first.
pub fn read_bits(
    coefficients: &[i16],
    sequence: &EmbeddingSequence,
    expected_bytes: usize,
    min_magnitude: u16,
) -> Result<Vec<u8>> {
    let mut writer = BitWriter::endian(Vec::with_capacity(expected_bytes), BigEndian);
    let mut bits_left = expected_bytes * 8;

    for idx in sequence.iter() {
        if bits_left == 0 {
            break;
        }
        let coeff = coefficients[idx];
        if !is_carrier(coeff, min_magnitude) {
            continue;
        }
        writer.write_bit(coeff.unsigned_abs() & 1 == 1)?;
        bits_left -= 1;
    }

    // drop a trailing partial byte
    Ok(writer.into_writer())
}

/// Replace the LSB of the magnitude, keeping the sign.
#[inline]
fn with_lsb(coeff: i16, bit: bool) -> i16 {
    let magnitude = coeff.unsigned_abs();
    let magnitude = if bit { magnitude | 1 } else { magnitude & !1 };
    // magnitude <= i16::MAX because carriers exclude i16::MIN
    let value = magnitude as i16;
    if coeff < 0 {
        -value
    } else {
        value
    }
}

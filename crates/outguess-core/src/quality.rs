//! JPEG quality scaling and coefficient requantization.
//!
//! Uses the standard IJG (Independent JPEG Group) luminance table scaled by
//! the libjpeg quality formula. Requantizing coefficients from one quality to
//! another is what a decode + re-encode cycle does to the DCT domain, minus the
//! rounding noise of the pixel round trip.

use crate::BLOCK_SIZE;

/// IJG base luminance quantization table, natural (row-major) order.
#[rustfmt::skip]
pub const IJG_LUMINANCE: [u16; BLOCK_SIZE] = [
    16,  11,  10,  16,  24,  40,  51,  61,
    12,  12,  14,  19,  26,  58,  60,  55,
    14,  13,  16,  24,  40,  57,  69,  56,
    14,  17,  22,  29,  51,  87,  80,  62,
    18,  22,  37,  56,  68, 109, 103,  77,
    24,  35,  55,  64,  81, 104, 113,  92,
    49,  64,  78,  87, 103, 121, 120, 101,
    72,  92,  95,  98, 112, 100, 103,  99,
];

/// libjpeg's percentage scale for a quality (clamped to 1..=100).
pub fn scale_factor(quality: u8) -> u32 {
    let quality = quality.clamp(1, 100) as u32;
    if quality < 50 {
        5000 / quality
    } else {
        200 - quality * 2
    }
}

/// Luminance quantization table for `quality`.
pub fn quantization_table(quality: u8) -> [u16; BLOCK_SIZE] {
    let scale = scale_factor(quality);
    IJG_LUMINANCE.map(|base| ((base as u32 * scale + 50) / 100).clamp(1, 255) as u16)
}

/// Requantize a coefficient buffer from quality `from` to quality `to`.
///
/// Each value becomes `round(c * Q_from[k] / Q_to[k])` with `k` its position in
/// the 8x8 block. A trailing partial block is treated positionally as well.
pub fn requantize(coefficients: &mut [i16], from: u8, to: u8) {
    if from == to {
        return;
    }
    let old = quantization_table(from);
    let new = quantization_table(to);

    for (i, coeff) in coefficients.iter_mut().enumerate() {
        let k = i % BLOCK_SIZE;
        *coeff = rescale(*coeff, old[k], new[k]);
    }
}

fn rescale(coeff: i16, old_q: u16, new_q: u16) -> i16 {
    let scaled = coeff as i32 * old_q as i32;
    let q = new_q as i32;
    // round half away from zero
    let rounded = if scaled >= 0 {
        (scaled + q / 2) / q
    } else {
        -((-scaled + q / 2) / q)
    };
    rounded.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

//! Heuristic detection of LSB payloads.
//!
//! Two signals are combined and both must fire:
//! - LSB balance: in natural images about half of the sampled AC coefficients
//!   have an even magnitude. A payload written over them skews that ratio.
//! - Histogram entropy of all coefficient values.
//!
//! This is a heuristic, not a proof. A single signal is treated as inconclusive.
//!
//! The LSB signal only sees payloads whose bits are biased. On synthetic
//! carriers filled to capacity at resistance 1:
//! - constant fill (all `0x00` or all `0xFF`) is flagged in at least 95 % of
//!   carriers;
//! - random bytes, ASCII text and anything sealed with a password keep the
//!   ratio near one half and are not flagged.

use std::collections::HashMap;

use crate::sequence::is_dc_coefficient;

/// Upper bound on sampled AC coefficients.
pub const SAMPLE_LIMIT: usize = 5000;

/// Minimum magnitude for a coefficient to be sampled.
pub const SAMPLE_MIN_MAGNITUDE: u16 = 2;

/// Samples needed before the LSB balance is judged.
pub const MIN_SAMPLES: usize = 100;

/// Allowed deviation of the even-LSB ratio from one half.
pub const LSB_TOLERANCE: f64 = 0.1;

/// Histogram entropy (bits) above which the buffer counts as busy.
pub const ENTROPY_THRESHOLD: f64 = 0.7;

/// Raw figures behind a detection verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionReport {
    pub sampled: usize,
    /// Sampled coefficients with an even magnitude.
    pub even_lsb: usize,
    /// Shannon entropy of the value histogram, in bits.
    pub entropy: f64,
}

impl DetectionReport {
    /// Ratio of even LSBs, `None` when too few samples were taken.
    pub fn lsb_ratio(&self) -> Option<f64> {
        (self.sampled > MIN_SAMPLES).then(|| self.even_lsb as f64 / self.sampled as f64)
    }

    pub fn lsb_skewed(&self) -> bool {
        self.lsb_ratio()
            .map_or(false, |ratio| (ratio - 0.5).abs() > LSB_TOLERANCE)
    }

    pub fn entropy_high(&self) -> bool {
        self.entropy > ENTROPY_THRESHOLD
    }

    pub fn is_suspicious(&self) -> bool {
        self.lsb_skewed() && self.entropy_high()
    }
}

/// Gather the detection figures for a buffer.
pub fn analyze(coefficients: &[i16]) -> DetectionReport {
    let mut sampled = 0;
    let mut even_lsb = 0;
    for &c in coefficients
        .iter()
        .enumerate()
        .filter(|&(i, &c)| !is_dc_coefficient(i) && c.unsigned_abs() >= SAMPLE_MIN_MAGNITUDE)
        .map(|(_, c)| c)
        .take(SAMPLE_LIMIT)
    {
        sampled += 1;
        if c.unsigned_abs() & 1 == 0 {
            even_lsb += 1;
        }
    }

    DetectionReport {
        sampled,
        even_lsb,
        entropy: histogram_entropy(coefficients),
    }
}

/// Check if a buffer looks like it carries an LSB payload.
pub fn has_hidden_data(coefficients: &[i16]) -> bool {
    let report = analyze(coefficients);
    log::debug!(
        "detection: {} sampled, lsb ratio {:?}, entropy {:.3}",
        report.sampled,
        report.lsb_ratio(),
        report.entropy
    );
    report.is_suspicious()
}

fn histogram_entropy(coefficients: &[i16]) -> f64 {
    if coefficients.is_empty() {
        return 0.0;
    }

    let mut histogram: HashMap<i16, usize> = HashMap::new();
    for &c in coefficients {
        *histogram.entry(c).or_default() += 1;
    }

    let total = coefficients.len() as f64;
    histogram
        .values()
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

//! Capacity estimation.

use crate::frame::{HEADER_LEN, MAX_MESSAGE_SIZE};
use crate::options::{min_magnitude, EmbedOptions, Protection};
use crate::sequence::is_dc_coefficient;

/// Count AC coefficients whose magnitude reaches the threshold of `resistance`.
///
/// Matches the carrier set the bit packer uses, independent of sequence order.
pub fn eligible_coefficients(coefficients: &[i16], resistance: u8) -> usize {
    let threshold = min_magnitude(resistance);
    coefficients
        .iter()
        .enumerate()
        .filter(|&(i, &c)| !is_dc_coefficient(i) && crate::bits::is_carrier(c, threshold))
        .count()
}

/// Largest message (in bytes) that fits, accounting for header and protection.
///
/// Capped at [`message_limit`].
pub fn max_message_size(
    coefficients: &[i16],
    options: &EmbedOptions,
    protection: Protection,
) -> usize {
    let eligible = eligible_coefficients(coefficients, options.compression_resistance);

    (eligible / 8)
        .saturating_sub(HEADER_LEN + overhead(options, protection))
        .min(message_limit(options, protection))
}

/// Longest message `options` accept, kept inside the wire limit once protected.
pub fn message_limit(options: &EmbedOptions, protection: Protection) -> usize {
    options
        .max_message_size
        .min(MAX_MESSAGE_SIZE - overhead(options, protection))
}

fn overhead(options: &EmbedOptions, protection: Protection) -> usize {
    if options.password.is_some() {
        protection.overhead()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligible_ignores_dc() {
        let coeffs = vec![100i16; 128];
        assert_eq!(eligible_coefficients(&coeffs, 1), 126);
    }

    #[test]
    fn test_empty_carrier_has_no_capacity() {
        let options = EmbedOptions::default();
        assert_eq!(max_message_size(&[], &options, Protection::Sealed), 0);
        assert_eq!(max_message_size(&[0; 640], &options, Protection::Sealed), 0);
    }

    #[test]
    fn test_capacity_formula() {
        // 63 * 20 = 1260 carriers => 157 bytes, minus 8 header bytes
        let coeffs = vec![9i16; 64 * 20];
        let options = EmbedOptions::default();
        assert_eq!(max_message_size(&coeffs, &options, Protection::Sealed), 149);

        let options = options.with_password("pw");
        assert_eq!(max_message_size(&coeffs, &options, Protection::Sealed), 149 - 72);
        assert_eq!(max_message_size(&coeffs, &options, Protection::Keystream), 149 - 4);
    }

    #[test]
    fn test_capped_by_option() {
        let coeffs = vec![9i16; 64 * 20];
        let options = EmbedOptions {
            max_message_size: 10,
            ..Default::default()
        };
        assert_eq!(max_message_size(&coeffs, &options, Protection::Sealed), 10);
    }

    #[test]
    fn test_monotonic_in_resistance() {
        let mut rng = fastrand::Rng::with_seed(12345);
        let coeffs: Vec<i16> = (0..64 * 200).map(|_| rng.i16(-12..=12)).collect();

        let sizes: Vec<usize> = (1..=10)
            .map(|r| {
                let options = EmbedOptions::default().with_compression_resistance(r);
                max_message_size(&coeffs, &options, Protection::Sealed)
            })
            .collect();

        assert!(sizes.windows(2).all(|w| w[0] >= w[1]), "{sizes:?}");
        assert!(sizes[0] > sizes[9]);
    }

    #[test]
    fn test_message_limit_stays_on_the_wire() {
        let options = EmbedOptions {
            max_message_size: usize::MAX,
            ..Default::default()
        };
        assert_eq!(message_limit(&options, Protection::Sealed), MAX_MESSAGE_SIZE);

        let options = options.with_password("pw");
        assert_eq!(
            message_limit(&options, Protection::Sealed),
            MAX_MESSAGE_SIZE - 72
        );
        assert_eq!(
            message_limit(&options, Protection::Keystream),
            MAX_MESSAGE_SIZE - 4
        );
    }
}

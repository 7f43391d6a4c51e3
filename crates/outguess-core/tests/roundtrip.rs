use outguess_core::sequence::EmbeddingSequence;
use outguess_core::*;

/// `blocks` blocks whose AC coefficients all have a magnitude of at least 4.
fn strong_carrier(blocks: usize) -> Vec<i16> {
    let mut rng = fastrand::Rng::with_seed(12345);
    (0..blocks * BLOCK_SIZE)
        .map(|i| {
            if i % BLOCK_SIZE == 0 {
                rng.i16(-1024..1024)
            } else {
                let magnitude = rng.i16(4..=40);
                if rng.bool() {
                    -magnitude
                } else {
                    magnitude
                }
            }
        })
        .collect()
}

fn mixed_carrier(blocks: usize, seed: u64) -> Vec<i16> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..blocks * BLOCK_SIZE).map(|_| rng.i16(-30..=30)).collect()
}

#[test]
fn should_hide_and_unveil_hello_world() {
    // 1700 blocks => 107 100 eligible AC coefficients
    let mut coeffs = strong_carrier(1700);
    let options = EmbedOptions::default();
    assert_eq!(options.compression_resistance, 5);

    let result = embed(&mut coeffs, b"hello world", &options).unwrap();
    assert_eq!(result.message_size, 11);

    let decoded = extract(&coeffs, None).unwrap();
    assert_eq!(decoded.message, "hello world");
    assert!(decoded.verified);
}

#[test]
fn should_hide_and_unveil_with_sealed_password() {
    let mut coeffs = mixed_carrier(200, 1);
    let options = EmbedOptions::default().with_password("resistance is futile");

    let message = "grüße aus dem Koeffizienten";

    let result = embed(&mut coeffs, message.as_bytes(), &options).unwrap();
    assert_eq!(result.payload_size, 8 + message.len() + 72);

    let decoded = extract(&coeffs, Some("resistance is futile")).unwrap();
    assert_eq!(decoded.message, message);
    assert_eq!(decoded.size, message.len());
}

#[test]
fn should_fail_sealed_unveil_with_wrong_password() {
    let mut coeffs = mixed_carrier(200, 2);
    let options = EmbedOptions::default().with_password("correct horse");
    embed(&mut coeffs, b"secret", &options).unwrap();

    let err = extract(&coeffs, Some("battery staple")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecryptionFailed);
}

#[test]
fn should_hide_and_unveil_with_keystream_password() {
    let codec = Codec::default().with_protection(Protection::Keystream);
    let mut coeffs = mixed_carrier(100, 3);
    let options = EmbedOptions::default().with_password("Secret42");

    let result = codec.embed(&mut coeffs, b"hello world", &options).unwrap();
    assert_eq!(result.payload_size, 8 + 4 + 11);

    let decoded = codec.extract(&coeffs, Some("Secret42")).unwrap();
    assert_eq!(decoded.message, "hello world");
}

#[test]
fn should_fail_keystream_unveil_with_wrong_password() {
    let codec = Codec::default().with_protection(Protection::Keystream);
    let mut coeffs = mixed_carrier(100, 4);
    let options = EmbedOptions::default().with_password("Secret42");
    codec.embed(&mut coeffs, b"hello world", &options).unwrap();

    let err = codec.extract(&coeffs, Some("Secret43")).unwrap_err();
    assert!(matches!(err, StegoError::DecryptionFailed));
}

#[test]
fn should_fail_keystream_unveil_when_wrong_key_keeps_text_valid() {
    // a key differing from the right one only below bit 7 turns ASCII into ASCII
    let right = obfuscate::keystream("Secret42");
    let wrong = (0..10_000)
        .map(|i| format!("guess{i}"))
        .find(|candidate| {
            let key = obfuscate::keystream(candidate);
            key != right && key.iter().zip(right.iter()).all(|(a, b)| (a ^ b) < 0x80)
        })
        .expect("a colliding password among the candidates");

    let xored = obfuscate::transform(&obfuscate::transform(b"hello world", "Secret42"), &wrong);
    assert!(std::str::from_utf8(&xored).is_ok());

    let codec = Codec::default().with_protection(Protection::Keystream);
    let mut coeffs = mixed_carrier(100, 4);
    let options = EmbedOptions::default().with_password("Secret42");
    codec.embed(&mut coeffs, b"hello world", &options).unwrap();

    assert!(matches!(
        codec.extract(&coeffs, Some(&wrong)),
        Err(StegoError::DecryptionFailed)
    ));
    assert!(matches!(
        codec.extract_bytes(&coeffs, Some(&wrong)),
        Err(StegoError::DecryptionFailed)
    ));
}

#[test]
fn should_unveil_raw_bytes() {
    let mut coeffs = mixed_carrier(100, 5);
    let payload = [0u8, 159, 146, 150, 255];

    embed(&mut coeffs, &payload, &EmbedOptions::default()).unwrap();

    assert!(matches!(
        extract(&coeffs, None),
        Err(StegoError::DecryptionFailed)
    ));
    let raw = Codec::default().extract_bytes(&coeffs, None).unwrap();
    assert_eq!(raw.message, payload);
    assert_eq!(raw.size, 5);
}

#[test]
fn should_detect_a_flipped_payload_bit() {
    let mut coeffs = strong_carrier(50);
    embed(&mut coeffs, b"do not touch", &EmbedOptions::default()).unwrap();

    // third payload bit, after the 64 header bits
    let sequence = EmbeddingSequence::new(coeffs.len(), DEFAULT_SEED);
    let idx = sequence.as_slice()[64 + 2];
    let c = coeffs[idx];
    let flipped = (c.abs() ^ 1) * c.signum();
    coeffs[idx] = flipped;

    let err = extract(&coeffs, None).unwrap_err();
    assert!(
        matches!(err, StegoError::IntegrityCheckFailed { .. }),
        "{err}"
    );
}

#[test]
fn should_embed_exactly_the_estimated_maximum() {
    let options = EmbedOptions::default();
    let mut coeffs = mixed_carrier(40, 6);
    let max = max_message_size(&coeffs, &options);
    assert!(max > 0);

    let message = vec![b'a'; max];
    embed(&mut coeffs, &message, &options).unwrap();
    assert_eq!(extract(&coeffs, None).unwrap().size, max);

    let mut coeffs = mixed_carrier(40, 6);
    let err = embed(&mut coeffs, &vec![b'a'; max + 1], &options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientCapacity);
}

#[test]
fn should_never_grow_capacity_with_resistance() {
    for seed in 0..5 {
        let coeffs = mixed_carrier(120, seed);
        let sizes: Vec<usize> = (1..=10)
            .map(|r| {
                let options = EmbedOptions::default().with_compression_resistance(r);
                max_message_size(&coeffs, &options)
            })
            .collect();
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]), "{sizes:?}");
    }
}

#[test]
fn should_leave_dc_coefficients_untouched() {
    let mut coeffs = mixed_carrier(60, 7);
    let dc_before: Vec<i16> = coeffs.iter().step_by(BLOCK_SIZE).copied().collect();

    let options = EmbedOptions::default().with_compression_resistance(1);
    let max = max_message_size(&coeffs, &options);
    embed(&mut coeffs, &vec![0x5A; max], &options).unwrap();

    let dc_after: Vec<i16> = coeffs.iter().step_by(BLOCK_SIZE).copied().collect();
    assert_eq!(dc_before, dc_after);
}

#[test]
fn should_report_error_codes() {
    let mut coeffs = vec![0i16; 64 * 10];
    let err = embed(&mut coeffs, b"no room", &EmbedOptions::default()).unwrap_err();

    assert_eq!(err.kind().code(), "INSUFFICIENT_CAPACITY");
    assert_eq!(err.kind().description(), "Insufficient carrier capacity");
}

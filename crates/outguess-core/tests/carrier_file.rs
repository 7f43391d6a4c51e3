use std::fs;

use tempfile::TempDir;

use outguess_core::*;

fn synthetic() -> CoefficientImage {
    SyntheticSource::new(320, 240, 2024).coefficients().unwrap()
}

#[test]
fn should_hide_in_a_container_file_and_unveil_from_it() {
    let out_dir = TempDir::new().unwrap();
    let carrier_path = out_dir.path().join("carrier.ogdc");
    let secret_path = out_dir.path().join("secret.ogdc");

    let image = synthetic();
    fs::write(&carrier_path, ContainerCodec.serialize(&image, image.quality).unwrap()).unwrap();

    let bytes = fs::read(&carrier_path).unwrap();
    let mut image = EncodedSource::new(&ContainerCodec, &bytes).coefficients().unwrap();
    let options = EmbedOptions::default().with_password("hunter42");
    embed(&mut image.coefficients, b"meet me at the fountain", &options).unwrap();
    fs::write(&secret_path, ContainerCodec.serialize(&image, image.quality).unwrap()).unwrap();

    let bytes = fs::read(&secret_path).unwrap();
    let parsed = ContainerCodec.parse(&bytes).unwrap();
    assert_eq!(parsed.width, 320);
    assert_eq!(parsed.height, 240);

    let decoded = extract(&parsed.coefficients, Some("hunter42")).unwrap();
    assert_eq!(decoded.message, "meet me at the fountain");
}

#[test]
fn should_reject_files_that_are_not_containers() {
    let err = ContainerCodec.parse(b"\x89PNG\r\n\x1a\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = ContainerCodec.parse(b"\xFF\xD8\xFF\xE1garbage").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseError);
}

#[test]
fn should_survive_recompression_at_the_same_quality() {
    let mut image = synthetic();
    embed(&mut image.coefficients, b"steady", &EmbedOptions::default()).unwrap();

    assert!(survives_recompression(&ContainerCodec, &image, image.quality, None));
}

#[test]
fn should_not_survive_heavy_recompression() {
    let mut image = synthetic();
    let options = EmbedOptions::default().with_compression_resistance(1);
    embed(&mut image.coefficients, b"fragile", &options).unwrap();

    assert!(!survives_recompression(&ContainerCodec, &image, 5, None));
}

#[test]
fn should_not_survive_without_a_message() {
    let image = synthetic();
    assert!(!survives_recompression(&ContainerCodec, &image, image.quality, None));
}

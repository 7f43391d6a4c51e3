//! Password based authenticated encryption of payloads.
//!
//! Argon2id derives a 32-byte key from the password and a random salt, the
//! payload is then sealed with XChaCha20-Poly1305 under a random nonce.
//!
//! Envelope layout:
//!
//! ```text
//! [len + 16 bytes] ciphertext with Poly1305 tag
//! [24 bytes]       nonce
//! [32 bytes]       salt
//! ```

use argon2::{Argon2, ParamsBuilder};
use chacha20poly1305::aead::{Aead, AeadCore};
use chacha20poly1305::{KeyInit, XChaCha20Poly1305};
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use zeroize::Zeroize;

use crate::error::StegoError;

pub use argon2::Error as Argon2Error;
pub use chacha20poly1305::Error as AeadError;

const TAG_LEN: usize = 16;
const NONCE_LEN: usize = 24;
const SALT_LEN: usize = 32;
const KEY_LEN: usize = 32;

/// Bytes a sealed envelope adds to the plaintext.
pub const SEALED_OVERHEAD: usize = TAG_LEN + NONCE_LEN + SALT_LEN;

#[derive(Debug, Error)]
pub enum CipherError {
    #[error("Key derivation error")]
    KeyDerivation(Argon2Error),

    #[error("Key derivation parameter error")]
    KeyDerivationParams(Argon2Error),

    #[error("Decryption error")]
    Decryption(AeadError),

    #[error("Encryption error")]
    Encryption(AeadError),

    #[error("Sealed data too short: {0} bytes")]
    Truncated(usize),
}

impl From<CipherError> for StegoError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::Decryption(_) | CipherError::Truncated(_) => StegoError::DecryptionFailed,
            other => StegoError::invalid_input(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CipherError>;

/// Encrypt `data` under `password`.
pub fn seal(password: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let mut key = derive_key(password.as_bytes(), &salt)?;

    let mut nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let sealer = XChaCha20Poly1305::new(&key.into());
    key.zeroize();
    let mut sealed = sealer
        .encrypt(&nonce, data)
        .map_err(CipherError::Encryption)?;
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&salt);

    nonce.zeroize();
    salt.zeroize();

    Ok(sealed)
}

/// Decrypt an envelope produced by [`seal`].
///
/// A wrong password or any tampering fails with [`CipherError::Decryption`].
pub fn open(password: &str, sealed: &[u8]) -> Result<Vec<u8>> {
    if sealed.len() < SEALED_OVERHEAD {
        return Err(CipherError::Truncated(sealed.len()));
    }
    let salt_start = sealed.len() - SALT_LEN;
    let nonce_start = salt_start - NONCE_LEN;

    let salt = &sealed[salt_start..];
    let nonce = &sealed[nonce_start..salt_start];
    let mut key = derive_key(password.as_bytes(), salt)?;

    let opener = XChaCha20Poly1305::new(&key.into());
    key.zeroize();

    opener
        .decrypt(nonce.into(), &sealed[..nonce_start])
        .map_err(CipherError::Decryption)
}

fn argon<'key>() -> Result<Argon2<'key>> {
    let params = ParamsBuilder::default()
        .t_cost(3)
        .output_len(KEY_LEN)
        .build()
        .map_err(CipherError::KeyDerivationParams)?;

    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

fn derive_key(password: &[u8], salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    let mut key = [0u8; KEY_LEN];
    argon()?
        .hash_password_into(password, salt, &mut key)
        .map_err(CipherError::KeyDerivation)?;

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_round_trip() {
        let data = b"lorem ipsum dolor sit amet, consectetur adipiscing elit";

        let sealed = seal("resistance is futile", data).unwrap();
        assert_eq!(sealed.len(), data.len() + SEALED_OVERHEAD);
        assert_ne!(&sealed[..data.len()], data.as_slice());

        let opened = open("resistance is futile", &sealed).unwrap();
        assert_eq!(opened, data);
    }

    #[test]
    fn test_wrong_password_fails() {
        let sealed = seal("correct horse", b"secret").unwrap();
        assert!(matches!(
            open("battery staple", &sealed),
            Err(CipherError::Decryption(_))
        ));
    }

    #[test]
    fn test_tampered_envelope_fails() {
        let mut sealed = seal("pw", b"secret").unwrap();
        sealed[0] ^= 1;
        assert!(open("pw", &sealed).is_err());
    }

    #[test]
    fn test_truncated_envelope() {
        let err = open("pw", &[0u8; SEALED_OVERHEAD - 1]).unwrap_err();
        assert!(matches!(err, CipherError::Truncated(71)));
        assert!(matches!(StegoError::from(err), StegoError::DecryptionFailed));
    }

    #[test]
    fn test_fresh_salt_and_nonce() {
        let a = seal("pw", b"same").unwrap();
        let b = seal("pw", b"same").unwrap();
        assert_ne!(a, b);
    }
}

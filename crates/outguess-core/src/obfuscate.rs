//! Lightweight keystream obfuscation.
//!
//! XORs the payload with a repeating 4-byte key taken from the FNV-1a hash of
//! the password. The transform is its own inverse. It hides nothing from
//! anyone who looks, use [`crate::cipher`] for real secrecy.
//!
//! [`seal`] puts a BE CRC-32 of the plaintext in front of the message before
//! the XOR, so [`open`] can tell a wrong password from the right one:
//!
//! ```text
//! xor(crc32(message) ‖ message)
//! ```

/// Bytes of plaintext checksum in front of a sealed message.
pub const CHECK_LEN: usize = 4;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash.
pub fn fnv1a32(data: &[u8]) -> u32 {
    data.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ byte as u32).wrapping_mul(FNV_PRIME)
    })
}

/// The repeating keystream for `password`.
pub fn keystream(password: &str) -> [u8; 4] {
    fnv1a32(password.as_bytes()).to_le_bytes()
}

/// XOR `data` in place with the keystream of `password`.
pub fn transform_in_place(data: &mut [u8], password: &str) {
    let key = keystream(password);
    data.iter_mut()
        .zip(key.iter().cycle())
        .for_each(|(byte, k)| *byte ^= k);
}

/// XOR `data` with the keystream of `password` into a new buffer.
pub fn transform(data: &[u8], password: &str) -> Vec<u8> {
    let mut out = data.to_vec();
    transform_in_place(&mut out, password);
    out
}

/// Prefix `message` with its checksum and XOR both with the keystream.
pub fn seal(message: &[u8], password: &str) -> Vec<u8> {
    let mut sealed = Vec::with_capacity(CHECK_LEN + message.len());
    sealed.extend_from_slice(&crc32fast::hash(message).to_be_bytes());
    sealed.extend_from_slice(message);
    transform_in_place(&mut sealed, password);
    sealed
}

/// Reverse [`seal`]. `None` if the plaintext checksum does not match.
pub fn open(sealed: &[u8], password: &str) -> Option<Vec<u8>> {
    if sealed.len() < CHECK_LEN {
        return None;
    }
    let mut check = transform(sealed, password);
    let message = check.split_off(CHECK_LEN);
    let expected = u32::from_be_bytes(check.try_into().ok()?);

    (crc32fast::hash(&message) == expected).then_some(message)
}

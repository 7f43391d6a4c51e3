//! Per call embedding options.

use std::fmt::{self, Debug, Formatter};

use crate::error::{Result, StegoError};

/// Longest password accepted, in characters.
pub const MAX_PASSWORD_LEN: usize = 100;

pub const DEFAULT_COMPRESSION_RESISTANCE: u8 = 5;
pub const DEFAULT_QUALITY: u8 = 85;
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

/// Optional password, masked when debug printed.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Password(Option<String>);

impl Password {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Reject passwords longer than [`MAX_PASSWORD_LEN`] characters.
    pub fn validate(&self) -> Result<()> {
        match &self.0 {
            Some(password) if password.chars().count() > MAX_PASSWORD_LEN => {
                Err(StegoError::invalid_input(format!(
                    "password exceeds {MAX_PASSWORD_LEN} characters"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Debug for Password {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(password) = &self.0 {
            write!(f, "Password({})", "*".repeat(password.len()))
        } else {
            write!(f, "Password(None)")
        }
    }
}

impl From<Option<String>> for Password {
    fn from(password: Option<String>) -> Self {
        Self(password)
    }
}

impl From<Option<&str>> for Password {
    fn from(password: Option<&str>) -> Self {
        Self(password.map(str::to_string))
    }
}

impl From<&str> for Password {
    fn from(password: &str) -> Self {
        Self(Some(password.to_string()))
    }
}

impl AsRef<Option<String>> for Password {
    fn as_ref(&self) -> &Option<String> {
        &self.0
    }
}

/// How a password protects the payload before framing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// XOR keystream, see [`crate::obfuscate`]. Offers no real secrecy.
    Keystream,
    /// Argon2id + XChaCha20-Poly1305, see [`crate::cipher`].
    #[default]
    Sealed,
}

impl Protection {
    /// Bytes the protection adds to the message.
    pub fn overhead(self) -> usize {
        match self {
            Protection::Keystream => crate::obfuscate::CHECK_LEN,
            Protection::Sealed => crate::cipher::SEALED_OVERHEAD,
        }
    }
}

/// Options for a single embed call.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    pub password: Password,
    /// 1 (max capacity) to 10 (only large coefficients carry bits)
    pub compression_resistance: u8,
    /// JPEG quality the carrier will be written at (1-100)
    pub quality: u8,
    /// Log the operation summary at info level
    pub verbose: bool,
    pub max_message_size: usize,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            password: Password::default(),
            compression_resistance: DEFAULT_COMPRESSION_RESISTANCE,
            quality: DEFAULT_QUALITY,
            verbose: false,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
        }
    }
}

impl EmbedOptions {
    pub fn with_password(mut self, password: impl Into<Password>) -> Self {
        self.password = password.into();
        self
    }

    pub fn with_compression_resistance(mut self, resistance: u8) -> Self {
        self.compression_resistance = resistance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.compression_resistance) {
            return Err(StegoError::invalid_input(format!(
                "compression resistance {} is outside 1..=10",
                self.compression_resistance
            )));
        }
        if !(1..=100).contains(&self.quality) {
            return Err(StegoError::invalid_input(format!(
                "quality {} is outside 1..=100",
                self.quality
            )));
        }
        self.password.validate()
    }

    /// Carrier threshold for these options.
    pub fn min_magnitude(&self) -> u16 {
        min_magnitude(self.compression_resistance)
    }
}

/// Smallest coefficient magnitude that carries a bit at `resistance`.
///
/// Maps 1..=10 to 2,2,2,4,4,4,6,6,6,8. The result is always even so that
/// changing the LSB of a carrier never pushes it below the threshold.
pub fn min_magnitude(resistance: u8) -> u16 {
    let resistance = resistance.clamp(1, 10) as u16;
    2 * (1 + (resistance - 1) / 3)
}

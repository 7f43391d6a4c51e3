//! Error types for embedding and extraction.

use std::fmt;
use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, StegoError>;

/// Errors that can occur while hiding or unveiling a payload.
#[derive(Error)]
pub enum StegoError {
    /// Malformed input, such as an empty message, a broken carrier signature or
    /// out of range options.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Message exceeds the configured maximum message size.
    #[error("message of {size} bytes exceeds the maximum of {max} bytes")]
    MessageTooLarge { size: usize, max: usize },

    /// The carrier does not offer enough eligible coefficients (counted in bits).
    #[error("insufficient capacity: payload requires {required} bits but only {available} available")]
    InsufficientCapacity { required: usize, available: usize },

    /// The extracted header announces a payload length out of range.
    #[error("invalid header: payload length {length} is out of range")]
    InvalidHeader { length: u32 },

    /// The payload checksum does not match (corruption or wrong password).
    #[error("integrity check failed: expected crc {expected:#010x}, got {actual:#010x}")]
    IntegrityCheckFailed { expected: u32, actual: u32 },

    /// Reversing the password protection or decoding the text failed.
    #[error("failed to decrypt message - wrong password?")]
    DecryptionFailed,

    /// The carrier collaborator could not yield coefficients.
    #[error("failed to parse carrier: {reason}")]
    Parse { reason: String },

    /// I/O error while reading or writing carrier data.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl fmt::Debug for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // unwrap() output shows the display message
        write!(f, "{self}")
    }
}

impl StegoError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        StegoError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn parse(reason: impl Into<String>) -> Self {
        StegoError::Parse {
            reason: reason.into(),
        }
    }

    /// The stable kind of this error, for callers that surface kind and message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StegoError::InvalidInput { .. } => ErrorKind::InvalidInput,
            StegoError::MessageTooLarge { .. } => ErrorKind::MessageTooLarge,
            StegoError::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
            StegoError::InvalidHeader { .. } => ErrorKind::InvalidHeader,
            StegoError::IntegrityCheckFailed { .. } => ErrorKind::IntegrityCheckFailed,
            StegoError::DecryptionFailed => ErrorKind::DecryptionFailed,
            StegoError::Parse { .. } | StegoError::Io(_) => ErrorKind::ParseError,
        }
    }
}

/// Kind of a [`StegoError`], without the details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    MessageTooLarge,
    InsufficientCapacity,
    InvalidHeader,
    IntegrityCheckFailed,
    DecryptionFailed,
    ParseError,
}

impl ErrorKind {
    /// Stable machine readable code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::MessageTooLarge => "MESSAGE_TOO_LARGE",
            ErrorKind::InsufficientCapacity => "INSUFFICIENT_CAPACITY",
            ErrorKind::InvalidHeader => "INVALID_HEADER",
            ErrorKind::IntegrityCheckFailed => "INTEGRITY_CHECK_FAILED",
            ErrorKind::DecryptionFailed => "DECRYPTION_FAILED",
            ErrorKind::ParseError => "PARSE_ERROR",
        }
    }

    /// Short human readable description.
    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "Invalid input",
            ErrorKind::MessageTooLarge => "Message too large",
            ErrorKind::InsufficientCapacity => "Insufficient carrier capacity",
            ErrorKind::InvalidHeader => "Invalid message header",
            ErrorKind::IntegrityCheckFailed => "Message integrity check failed",
            ErrorKind::DecryptionFailed => "Decryption failed",
            ErrorKind::ParseError => "Carrier could not be parsed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

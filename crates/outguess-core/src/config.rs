//! Process wide settings shared by the CLI and embedders of the library.

use crate::codec::Codec;
use crate::error::{Result, StegoError};
use crate::frame::MAX_MESSAGE_SIZE;
use crate::options::{
    EmbedOptions, Password, Protection, DEFAULT_COMPRESSION_RESISTANCE, DEFAULT_MAX_MESSAGE_SIZE,
    DEFAULT_QUALITY,
};
use crate::pool::{WorkerPool, DEFAULT_MAX_CONCURRENT_REQUESTS};
use crate::sequence::DEFAULT_SEED;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub max_message_size: usize,
    pub max_concurrent_requests: usize,
    pub compression_resistance: u8,
    pub quality: u8,
    pub verbose: bool,
    pub seed: String,
    pub protection: Protection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
            compression_resistance: DEFAULT_COMPRESSION_RESISTANCE,
            quality: DEFAULT_QUALITY,
            verbose: false,
            seed: DEFAULT_SEED.to_string(),
            protection: Protection::default(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.max_message_size == 0 || self.max_message_size > MAX_MESSAGE_SIZE {
            return Err(StegoError::invalid_input(format!(
                "max message size must be within 1..={MAX_MESSAGE_SIZE}"
            )));
        }
        if self.max_concurrent_requests == 0 {
            return Err(StegoError::invalid_input(
                "max concurrent requests must be at least 1",
            ));
        }
        if self.seed.is_empty() {
            return Err(StegoError::invalid_input("seed must not be empty"));
        }
        self.embed_options(Password::default()).validate()
    }

    pub fn embed_options(&self, password: impl Into<Password>) -> EmbedOptions {
        EmbedOptions {
            password: password.into(),
            compression_resistance: self.compression_resistance,
            quality: self.quality,
            verbose: self.verbose,
            max_message_size: self.max_message_size,
        }
    }

    pub fn codec(&self) -> Codec {
        Codec::new(self.seed.clone(), self.protection)
    }

    pub fn worker_pool(&self) -> Result<WorkerPool> {
        WorkerPool::new(self.max_concurrent_requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_message_size, 65536);
        assert_eq!(config.max_concurrent_requests, 10);
        assert_eq!(config.seed, "outguess_seed_v2");
        assert!(config.validate().is_ok());
        assert_eq!(config.codec(), Codec::default());
    }

    #[test]
    fn test_validate_ranges() {
        let config = Config {
            max_concurrent_requests: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            compression_resistance: 11,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            max_message_size: MAX_MESSAGE_SIZE + 1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_embed_options() {
        let config = Config {
            compression_resistance: 8,
            verbose: true,
            ..Default::default()
        };
        let options = config.embed_options("pw");
        assert_eq!(options.compression_resistance, 8);
        assert!(options.verbose);
        assert_eq!(options.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_worker_pool_size() {
        let config = Config {
            max_concurrent_requests: 3,
            ..Default::default()
        };
        assert_eq!(config.worker_pool().unwrap().workers(), 3);
    }
}

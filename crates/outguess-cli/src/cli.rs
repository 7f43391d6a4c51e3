use clap::{Parser, Subcommand};
use outguess_core::{Config, Protection, DEFAULT_SEED};

use crate::commands::*;
use crate::CliResult;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Log operation summaries
    #[arg(short, long, global = true, env = "OUTGUESS_VERBOSE")]
    pub verbose: bool,

    /// Largest message accepted, in bytes
    #[arg(
        long,
        global = true,
        env = "OUTGUESS_MAX_MESSAGE_SIZE",
        default_value_t = 65536
    )]
    pub max_message_size: usize,

    /// Files processed in parallel by `detect`
    #[arg(
        long,
        global = true,
        env = "OUTGUESS_MAX_CONCURRENT_REQUESTS",
        default_value_t = 10
    )]
    pub max_concurrent_requests: usize,

    /// 1 (most capacity) to 10 (most robust against recompression)
    #[arg(
        short = 'r',
        long,
        global = true,
        env = "OUTGUESS_COMPRESSION_RESISTANCE",
        default_value_t = 5,
        value_parser = clap::value_parser!(u8).range(1..=10)
    )]
    pub compression_resistance: u8,

    /// JPEG quality the carrier is written at
    #[arg(
        short,
        long,
        global = true,
        env = "OUTGUESS_QUALITY",
        default_value_t = 85,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    pub quality: u8,

    /// Seed of the embedding sequence, both sides must use the same
    #[arg(long, global = true, env = "OUTGUESS_SEED", default_value = DEFAULT_SEED)]
    pub seed: String,

    /// Use the lightweight XOR keystream instead of authenticated encryption
    #[arg(long, global = true, env = "OUTGUESS_KEYSTREAM")]
    pub keystream: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl CliArgs {
    pub fn config(&self) -> CliResult<Config> {
        let config = Config {
            max_message_size: self.max_message_size,
            max_concurrent_requests: self.max_concurrent_requests,
            compression_resistance: self.compression_resistance,
            quality: self.quality,
            verbose: self.verbose,
            seed: self.seed.clone(),
            protection: if self.keystream {
                Protection::Keystream
            } else {
                Protection::Sealed
            },
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Hide(hide::HideArgs),
    Unveil(unveil::UnveilArgs),
    UnveilRaw(unveil_raw::UnveilRawArgs),
    Detect(detect::DetectArgs),
    Capacity(capacity::CapacityArgs),
    Check(check::CheckArgs),
    Synth(synth::SynthArgs),
}

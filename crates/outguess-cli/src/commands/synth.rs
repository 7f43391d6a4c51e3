use std::path::PathBuf;

use clap::Args;
use outguess_core::{CoefficientSource, Config, SyntheticSource};

use super::write_carrier;
use crate::CliResult;

/// Writes a synthetic carrier container to try things out
#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Output container file
    #[arg(short = 'o', long = "out", value_name = "output file", required = true)]
    pub output_file: PathBuf,

    #[arg(long, default_value_t = 640)]
    pub width: u32,

    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Seed of the generated coefficients
    #[arg(long, default_value_t = 0)]
    pub noise_seed: u64,
}

impl SynthArgs {
    pub fn run(self, config: &Config) -> CliResult<()> {
        let source = SyntheticSource {
            quality: config.quality,
            ..SyntheticSource::new(self.width, self.height, self.noise_seed)
        };
        let image = source.coefficients()?;
        write_carrier(&self.output_file, &image, image.quality)?;

        log::info!(
            "wrote {}x{} synthetic carrier with {} blocks to {}",
            image.width,
            image.height,
            image.blocks(),
            self.output_file.display()
        );
        Ok(())
    }
}

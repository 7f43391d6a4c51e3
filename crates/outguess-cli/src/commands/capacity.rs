use std::path::PathBuf;

use clap::Args;
use outguess_core::Config;

use super::read_carrier;
use crate::CliResult;

/// Reports how much data a coefficient container can hide
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Carrier container file
    #[arg(short = 'i', long = "in", value_name = "carrier file", required = true)]
    pub media: PathBuf,

    /// Account for the overhead of password protection
    #[arg(long)]
    pub with_password: bool,
}

impl CapacityArgs {
    pub fn run(self, config: &Config) -> CliResult<()> {
        let image = read_carrier(&self.media)?;
        let password = self.with_password.then(|| String::from("*"));
        let options = config.embed_options(password);

        let codec = config.codec();
        let max = codec.max_message_size(&image.coefficients, &options);
        let stats = codec.stats(&image.coefficients);

        println!(
            "{}: {max} bytes at compression resistance {} ({}x{}, {} coefficients, {} in use)",
            self.media.display(),
            options.compression_resistance,
            image.width,
            image.height,
            stats.total_coefficients,
            stats.coefficients_used
        );
        Ok(())
    }
}

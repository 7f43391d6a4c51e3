use std::path::PathBuf;

use clap::Args;
use outguess_core::Config;

use super::{read_carrier, write_file, PasswordArgs};
use crate::CliResult;

/// Unveils the raw payload bytes from a coefficient container
#[derive(Args, Debug)]
pub struct UnveilRawArgs {
    #[command(flatten)]
    pub password: PasswordArgs,

    /// Carrier file that contains secret data
    #[arg(short = 'i', long = "in", value_name = "carrier file", required = true)]
    pub media: PathBuf,

    /// Raw data will be stored as binary file
    #[arg(short = 'o', long = "out", value_name = "output file", required = true)]
    pub output_file: PathBuf,
}

impl UnveilRawArgs {
    pub fn run(self, config: &Config) -> CliResult<()> {
        let password = self.password.resolve(false)?;
        let image = read_carrier(&self.media)?;

        let decoded = config
            .codec()
            .extract_bytes(&image.coefficients, password.as_deref())?;
        write_file(&self.output_file, &decoded.message)?;

        log::info!(
            "unveiled {} raw bytes to {}",
            decoded.size,
            self.output_file.display()
        );
        Ok(())
    }
}

use std::path::PathBuf;

use clap::Args;
use outguess_core::{Config, ContainerCodec};

use super::{read_carrier, PasswordArgs};
use crate::{CliError, CliResult};

/// Checks if a hidden message survives re-encoding at the global `--quality`,
/// failing when it does not
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub password: PasswordArgs,

    /// Carrier file that contains a secret message
    #[arg(short = 'i', long = "in", value_name = "carrier file", required = true)]
    pub media: PathBuf,
}

impl CheckArgs {
    pub fn run(self, config: &Config) -> CliResult<()> {
        let password = self.password.resolve(false)?;
        let image = read_carrier(&self.media)?;

        let survives = config.codec().survives_recompression(
            &ContainerCodec,
            &image,
            config.quality,
            password.as_deref(),
        );
        if !survives {
            return Err(CliError::Lost {
                path: self.media,
                quality: config.quality,
            });
        }

        println!(
            "{}: message survives recompression at quality {}",
            self.media.display(),
            config.quality
        );
        Ok(())
    }
}

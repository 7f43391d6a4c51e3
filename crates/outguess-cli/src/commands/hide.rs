use std::path::PathBuf;

use clap::Args;
use outguess_core::quality::requantize;
use outguess_core::Config;

use super::{read_carrier, read_file, write_carrier, PasswordArgs};
use crate::CliResult;

/// Hides a message or file in a coefficient container
#[derive(Args, Debug)]
pub struct HideArgs {
    #[command(flatten)]
    pub password: PasswordArgs,

    /// Carrier container file, used readonly
    #[arg(short = 'i', long = "in", value_name = "carrier file", required = true)]
    pub media: PathBuf,

    /// Carrier with the hidden data will be stored as file
    #[arg(short = 'o', long = "out", value_name = "output file", required = true)]
    pub write_to_file: PathBuf,

    /// File whose bytes will be hidden
    #[arg(
        short = 'd',
        long = "data",
        value_name = "data file",
        required_unless_present = "message",
        conflicts_with = "message"
    )]
    pub data_file: Option<PathBuf>,

    /// A text message that will be hidden
    #[arg(short, long, value_name = "text message")]
    pub message: Option<String>,
}

impl HideArgs {
    pub fn run(self, config: &Config) -> CliResult<()> {
        let payload = match (&self.message, &self.data_file) {
            (Some(message), _) => message.as_bytes().to_vec(),
            (None, Some(path)) => read_file(path)?,
            (None, None) => Vec::new(),
        };
        let password = self.password.resolve(true)?;

        let mut image = read_carrier(&self.media)?;
        let options = config.embed_options(password);
        if image.quality != options.quality {
            // payload bits must be written at the output quality
            log::info!("requantizing carrier from q{} to q{}", image.quality, options.quality);
            requantize(&mut image.coefficients, image.quality, options.quality);
            image.quality = options.quality;
        }
        let result = config.codec().embed_with_progress(
            &mut image.coefficients,
            &payload,
            &options,
            |percent| log::debug!("embedding {percent}%"),
        )?;
        write_carrier(&self.write_to_file, &image, options.quality)?;

        log::info!(
            "hid {} bytes in {} using {} of {} eligible coefficients",
            result.message_size,
            self.write_to_file.display(),
            result.stats.coefficients_used,
            result.stats.eligible_coefficients
        );
        Ok(())
    }
}

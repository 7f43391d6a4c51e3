use std::fs;
use std::path::Path;

use clap::Args;
use outguess_core::{CarrierCodec, CoefficientImage, ContainerCodec};

use crate::{CliError, CliResult};

pub mod capacity;
pub mod check;
pub mod detect;
pub mod hide;
pub mod synth;
pub mod unveil;
pub mod unveil_raw;

/// Password options shared by the commands that need one.
#[derive(Args, Debug, Default)]
pub struct PasswordArgs {
    /// Password used to protect the data
    #[arg(short, long, value_name = "password")]
    pub password: Option<String>,

    /// Prompt for the password instead of passing it as argument
    #[arg(long, conflicts_with = "password")]
    pub ask_password: bool,
}

impl PasswordArgs {
    /// The password from the arguments, or from an interactive prompt.
    pub fn resolve(self, confirm: bool) -> CliResult<Option<String>> {
        if !self.ask_password {
            return Ok(self.password);
        }

        let prompt = dialoguer::Password::new().with_prompt("Password");
        let password = if confirm {
            prompt
                .with_confirmation("Repeat password", "Error: the passwords don't match.")
                .interact()?
        } else {
            prompt.interact()?
        };
        Ok(Some(password))
    }
}

pub(crate) fn read_file(path: &Path) -> CliResult<Vec<u8>> {
    fs::read(path).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_file(path: &Path, data: &[u8]) -> CliResult<()> {
    fs::write(path, data).map_err(|source| CliError::File {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_carrier(path: &Path) -> CliResult<CoefficientImage> {
    let bytes = read_file(path)?;
    Ok(ContainerCodec.parse(&bytes)?)
}

pub(crate) fn write_carrier(path: &Path, image: &CoefficientImage, quality: u8) -> CliResult<()> {
    let bytes = ContainerCodec.serialize(image, quality)?;
    write_file(path, &bytes)
}

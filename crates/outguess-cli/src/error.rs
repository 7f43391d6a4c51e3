use std::fmt;
use std::path::PathBuf;

use outguess_core::StegoError;
use thiserror::Error;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Error)]
pub enum CliError {
    #[error("{} ({}): {source}", .source.kind().description(), .source.kind().code())]
    Stego {
        #[from]
        source: StegoError,
    },

    #[error("cannot access {}: {source}", .path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("message in {} does not survive recompression at quality {quality}", .path.display())]
    Lost { path: PathBuf, quality: u8 },

    #[error("password prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // main() prints errors with Debug
        write!(f, "{self}")
    }
}

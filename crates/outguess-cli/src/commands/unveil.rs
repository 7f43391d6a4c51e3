use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use outguess_core::Config;

use super::{read_carrier, write_file, PasswordArgs};
use crate::CliResult;

/// Unveils a text message from a coefficient container
#[derive(Args, Debug)]
pub struct UnveilArgs {
    #[command(flatten)]
    pub password: PasswordArgs,

    /// Carrier file that contains a secret message
    #[arg(short = 'i', long = "in", value_name = "carrier file", required = true)]
    pub media: PathBuf,

    /// Message will be stored in that file instead of printed
    #[arg(short = 'o', long = "out", value_name = "output file")]
    pub output_file: Option<PathBuf>,
}

impl UnveilArgs {
    pub fn run(self, config: &Config) -> CliResult<()> {
        let password = self.password.resolve(false)?;
        let image = read_carrier(&self.media)?;

        let decoded = config
            .codec()
            .extract(&image.coefficients, password.as_deref())?;
        log::info!(
            "unveiled {} bytes in {:?}, verified: {}",
            decoded.size,
            decoded.elapsed,
            decoded.verified
        );

        match self.output_file {
            Some(path) => write_file(&path, decoded.message.as_bytes()),
            None => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", decoded.message)?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::hide::HideArgs;
    use crate::commands::test_support::*;
    use crate::CliError;
    use outguess_core::ErrorKind;

    fn hide(message: &str, pw: &str) -> (tempfile::TempDir, PathBuf) {
        let (dir, carrier) = carrier_in_temp_dir();
        let out = dir.path().join("secret.ogdc");
        HideArgs {
            password: password(pw),
            media: carrier,
            write_to_file: out.clone(),
            data_file: None,
            message: Some(message.to_string()),
        }
        .run(&config())
        .unwrap();
        (dir, out)
    }

    #[test]
    fn test_unveil_to_file() {
        let (dir, secret) = hide("the eagle has landed", "pw");
        let out = dir.path().join("message.txt");

        UnveilArgs {
            password: password("pw"),
            media: secret,
            output_file: Some(out.clone()),
        }
        .run(&config())
        .unwrap();

        assert_eq!(std::fs::read_to_string(out).unwrap(), "the eagle has landed");
    }

    #[test]
    fn test_unveil_wrong_password() {
        let (_dir, secret) = hide("the eagle has landed", "pw");

        let err = UnveilArgs {
            password: password("not pw"),
            media: secret,
            output_file: None,
        }
        .run(&config())
        .unwrap_err();
        assert!(matches!(
            &err,
            CliError::Stego { source } if source.kind() == ErrorKind::DecryptionFailed
        ));
    }
}

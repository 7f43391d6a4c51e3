use std::path::PathBuf;

use clap::Args;
use outguess_core::{detect, Config, DetectionReport};

use super::read_carrier;
use crate::CliResult;

/// Checks coefficient containers for signs of hidden data
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Carrier files to inspect
    #[arg(value_name = "carrier files", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

impl DetectArgs {
    pub fn run(self, config: &Config) -> CliResult<()> {
        let pool = config.worker_pool()?;
        let verdicts = pool.map(self.files, |path| {
            let report = read_carrier(&path).map(|image| detect::analyze(&image.coefficients));
            (path, report)
        });

        for (path, report) in verdicts {
            match report {
                Ok(report) => println!("{}: {}", path.display(), describe(&report)),
                Err(err) => log::warn!("skipping {}: {err}", path.display()),
            }
        }
        Ok(())
    }
}

fn describe(report: &DetectionReport) -> String {
    let verdict = if report.is_suspicious() {
        "hidden data likely"
    } else {
        "no hidden data detected"
    };
    match report.lsb_ratio() {
        Some(ratio) => format!(
            "{verdict} (lsb ratio {ratio:.3}, entropy {:.3})",
            report.entropy
        ),
        None => format!("{verdict} (too few samples, entropy {:.3})", report.entropy),
    }
}

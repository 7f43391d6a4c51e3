use clap::Parser;

mod cli;
mod commands;
mod error;

use cli::{CliArgs, Commands};
pub use error::{CliError, CliResult};

fn main() -> CliResult<()> {
    let args = CliArgs::parse();
    init_logger(args.verbose);

    let config = args.config()?;
    log::debug!("{config:?}");

    match args.command {
        Commands::Hide(args) => args.run(&config),
        Commands::Unveil(args) => args.run(&config),
        Commands::UnveilRaw(args) => args.run(&config),
        Commands::Detect(args) => args.run(&config),
        Commands::Capacity(args) => args.run(&config),
        Commands::Check(args) => args.run(&config),
        Commands::Synth(args) => args.run(&config),
    }
}

fn init_logger(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

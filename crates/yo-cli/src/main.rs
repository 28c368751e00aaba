mod cli;
mod progress;
mod transfers;

use clap::Parser;
use cli::{Cli, Commands};
use eyre::Result;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::Copy(args) => transfers::run_copy(args)?,
        Commands::Version => println!("yo {}", yo_core::version()),
    }

    Ok(())
}

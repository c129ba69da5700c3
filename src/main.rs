//! Voxport CLI
//!
//! Exports every phone of a singing project as a separate WAV file.

use std::process;

use anyhow::Context;
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use env_logger::Env;
use log::info;

use voxport::cli::{commands, validate_project_path, Cli, USAGE};
use voxport::environment::{Config, Environment};
use voxport::ErrorKind;

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => usage_exit(),
    };
    if let Err(e) = validate_project_path(&cli.project) {
        eprintln!("{}", e);
        usage_exit();
    }

    info!("Voxport v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let env = Environment::init(config.clone())
        .with_context(|| format!("failed to initialize {}", config.data_dir.display()))?;

    match commands::export_project(&env, &cli.project) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::Environment => {
            eprintln!("{}", e);
            if let Some(hint) = e.recovery_suggestion() {
                eprintln!("{}", hint);
            }
            process::exit(1);
        }
        Err(e) => Err(e).with_context(|| format!("failed to export {}", cli.project.display())),
    }
}

fn usage_exit() -> ! {
    eprintln!("{}", USAGE);
    process::exit(1);
}

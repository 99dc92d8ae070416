mod cli;
mod config;
mod convert;
mod download;
mod error;
mod telegram;

use clap::Parser;
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(err) = cli.execute() {
        eprintln!("{} {}", "Error:".red().bold(), err);
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    // Per-sticker warnings already go through the progress bar.
    let default_level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! Command-line entry point for `sensible`.

use anyhow::{Context as _, Result};
use clap::Parser;

use sensible_cli::{cli, commands, logging};

/// Ctrl-C handler: leave the cursor on a fresh line and fail.
#[allow(clippy::print_stdout)]
fn interrupted() {
    println!();
    std::process::exit(1);
}

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init_subscriber(args.verbose);
    let log = logging::Logger::new();

    ctrlc::set_handler(interrupted).context("Failed to install interrupt handler")?;

    commands::compile::run(&args, &log)
}

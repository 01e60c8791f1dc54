//! FILENAME: app/src/main.rs
// PURPOSE: Command line entry point.
// FORMAT: seq|level|category|message

use clap::Parser;
use pivot_export::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        log::error!(target: "CLI", "{:#}", e);
        return Err(e);
    }
    Ok(())
}

//! @dose
//! purpose: CLI entry point for defgen. Parses command-line arguments using clap and hands
//!     them to the generate command.
//!
//! when-editing:
//!     - !Error messages are printed to stderr and exit with code 1
//!
//! do-not:
//!     - Never add business logic here - delegate to command modules
//!     - Never panic - always use proper error handling

use clap::Parser;
use defgen::cli::Cli;
use defgen::commands::run_generate;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_generate(&cli)
}

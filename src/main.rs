//! Trazado CLI — Rust-native cloud stack synthesis.

use clap::Parser;
use trazado::cli::Cli;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = trazado::cli::dispatch(cli.command) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

//! Tintforge: staged, resumable batch generation of palette-styled images.
//!
//! This is the main entry point for the `tintforge` CLI. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

mod artifacts;
mod backend;
mod cli;
mod codec;
mod commands;
pub mod config;
pub mod context;
mod discovery;
pub mod error;
pub mod events;
pub mod exit_codes;
mod fragments;
pub mod fs;
pub mod locks;
pub mod palette;
mod pipeline;
mod prompt;
pub mod task;

#[cfg(test)]
mod test_support;

use cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    match commands::dispatch(cli.root.as_deref(), cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}

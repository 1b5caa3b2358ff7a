//! Command-line driver for the Linxc compiler. All command logic lives
//! here so it stays testable independent of `main`'s process exit.

pub mod cli;

pub use cli::run_cli;

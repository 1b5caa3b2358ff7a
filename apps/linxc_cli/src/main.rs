//! `linxc` - standalone binary.
//!
//! This is the entry point for the `linxc` command-line tool.
//!
//! The binary is a thin wrapper around [`linxc_cli::run_cli`], handling
//! error display and exit codes. All command logic lives in the library
//! crate for testability.
//!
//! # Exit Codes
//!
//! - `0` - success
//! - `1` - error (message printed to stderr)

fn main() {
    if let Err(e) = linxc_cli::run_cli() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

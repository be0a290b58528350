//! Code Tales command-line front end
//!
//! Library half of the `tale` binary: configuration loading and the
//! subcommands, kept out of `main.rs` so they can be tested.

pub mod commands;
pub mod config;
pub mod error;

pub use config::TaleConfig;
pub use error::{CliError, Result};

//! Origin CLI library.
//!
//! Command-line access to a local content anchor registry: anchoring
//! captures and edits, verifying fingerprints, and browsing the registry.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

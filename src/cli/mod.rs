//! Command-line interface for launchpad.
//!
//! Provides commands for schema setup, catalog seeding, the project and review
//! workflow, and AI-assisted content.

mod commands;

pub use commands::{parse_cli, run, run_with_cli, Cli};

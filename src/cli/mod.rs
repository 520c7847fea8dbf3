//! CLI module for apptree - command-line interface and subcommands.
//!
//! Builds an app tree from configuration and either prints it or replays
//! lifecycle steps against it.

pub mod commands;

pub use commands::Cli;

//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - tree: build the configured app tree and print it
//! - run: replay lifecycle steps against the tree

use apptree::options::{Options, parse_assignment};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// apptree - build a tree of apps and drive their lifecycle
#[derive(Parser, Debug)]
#[command(name = "apptree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the configured app tree
    Tree,

    /// Replay lifecycle steps against the app tree
    Run {
        /// Steps to run in order: start:NAME, stop:NAME, remove:NAME, destroy:NAME
        #[arg(required = true)]
        steps: Vec<Step>,

        /// Option passed to start and stop steps (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set)]
        set: Vec<(String, Value)>,
    },
}

impl Commands {
    /// Call options collected from `--set` flags; later flags win.
    pub fn call_options(&self) -> Options {
        match self {
            Commands::Run { set, .. } => set.iter().cloned().collect(),
            Commands::Tree => Options::new(),
        }
    }
}

fn parse_set(raw: &str) -> Result<(String, Value), String> {
    parse_assignment(raw).ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))
}

/// One lifecycle step against a named child of the root app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Start(String),
    Stop(String),
    Remove(String),
    Destroy(String),
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Step::Start(name) | Step::Stop(name) | Step::Remove(name) | Step::Destroy(name) => name,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Step::Start(_) => "start",
            Step::Stop(_) => "stop",
            Step::Remove(_) => "remove",
            Step::Destroy(_) => "destroy",
        }
    }
}

impl FromStr for Step {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, name) = s
            .split_once(':')
            .ok_or_else(|| format!("expected VERB:NAME, got '{}'", s))?;
        if name.is_empty() {
            return Err(format!("missing child name in '{}'", s));
        }
        let name = name.to_string();
        match verb {
            "start" => Ok(Step::Start(name)),
            "stop" => Ok(Step::Stop(name)),
            "remove" => Ok(Step::Remove(name)),
            "destroy" => Ok(Step::Destroy(name)),
            other => Err(format!("unknown step '{}'", other)),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.verb(), self.name())
    }
}

use apptree::AppHandle;
use apptree::config::{ClassRegistry, TreeConfig};
use apptree::options::Options;
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;

mod cli;

use cli::Cli;
use cli::commands::{Commands, Step};

fn setup_logging() -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("apptree")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("apptree.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn run_application(cli: &Cli, config: &TreeConfig) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let classes = ClassRegistry::with_builtins();
    let root = config.build_root(&classes)?;

    match &cli.command {
        None | Some(Commands::Tree) => print_tree(&root),
        Some(command @ Commands::Run { steps, .. }) => {
            let options = command.call_options();
            for step in steps {
                run_step(&root, step, &options).with_context(|| format!("Step {} failed", step))?;
            }
            print_tree(&root)
        }
    }
}

fn print_tree(root: &AppHandle) -> Result<()> {
    println!("{} {}", root.class_name().bold(), state_label(root));
    let children = root.get_child_apps();
    if children.is_empty() {
        println!("  {}", "(no children)".dimmed());
    }
    for (name, child) in children {
        let region = child
            .region()
            .map(|region| format!(" @ {}", region.selector()))
            .unwrap_or_default();
        println!("  {} {} {}{}", name.cyan(), child.class_name(), state_label(&child), region);
    }
    Ok(())
}

fn state_label(app: &AppHandle) -> ColoredString {
    if app.is_destroyed() {
        "destroyed".red()
    } else if app.is_running() {
        "running".green()
    } else {
        "stopped".yellow()
    }
}

fn run_step(root: &AppHandle, step: &Step, options: &Options) -> Result<()> {
    info!("Running step {}", step);
    let name = step.name();
    let found = match step {
        Step::Start(_) => root.start_child_app(name, Some(options))?,
        Step::Stop(_) => root.stop_child_app(name, Some(options))?,
        Step::Remove(_) => root.remove_child_app(name),
        Step::Destroy(_) => root.get_child_app(name).inspect(|child| child.destroy()),
    };

    match found {
        Some(_) => println!("{} {}", format!("{}:", step.verb()).green(), name),
        None => println!("{} no child app named '{}'", "skipped:".yellow(), name),
    }
    Ok(())
}

fn main() -> Result<()> {
    // Setup logging first
    setup_logging().context("Failed to setup logging")?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let config = TreeConfig::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli, &config).context("Application failed")?;

    Ok(())
}

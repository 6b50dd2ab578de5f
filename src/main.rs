// ABOUTME: Entry point for the dockfix CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use dockfix::config::{self, Config};
use dockfix::error::{Error, Result};
use dockfix::output::{Output, OutputMode};
use dockfix::runtime::RuntimeConfig;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    let result = run(cli, Output::new(mode)).await;

    if let Err(e) = result {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    match cli.command {
        Commands::Init { force } => {
            let cwd = env::current_dir()?;
            let path = config::init_config(&cwd, force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::List => {
            let config = load_config(cli.config.as_deref())?;
            commands::list(&config, &output);
            Ok(())
        }
        Commands::Up { fixture } => {
            let config = load_config(cli.config.as_deref())?;
            commands::up(&config, &fixture, output).await
        }
        Commands::Rm { name } => {
            let runtime = runtime_config(cli.config.as_deref())?;
            commands::remove(&runtime, &name, &output).await
        }
        Commands::Port { udp } => commands::port(udp, &output).await,
        Commands::Host => {
            let runtime = runtime_config(cli.config.as_deref())?;
            commands::host(&runtime, &output).await;
            Ok(())
        }
    }
}

/// Load the explicit config file, or discover one in the current directory.
fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Config::discover(&env::current_dir()?),
    }
}

/// Runtime settings for commands that work without a config file.
fn runtime_config(path: Option<&std::path::Path>) -> Result<RuntimeConfig> {
    match load_config(path) {
        Ok(config) => Ok(config.runtime),
        Err(Error::ConfigNotFound(_)) if path.is_none() => Ok(RuntimeConfig::default()),
        Err(e) => Err(e),
    }
}

// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockfix")]
#[command(about = "Disposable Docker and Podman containers for integration tests")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only essential results
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Path to the config file (default: discover dockfix.yml in the current directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a dockfix.yml template in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// List the fixtures defined in the config
    List,

    /// Start a fixture, wait until it is ready and keep it running until Ctrl-C
    Up {
        /// Fixture name from the config
        fixture: String,
    },

    /// Force-remove a container by name
    Rm {
        /// Container name
        name: String,
    },

    /// Print a currently free local port
    Port {
        /// Check the UDP port space instead of TCP
        #[arg(long)]
        udp: bool,
    },

    /// Print the host on which published container ports are reachable
    Host,
}

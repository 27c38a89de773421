//! CLI argument definitions for portman.
//!
//! Uses `clap` derive macros to define the full command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "portman",
    version,
    about = "Install a project's vcpkg packages in dependency order",
    long_about = "portman prepares a vcpkg checkout, copies project-local port overlays into it, \
                  and installs the packages listed in portman.toml, removing installed packages \
                  whose features conflict and pruning those no longer needed."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Project source directory [default: current directory]
    #[arg(long, global = true, value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Project manifest, relative to the source directory [default: portman.toml]
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the vcpkg checkout
    #[arg(long, global = true, value_name = "DIR")]
    pub vcpkg_dir: Option<PathBuf>,

    /// Directory with custom vcpkg ports to copy into the checkout
    #[arg(long, global = true, value_name = "DIR")]
    pub port_dir: Option<PathBuf>,

    /// URL of the vcpkg repository to download
    #[arg(long, global = true, value_name = "URL")]
    pub vcpkg_url: Option<String>,

    /// vcpkg triplet [default: detected from the host]
    #[arg(long, global = true)]
    pub triplet: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download and build vcpkg if it is missing
    Bootstrap,

    /// Copy custom ports into the vcpkg checkout
    Ports,

    /// Print the install order without installing anything
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Install the project's packages
    Install {
        /// Keep installed packages the project no longer needs
        #[arg(long)]
        no_prune: bool,
        /// Use the existing vcpkg checkout as is
        #[arg(long)]
        skip_bootstrap: bool,
        /// Do not copy custom ports first
        #[arg(long)]
        skip_ports: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}

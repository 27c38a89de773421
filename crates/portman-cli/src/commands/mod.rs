//! Command dispatch and handler modules.

mod bootstrap;
mod install;
mod plan;
mod ports;

use miette::Result;

use portman_ops::{Overrides, Settings};
use portman_util::errors::PortmanError;

use crate::cli::{Cli, Command, GlobalArgs};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    let settings = load_settings(&cli.global)?;
    match cli.command {
        Command::Bootstrap => bootstrap::exec(&settings),
        Command::Ports => ports::exec(&settings),
        Command::Plan { json } => plan::exec(&settings, json),
        Command::Install {
            no_prune,
            skip_bootstrap,
            skip_ports,
        } => install::exec(&settings, no_prune, skip_bootstrap, skip_ports),
    }
}

fn load_settings(global: &GlobalArgs) -> Result<Settings> {
    let cwd = std::env::current_dir().map_err(PortmanError::Io)?;
    let source_dir = match &global.source_dir {
        Some(dir) => portman_util::fs::absolutize(&cwd, dir),
        None => cwd,
    };
    tracing::debug!("loading settings for {}", source_dir.display());
    let overrides = Overrides {
        config: global.config.clone(),
        vcpkg_dir: global.vcpkg_dir.clone(),
        port_dir: global.port_dir.clone(),
        vcpkg_url: global.vcpkg_url.clone(),
        triplet: global.triplet.clone(),
    };
    Settings::load(&source_dir, &overrides)
}

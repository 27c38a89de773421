use miette::Result;

use portman_ops::ops_install::{self, InstallOptions};
use portman_ops::{ops_bootstrap, ops_ports, Settings};
use portman_util::progress;
use portman_vcpkg::ControlCatalog;

pub fn exec(
    settings: &Settings,
    no_prune: bool,
    skip_bootstrap: bool,
    skip_ports: bool,
) -> Result<()> {
    if let Some(title) = &settings.title {
        progress::status_info("Project", title);
    }

    let mut vcpkg = if skip_bootstrap {
        ops_bootstrap::existing(settings)?
    } else {
        ops_bootstrap::bootstrap(settings)?
    };
    if !skip_ports {
        ops_ports::copy_ports(settings)?;
    }

    let opts = InstallOptions {
        prune: settings.prune && !no_prune,
        max_conflict_retries: settings.max_conflict_retries,
    };
    let mut catalog = ControlCatalog::new(vcpkg.root());
    let summary = ops_install::install(&mut vcpkg, &mut catalog, &settings.packages, &opts)?;

    progress::status(
        "Finished",
        &format!(
            "{} installed, {} already present, {} removed for upgrade, {} pruned",
            progress::plural(summary.installed.len(), "package", "packages"),
            summary.already_installed,
            summary.upgraded,
            summary.pruned
        ),
    );
    Ok(())
}

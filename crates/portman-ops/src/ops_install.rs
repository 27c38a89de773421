//! Operation: bring the installed packages in line with the project.
//!
//! Runs in four phases: remove outdated packages, resolve (removing any
//! installed package whose features conflict with the request), install in
//! dependency order, and prune what the project no longer needs.

use portman_core::package_ref::PackageRef;
use portman_resolver::needed::{needed_packages, PortCatalog};
use portman_resolver::{order_for_removal, resolve};
use portman_util::errors::PortmanError;
use portman_util::progress;
use portman_vcpkg::output::{InstallResult, RemoveResult};
use portman_vcpkg::PackageTool;

/// Options for `portman install`.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Remove installed packages the project no longer needs.
    pub prune: bool,
    /// Feature-conflict removals allowed before giving up.
    pub max_conflict_retries: u32,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            prune: true,
            max_conflict_retries: 8,
        }
    }
}

/// What an install run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallSummary {
    /// Packages removed because their port had a newer version.
    pub upgraded: usize,
    /// Feature conflicts resolved by removing the installed package.
    pub conflicts: usize,
    pub installed: Vec<PackageRef>,
    pub already_installed: usize,
    pub pruned: usize,
}

/// Install `packages` and their dependencies with `tool`.
///
/// `catalog` describes the ports and is only consulted when pruning.
pub fn install<T, C>(
    tool: &mut T,
    catalog: &mut C,
    packages: &[PackageRef],
    opts: &InstallOptions,
) -> miette::Result<InstallSummary>
where
    T: PackageTool + ?Sized,
    C: PortCatalog + ?Sized,
{
    let mut summary = InstallSummary::default();

    progress::section("Upgrading existing packages");
    summary.upgraded = upgrade(tool)?;

    progress::section("Installing packages");
    let (order, conflicts) = resolve_with_recovery(tool, packages, opts.max_conflict_retries)?;
    summary.conflicts = conflicts;

    for package in order {
        let step = progress::Step::start("Installing", &package.to_string());
        match tool.install(&package) {
            Ok(InstallResult::Installed) => {
                step.ok("installed");
                summary.installed.push(package);
            }
            Ok(InstallResult::AlreadyInstalled) => {
                step.ok("previously installed");
                summary.already_installed += 1;
            }
            Err(e) => {
                step.fail("failed");
                return Err(e.into());
            }
        }
    }

    if opts.prune {
        progress::section("Removing unneeded packages");
        summary.pruned = prune(tool, catalog, packages)?;
    }

    Ok(summary)
}

/// Remove every package whose port has moved on, so resolution reinstalls it.
fn upgrade<T>(tool: &mut T) -> miette::Result<usize>
where
    T: PackageTool + ?Sized,
{
    let step = progress::Step::start("Enumerating", "upgradable packages");
    let upgradable = tool.list_upgradeable()?;
    step.ok(&progress::plural(upgradable.len(), "package", "packages"));

    if upgradable.is_empty() {
        return Ok(0);
    }
    Ok(remove_with_dependants(tool, &upgradable)?)
}

/// Resolve `packages`, removing installed packages that conflict with the
/// requested features and retrying from scratch.
///
/// Returns the install order and the number of conflicts resolved. Fails
/// once more than `max_retries` conflicts have been seen.
pub fn resolve_with_recovery<T>(
    tool: &mut T,
    packages: &[PackageRef],
    max_retries: u32,
) -> Result<(Vec<PackageRef>, usize), PortmanError>
where
    T: PackageTool + ?Sized,
{
    let mut conflicts = 0usize;
    loop {
        let step = progress::Step::start("Resolving", "dependency tree");
        let package = match resolve(packages, &mut *tool) {
            Ok(order) => {
                step.ok(&progress::plural(order.len(), "package", "packages"));
                return Ok((order, conflicts));
            }
            Err(PortmanError::FeatureConflict { package }) => {
                step.warn(&format!("feature mismatch in {package}"));
                package
            }
            Err(e) => {
                step.fail("failed");
                return Err(e);
            }
        };

        conflicts += 1;
        if conflicts > max_retries as usize {
            return Err(PortmanError::Generic {
                message: format!(
                    "gave up after {} (last: {package})",
                    progress::plural(conflicts, "feature conflict", "feature conflicts")
                ),
            });
        }

        tracing::info!("removing {package} to resolve a feature mismatch");
        progress::section("Removing packages with a feature mismatch");
        let conflicting = PackageRef::parse(&package)?;
        remove_with_dependants(tool, &[conflicting])?;
    }
}

/// Remove installed single-feature packages not reachable from `packages`.
fn prune<T, C>(tool: &mut T, catalog: &mut C, packages: &[PackageRef]) -> miette::Result<usize>
where
    T: PackageTool + ?Sized,
    C: PortCatalog + ?Sized,
{
    let step = progress::Step::start("Enumerating", "installed packages");
    let installed = tool.list_installed()?;
    step.ok(&progress::plural(installed.len(), "package", "packages"));

    let step = progress::Step::start("Enumerating", "all needed packages");
    let needed = needed_packages(packages, catalog)?;
    step.ok(&progress::plural(needed.len(), "package", "packages"));

    let unneeded: Vec<PackageRef> = installed.difference(&needed).cloned().collect();
    progress::status_info(
        "Found",
        &progress::plural(unneeded.len(), "unneeded package", "unneeded packages"),
    );
    if unneeded.is_empty() {
        return Ok(0);
    }
    Ok(remove_with_dependants(tool, &unneeded)?)
}

/// Remove `roots` and everything installed that depends on them, dependants
/// first. Returns how many packages were actually removed.
fn remove_with_dependants<T>(tool: &mut T, roots: &[PackageRef]) -> Result<usize, PortmanError>
where
    T: PackageTool + ?Sized,
{
    let step = progress::Step::start("Resolving", "removal order");
    let order = order_for_removal(roots, &mut *tool)?;
    step.ok(&progress::plural(order.len(), "package", "packages"));

    let mut removed = 0;
    for package in order {
        let step = progress::Step::start("Removing", &package.to_string());
        match tool.remove(&package) {
            Ok(RemoveResult::Removed) => {
                step.ok("removed");
                removed += 1;
            }
            Ok(RemoveResult::NotInstalled) => step.ok("not installed"),
            Err(e) => {
                step.fail("failed");
                return Err(e);
            }
        }
    }
    Ok(removed)
}

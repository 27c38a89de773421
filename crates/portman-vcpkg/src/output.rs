//! Interpretation of vcpkg's human-readable reports.
//!
//! vcpkg has no machine-readable output for the commands we drive, so every
//! answer is keyed off its fixed headings. Package lines carry a
//! `:triplet` suffix which is stripped; bare names are normalised to
//! `name[core]`.

use std::collections::BTreeSet;

use portman_core::package_ref::PackageRef;
use portman_resolver::{InstallOutcome, RemovalOutcome};
use portman_util::errors::PortmanError;

pub const ALREADY_INSTALLED: &str = "The following packages are already installed:";
pub const WILL_BE_REBUILT: &str = "The following packages will be rebuilt:";
pub const WILL_BE_INSTALLED: &str = "The following packages will be built and installed:";
pub const NOT_INSTALLED: &str = "The following packages are not installed, so not removed:";
pub const WILL_BE_REMOVED: &str = "The following packages will be removed:";
pub const NOTHING_TO_UPDATE: &str = "No packages need updating.";
pub const DIFFERS_FROM_PORT: &str = "The following packages differ from their port versions:";

/// What a real `vcpkg remove` reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveResult {
    NotInstalled,
    Removed,
}

/// What a real `vcpkg install` reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallResult {
    AlreadyInstalled,
    Installed,
}

fn has_heading(output: &str, heading: &str) -> bool {
    output.lines().any(|line| line.trim_end() == heading)
}

/// `curl[ssl]:x64-linux` → `curl[ssl]`, `zlib:x64-linux 1.2.11` → `zlib[core]`.
fn parse_spec(spec: &str) -> Result<PackageRef, PortmanError> {
    let name = spec.split_once(':').map_or(spec, |(name, _)| name);
    PackageRef::parse(name.trim())
}

/// Packages on `  * name:triplet` lines, i.e. the ones pulled in as dependencies.
fn starred_packages(output: &str) -> Result<Vec<PackageRef>, PortmanError> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("  * "))
        .filter(|spec| spec.contains(':'))
        .map(|spec| parse_spec(spec.trim_end()))
        .collect()
}

fn unrecognised(package: &PackageRef, what: &str) -> PortmanError {
    PortmanError::QueryFailed {
        package: package.to_string(),
        message: format!("unrecognised output from `vcpkg {what}`"),
    }
}

/// Interpret `vcpkg install --dry-run --recurse <package>`.
pub fn parse_install_plan(
    output: &str,
    package: &PackageRef,
) -> Result<InstallOutcome, PortmanError> {
    if has_heading(output, ALREADY_INSTALLED) {
        return Ok(InstallOutcome::AlreadySatisfied);
    }
    if has_heading(output, WILL_BE_REBUILT) {
        return Ok(InstallOutcome::FeatureConflict(package.clone()));
    }
    if has_heading(output, WILL_BE_INSTALLED) {
        return Ok(InstallOutcome::Dependencies(starred_packages(output)?));
    }
    Err(unrecognised(package, "install --dry-run"))
}

/// Interpret `vcpkg remove --dry-run --recurse <package>`.
pub fn parse_removal_plan(
    output: &str,
    package: &PackageRef,
) -> Result<RemovalOutcome, PortmanError> {
    if has_heading(output, NOT_INSTALLED) {
        return Ok(RemovalOutcome::NotInstalled);
    }
    if has_heading(output, WILL_BE_REMOVED) {
        return Ok(RemovalOutcome::Dependents(starred_packages(output)?));
    }
    Err(unrecognised(package, "remove --dry-run"))
}

/// Interpret `vcpkg update`: the installed packages whose port has moved on.
pub fn parse_upgradeable(output: &str) -> Result<Vec<PackageRef>, PortmanError> {
    if has_heading(output, NOTHING_TO_UPDATE) {
        return Ok(Vec::new());
    }
    if !has_heading(output, DIFFERS_FROM_PORT) {
        return Err(PortmanError::Tool {
            message: "unrecognised output from `vcpkg update`".to_string(),
        });
    }
    output
        .lines()
        .filter_map(|line| line.strip_prefix("    "))
        .filter(|spec| spec.contains(':'))
        .map(parse_spec)
        .collect()
}

/// Interpret `vcpkg list`: one installed single-feature package per line.
///
/// Lines without a `:triplet` part (such as the "nothing installed" notice)
/// are ignored.
pub fn parse_installed(output: &str) -> Result<BTreeSet<PackageRef>, PortmanError> {
    output
        .lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| line.split_once(':').map(|(name, _)| name))
        .filter(|name| !name.is_empty() && !name.contains(' '))
        .map(PackageRef::parse)
        .collect()
}

/// Interpret a real `vcpkg remove <package>`.
pub fn parse_remove(output: &str, package: &PackageRef) -> Result<RemoveResult, PortmanError> {
    if has_heading(output, WILL_BE_REMOVED) {
        Ok(RemoveResult::Removed)
    } else if has_heading(output, NOT_INSTALLED) {
        Ok(RemoveResult::NotInstalled)
    } else {
        Err(PortmanError::Tool {
            message: format!("unrecognised output from `vcpkg remove {package}`"),
        })
    }
}

/// Interpret a real `vcpkg install <package>`, or `None` if it did not say
/// it installed anything.
pub fn parse_install(output: &str) -> Option<InstallResult> {
    if has_heading(output, ALREADY_INSTALLED) {
        Some(InstallResult::AlreadyInstalled)
    } else if has_heading(output, WILL_BE_INSTALLED) {
        Some(InstallResult::Installed)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(s: &str) -> PackageRef {
        PackageRef::parse(s).unwrap()
    }

    const INSTALL_PLAN: &str = "\
Computing installation plan...
The following packages will be built and installed:
  * openssl[core]:x64-linux
    curl[core,ssl]:x64-linux
  * zlib:x64-linux
Additional packages (*) will be modified to complete this operation.
";

    #[test]
    fn install_plan_lists_starred_dependencies() {
        let outcome = parse_install_plan(INSTALL_PLAN, &r("curl[core,ssl]")).unwrap();
        assert_eq!(
            outcome,
            InstallOutcome::Dependencies(vec![r("openssl"), r("zlib")])
        );
    }

    #[test]
    fn install_plan_with_windows_line_endings() {
        let crlf = INSTALL_PLAN.replace('\n', "\r\n");
        let normalised = portman_util::process::decode_output(crlf.as_bytes());
        let outcome = parse_install_plan(&normalised, &r("curl[core,ssl]")).unwrap();
        assert!(matches!(outcome, InstallOutcome::Dependencies(deps) if deps.len() == 2));
    }

    #[test]
    fn install_plan_already_installed() {
        let output = "The following packages are already installed:\n    zlib:x64-linux\n";
        assert_eq!(
            parse_install_plan(output, &r("zlib")).unwrap(),
            InstallOutcome::AlreadySatisfied
        );
    }

    #[test]
    fn install_plan_rebuild_is_a_conflict() {
        let output = "The following packages will be rebuilt:\n    curl[core,ssl]:x64-osx\n";
        assert_eq!(
            parse_install_plan(output, &r("curl[ssl]")).unwrap(),
            InstallOutcome::FeatureConflict(r("curl[ssl]"))
        );
    }

    #[test]
    fn install_plan_garbage_is_query_failure() {
        let err = parse_install_plan("Error: no such port\n", &r("nope")).unwrap_err();
        assert!(matches!(err, PortmanError::QueryFailed { package, .. } if package == "nope[core]"));
    }

    #[test]
    fn removal_plan_outcomes() {
        let output = "\
The following packages will be removed:
  * curl:x64-linux
    zlib:x64-linux
";
        assert_eq!(
            parse_removal_plan(output, &r("zlib")).unwrap(),
            RemovalOutcome::Dependents(vec![r("curl")])
        );

        let output = "The following packages are not installed, so not removed:\n    fmt:x64-linux\n";
        assert_eq!(
            parse_removal_plan(output, &r("fmt")).unwrap(),
            RemovalOutcome::NotInstalled
        );
    }

    #[test]
    fn upgradeable_packages() {
        let output = "\
Using local portfile versions. To update the local portfiles, use `git pull`.
The following packages differ from their port versions:
    fmt:x64-linux                 5.3.0 -> 6.0.0
    glm:x64-linux                 0.9.9.5 -> 0.9.9.6

To update these packages and all dependencies, run
";
        assert_eq!(parse_upgradeable(output).unwrap(), vec![r("fmt"), r("glm")]);
        assert!(parse_upgradeable("No packages need updating.\n")
            .unwrap()
            .is_empty());
        assert!(parse_upgradeable("???").is_err());
    }

    #[test]
    fn installed_list() {
        let output = "\
curl:x64-linux                                     7.66.0           A library for transferring data
curl[ssl]:x64-linux                                                 Default SSL backend
zlib:x64-linux                                     1.2.11-5         A compression library
";
        let installed = parse_installed(output).unwrap();
        let rendered: Vec<String> = installed.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["curl[core]", "curl[ssl]", "zlib[core]"]);

        let empty = parse_installed("No packages are installed. Did you mean `search`?\n").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn real_remove_and_install() {
        assert_eq!(
            parse_remove("The following packages will be removed:\n    fmt:x64-linux\n", &r("fmt"))
                .unwrap(),
            RemoveResult::Removed
        );
        assert_eq!(
            parse_remove(
                "The following packages are not installed, so not removed:\n    fmt:x64-linux\n",
                &r("fmt")
            )
            .unwrap(),
            RemoveResult::NotInstalled
        );
        assert_eq!(parse_install(INSTALL_PLAN), Some(InstallResult::Installed));
        assert_eq!(parse_install("Error: building zlib failed\n"), None);
    }
}

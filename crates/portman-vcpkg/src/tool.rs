//! Running the vcpkg binary of one checkout for one triplet.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use portman_core::package_ref::PackageRef;
use portman_core::platform;
use portman_resolver::{DependencyQuery, RemovalQuery};
use portman_util::errors::PortmanError;
use portman_util::process::{decode_output, CommandBuilder};

use crate::output::{self, InstallResult, RemoveResult};

/// Captured result of one vcpkg run.
#[derive(Debug)]
pub struct Invocation {
    pub command: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl Invocation {
    fn into_error(self) -> PortmanError {
        PortmanError::Tool {
            message: format!(
                "`{}` failed with {}\n--- stdout ---\n{}\n--- stderr ---\n{}",
                self.command, self.status, self.stdout, self.stderr
            ),
        }
    }
}

/// Everything the install operation needs from a package tool.
///
/// The query supertraits drive resolution; the remaining methods mutate the
/// installed tree.
pub trait PackageTool: DependencyQuery + RemovalQuery {
    /// Installed single-feature packages.
    fn list_installed(&mut self) -> Result<BTreeSet<PackageRef>, PortmanError>;

    /// Installed packages whose port has a newer version.
    fn list_upgradeable(&mut self) -> Result<Vec<PackageRef>, PortmanError>;

    fn remove(&mut self, package: &PackageRef) -> Result<RemoveResult, PortmanError>;

    fn install(&mut self, package: &PackageRef) -> Result<InstallResult, PortmanError>;
}

/// A bootstrapped vcpkg checkout.
#[derive(Debug, Clone)]
pub struct Vcpkg {
    root: PathBuf,
    triplet: String,
}

impl Vcpkg {
    pub fn new(root: impl Into<PathBuf>, triplet: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            triplet: triplet.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn triplet(&self) -> &str {
        &self.triplet
    }

    pub fn exe_path(&self) -> PathBuf {
        self.root.join(platform::vcpkg_exe_name())
    }

    /// Whether the executable has been built.
    pub fn is_bootstrapped(&self) -> bool {
        self.exe_path().is_file()
    }

    fn command(&self, args: &[&str]) -> CommandBuilder {
        CommandBuilder::new(self.exe_path().to_string_lossy())
            .arg("--vcpkg-root")
            .arg(self.root.to_string_lossy())
            .arg("--triplet")
            .arg(self.triplet.as_str())
            .args(args.iter().copied())
    }

    /// Run vcpkg and capture its output, whatever the exit status.
    pub fn run(&self, args: &[&str]) -> Result<Invocation, PortmanError> {
        let cmd = self.command(args);
        let output = cmd.exec().map_err(|e| PortmanError::Tool {
            message: format!("failed to run {}: {e}", self.exe_path().display()),
        })?;
        Ok(Invocation {
            command: cmd.display(),
            status: output.status,
            stdout: decode_output(&output.stdout),
            stderr: decode_output(&output.stderr),
        })
    }

    /// Run vcpkg, turning a non-zero exit status into a [`PortmanError::Tool`].
    pub fn invoke(&self, args: &[&str]) -> Result<Invocation, PortmanError> {
        let invocation = self.run(args)?;
        if !invocation.status.success() {
            return Err(invocation.into_error());
        }
        Ok(invocation)
    }

    /// Contents of every `buildtrees/<name>/*.log` file, sorted by path.
    pub fn build_logs(&self, package: &PackageRef) -> Vec<(PathBuf, String)> {
        let dir = self.root.join("buildtrees").join(&package.name);
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
            .into_iter()
            .flatten()
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "log"))
            .collect();
        paths.sort();
        paths
            .into_iter()
            .filter_map(|path| {
                let content = std::fs::read_to_string(&path).ok()?;
                Some((path, content))
            })
            .collect()
    }
}

impl DependencyQuery for Vcpkg {
    fn query_install_deps(
        &mut self,
        package: &PackageRef,
    ) -> Result<portman_resolver::InstallOutcome, PortmanError> {
        let spec = package.to_string();
        let out = self.invoke(&["install", "--dry-run", "--recurse", &spec])?;
        output::parse_install_plan(&out.stdout, package)
    }
}

impl RemovalQuery for Vcpkg {
    fn query_removal_deps(
        &mut self,
        package: &PackageRef,
    ) -> Result<portman_resolver::RemovalOutcome, PortmanError> {
        let spec = package.to_string();
        let out = self.invoke(&["remove", "--recurse", "--dry-run", &spec])?;
        output::parse_removal_plan(&out.stdout, package)
    }
}

impl PackageTool for Vcpkg {
    fn list_installed(&mut self) -> Result<BTreeSet<PackageRef>, PortmanError> {
        let out = self.invoke(&["list"])?;
        output::parse_installed(&out.stdout)
    }

    fn list_upgradeable(&mut self) -> Result<Vec<PackageRef>, PortmanError> {
        let out = self.invoke(&["update"])?;
        output::parse_upgradeable(&out.stdout)
    }

    fn remove(&mut self, package: &PackageRef) -> Result<RemoveResult, PortmanError> {
        let spec = package.to_string();
        let out = self.invoke(&["remove", &spec])?;
        output::parse_remove(&out.stdout, package)
    }

    /// A failed build is reported together with its build logs.
    fn install(&mut self, package: &PackageRef) -> Result<InstallResult, PortmanError> {
        let spec = package.to_string();
        let out = self.run(&["install", &spec])?;

        match output::parse_install(&out.stdout) {
            Some(result) if out.status.success() => return Ok(result),
            _ => {}
        }

        let mut message = format!("installing {package} failed ({})", out.status);
        for (path, log) in self.build_logs(package) {
            let _ = write!(message, "\n--- {} ---\n{log}", path.display());
        }
        if !out.stderr.trim().is_empty() {
            let _ = write!(message, "\n--- stderr ---\n{}", out.stderr);
        }
        Err(PortmanError::Tool { message })
    }
}

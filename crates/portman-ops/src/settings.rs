//! Effective settings: command-line overrides over the project manifest,
//! over the global configuration, over built-in defaults.

use std::path::{Path, PathBuf};

use portman_core::config::{
    GlobalConfig, ProjectConfig, DEFAULT_PORT_DIR, DEFAULT_VCPKG_DIR, DEFAULT_VCPKG_URL,
    PROJECT_FILE_NAME,
};
use portman_core::package_ref::PackageRef;
use portman_core::platform;
use portman_util::fs::absolutize;

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub vcpkg_dir: Option<PathBuf>,
    pub port_dir: Option<PathBuf>,
    pub vcpkg_url: Option<String>,
    pub triplet: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub source_dir: PathBuf,
    pub title: Option<String>,
    pub packages: Vec<PackageRef>,
    pub vcpkg_dir: PathBuf,
    pub port_dir: PathBuf,
    pub vcpkg_url: String,
    pub triplet: String,
    pub max_conflict_retries: u32,
    pub prune: bool,
}

impl Settings {
    /// Read the manifest and global configuration and merge them with `overrides`.
    pub fn load(source_dir: &Path, overrides: &Overrides) -> miette::Result<Self> {
        let manifest_path = match &overrides.config {
            Some(path) => absolutize(source_dir, path),
            None => source_dir.join(PROJECT_FILE_NAME),
        };
        let project = ProjectConfig::from_path(&manifest_path)?;
        let global = GlobalConfig::load()?;
        Self::merge(source_dir, overrides, &project, &global)
    }

    /// Merge already-loaded configuration. Relative paths are taken against `source_dir`.
    pub fn merge(
        source_dir: &Path,
        overrides: &Overrides,
        project: &ProjectConfig,
        global: &GlobalConfig,
    ) -> miette::Result<Self> {
        let vcpkg_dir = overrides
            .vcpkg_dir
            .clone()
            .or_else(|| project.vcpkg.dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_VCPKG_DIR));
        let port_dir = overrides
            .port_dir
            .clone()
            .or_else(|| project.vcpkg.ports.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PORT_DIR));
        let vcpkg_url = overrides
            .vcpkg_url
            .clone()
            .or_else(|| project.vcpkg.url.clone())
            .or_else(|| global.vcpkg.url.clone())
            .unwrap_or_else(|| DEFAULT_VCPKG_URL.to_string());
        let triplet = overrides
            .triplet
            .clone()
            .or_else(|| project.vcpkg.triplet.clone())
            .unwrap_or_else(|| platform::host_triplet().to_string());

        Ok(Self {
            source_dir: source_dir.to_path_buf(),
            title: project.title(),
            packages: project.packages()?,
            vcpkg_dir: absolutize(source_dir, &vcpkg_dir),
            port_dir: absolutize(source_dir, &port_dir),
            vcpkg_url,
            triplet,
            max_conflict_retries: global.install.max_conflict_retries,
            prune: global.install.prune,
        })
    }
}

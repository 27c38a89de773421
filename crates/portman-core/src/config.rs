use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use portman_util::errors::PortmanError;

use crate::package_ref::PackageRef;

/// Default file name of the project manifest.
pub const PROJECT_FILE_NAME: &str = "portman.toml";
/// Upstream vcpkg repository used when nothing else is configured.
pub const DEFAULT_VCPKG_URL: &str = "https://github.com/Microsoft/vcpkg";
/// vcpkg checkout location, relative to the source directory.
pub const DEFAULT_VCPKG_DIR: &str = "build-vcpkg";
/// Custom port overlays, relative to the source directory.
pub const DEFAULT_PORT_DIR: &str = "external/vcpkg/ports";

/// The parsed representation of a `portman.toml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub vcpkg: VcpkgSection,
}

/// Project identity and requested packages from `[project]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    /// Package references such as `"zlib"` or `"curl[ssl,http2]"`.
    #[serde(default)]
    pub packages: Vec<String>,
}

/// vcpkg location and behaviour from `[vcpkg]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VcpkgSection {
    #[serde(default)]
    pub dir: Option<PathBuf>,
    #[serde(default)]
    pub ports: Option<PathBuf>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub triplet: Option<String>,
}

impl ProjectConfig {
    /// Load a `portman.toml`, or return defaults if the file doesn't exist.
    ///
    /// Package references are validated here so malformed entries are
    /// reported before any resolution starts.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::warn!("{} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| PortmanError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse_toml(&content)
    }

    /// Parse a `portman.toml` from a string.
    pub fn parse_toml(content: &str) -> miette::Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| PortmanError::Config {
            message: format!("Failed to parse {PROJECT_FILE_NAME}: {e}"),
        })?;
        config.packages()?;
        Ok(config)
    }

    /// The requested packages as parsed references, in manifest order.
    pub fn packages(&self) -> Result<Vec<PackageRef>, PortmanError> {
        self.project
            .packages
            .iter()
            .map(|p| PackageRef::parse(p))
            .collect()
    }

    /// Human-readable project title, e.g. `nova-renderer 0.9.0`.
    pub fn title(&self) -> Option<String> {
        let name = self.project.name.as_deref()?;
        Some(match self.project.version.as_deref() {
            Some(version) => format!("{name} {version}"),
            None => name.to_string(),
        })
    }
}

/// Global user configuration loaded from `~/.portman/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub vcpkg: GlobalVcpkgConfig,

    #[serde(default)]
    pub install: InstallConfig,
}

/// Global vcpkg defaults from `[vcpkg]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalVcpkgConfig {
    #[serde(default)]
    pub url: Option<String>,
}

/// Install behaviour from `[install]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// How many feature-conflict removals an install may perform before giving up.
    #[serde(default = "default_max_conflict_retries", rename = "max-conflict-retries")]
    pub max_conflict_retries: u32,
    /// Remove installed packages no longer needed by the project.
    #[serde(default = "default_prune")]
    pub prune: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            max_conflict_retries: default_max_conflict_retries(),
            prune: default_prune(),
        }
    }
}

fn default_max_conflict_retries() -> u32 {
    8
}

fn default_prune() -> bool {
    true
}

impl GlobalConfig {
    /// Load the global configuration from `~/.portman/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load the global configuration from an explicit path.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if path.is_file() {
            let content = std::fs::read_to_string(path).map_err(|e| PortmanError::Generic {
                message: format!("Failed to read global config: {e}"),
            })?;
            toml::from_str(&content).map_err(|e| {
                PortmanError::Generic {
                    message: format!("Failed to parse global config: {e}"),
                }
                .into()
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        portman_util::dirs_path().join("config.toml")
    }
}

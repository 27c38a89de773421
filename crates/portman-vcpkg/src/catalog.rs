//! Port descriptions read from a vcpkg checkout.

use std::path::{Path, PathBuf};

use portman_core::control::ControlFile;
use portman_resolver::needed::PortCatalog;
use portman_util::errors::PortmanError;

/// Reads `<root>/ports/<name>/CONTROL`.
#[derive(Debug, Clone)]
pub struct ControlCatalog {
    ports_dir: PathBuf,
}

impl ControlCatalog {
    pub fn new(vcpkg_root: &Path) -> Self {
        Self {
            ports_dir: vcpkg_root.join("ports"),
        }
    }

    pub fn control_path(&self, name: &str) -> PathBuf {
        self.ports_dir.join(name).join("CONTROL")
    }
}

impl PortCatalog for ControlCatalog {
    fn control(&mut self, name: &str) -> Result<ControlFile, PortmanError> {
        let path = self.control_path(name);
        let content = std::fs::read_to_string(&path).map_err(|e| PortmanError::Tool {
            message: format!("cannot read port description {}: {e}", path.display()),
        })?;
        ControlFile::parse(&content)
    }
}

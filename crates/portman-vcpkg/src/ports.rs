//! Project-local port overlays copied into the vcpkg checkout.

use std::path::Path;

use portman_util::errors::PortmanError;

/// Names of the port directories under `port_dir`, sorted.
///
/// A missing `port_dir` simply has no ports.
pub fn enumerate_ports(port_dir: &Path) -> Result<Vec<String>, PortmanError> {
    if !port_dir.is_dir() {
        tracing::debug!("no port directory at {}", port_dir.display());
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in std::fs::read_dir(port_dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Copy one port into `<vcpkg_root>/ports/<name>/`. Returns the number of
/// files that were new or out of date.
pub fn copy_port(port_dir: &Path, name: &str, vcpkg_root: &Path) -> Result<usize, PortmanError> {
    let dest = vcpkg_root.join("ports").join(name);
    let copied = portman_util::fs::copy_dir_updating(&port_dir.join(name), &dest)?;
    tracing::debug!("copied {copied} files of port {name} to {}", dest.display());
    Ok(copied)
}

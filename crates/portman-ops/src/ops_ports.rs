//! Operation: copy project-local port overlays into the vcpkg checkout.

use portman_util::progress;
use portman_vcpkg::ports;

use crate::Settings;

/// Result of copying the port overlays.
#[derive(Debug, Default)]
pub struct PortsResult {
    /// Port name and number of files written, in copy order.
    pub ports: Vec<(String, usize)>,
}

impl PortsResult {
    pub fn files_written(&self) -> usize {
        self.ports.iter().map(|(_, n)| n).sum()
    }
}

/// Copy every port under the configured port directory into `<vcpkg>/ports/`.
pub fn copy_ports(settings: &Settings) -> miette::Result<PortsResult> {
    progress::section("Copying custom ports");

    let names = ports::enumerate_ports(&settings.port_dir)?;
    progress::status_info(
        "Found",
        &format!(
            "{} in {}",
            progress::plural(names.len(), "port", "ports"),
            settings.port_dir.display()
        ),
    );

    let mut result = PortsResult::default();
    for name in names {
        let step = progress::Step::start("Copying", &format!("{name} port"));
        let written = match ports::copy_port(&settings.port_dir, &name, &settings.vcpkg_dir) {
            Ok(n) => n,
            Err(e) => {
                step.fail("failed");
                return Err(e.into());
            }
        };
        if written == 0 {
            step.ok("up to date");
        } else {
            step.ok(&progress::plural(written, "file", "files"));
        }
        result.ports.push((name, written));
    }
    Ok(result)
}

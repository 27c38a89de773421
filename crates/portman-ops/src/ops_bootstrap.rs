//! Operation: make sure a bootstrapped vcpkg checkout exists.

use portman_util::progress;
use portman_vcpkg::bootstrap;
use portman_vcpkg::Vcpkg;

use crate::Settings;

/// Download vcpkg into the configured directory if it is missing, then
/// build its executable if that is missing.
pub fn bootstrap(settings: &Settings) -> miette::Result<Vcpkg> {
    progress::section("Preparing vcpkg");
    bootstrap::prepare(&settings.vcpkg_dir, &settings.vcpkg_url, &settings.triplet)
}

/// Use an existing checkout as is, failing if its executable is missing.
pub fn existing(settings: &Settings) -> miette::Result<Vcpkg> {
    let vcpkg = Vcpkg::new(&settings.vcpkg_dir, &settings.triplet);
    if !vcpkg.is_bootstrapped() {
        return Err(portman_util::errors::PortmanError::Tool {
            message: format!(
                "no vcpkg executable at {}; run `portman bootstrap` first",
                vcpkg.exe_path().display()
            ),
        }
        .into());
    }
    Ok(vcpkg)
}

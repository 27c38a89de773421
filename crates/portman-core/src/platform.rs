//! Host platform detection for vcpkg triplets and executable names.

/// The vcpkg triplet matching the host, e.g. `x64-linux`.
pub fn host_triplet() -> &'static str {
    if cfg!(target_os = "windows") {
        "x64-windows"
    } else if cfg!(target_os = "macos") {
        "x64-osx"
    } else {
        "x64-linux"
    }
}

/// File name of the vcpkg executable inside its checkout.
pub fn vcpkg_exe_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "vcpkg.exe"
    } else {
        "vcpkg"
    }
}

/// Bootstrap script shipped with a vcpkg checkout for this host.
pub fn bootstrap_script_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "bootstrap-vcpkg.bat"
    } else {
        "bootstrap-vcpkg.sh"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplet_matches_exe_name() {
        let windows = host_triplet().ends_with("windows");
        assert_eq!(vcpkg_exe_name().ends_with(".exe"), windows);
        assert_eq!(bootstrap_script_name().ends_with(".bat"), windows);
    }
}

use miette::Result;

use portman_ops::{ops_bootstrap, Settings};
use portman_util::progress;

pub fn exec(settings: &Settings) -> Result<()> {
    let vcpkg = ops_bootstrap::bootstrap(settings)?;
    progress::status("Ready", &vcpkg.exe_path().display().to_string());
    Ok(())
}

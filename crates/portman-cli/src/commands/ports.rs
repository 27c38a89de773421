use miette::Result;

use portman_ops::{ops_ports, Settings};
use portman_util::progress;

pub fn exec(settings: &Settings) -> Result<()> {
    let result = ops_ports::copy_ports(settings)?;
    progress::status(
        "Finished",
        &format!(
            "{}, {} written",
            progress::plural(result.ports.len(), "port", "ports"),
            progress::plural(result.files_written(), "file", "files")
        ),
    );
    Ok(())
}

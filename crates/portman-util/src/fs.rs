use std::path::{Path, PathBuf};

/// Ensure a directory exists, creating it and any parents if needed.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Recursively copy `src` into `dest`, creating directories as needed.
///
/// A file is only overwritten when the source copy is newer than the
/// destination. Returns the number of files written.
pub fn copy_dir_updating(src: &Path, dest: &Path) -> std::io::Result<usize> {
    ensure_dir(dest)?;
    let mut copied = 0;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copied += copy_dir_updating(&from, &to)?;
        } else if is_newer(&from, &to)? {
            std::fs::copy(&from, &to)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn is_newer(src: &Path, dest: &Path) -> std::io::Result<bool> {
    let dest_meta = match std::fs::metadata(dest) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e),
    };
    let src_modified = std::fs::metadata(src)?.modified()?;
    Ok(src_modified > dest_meta.modified()?)
}

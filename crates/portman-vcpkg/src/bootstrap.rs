//! Obtaining and building a vcpkg checkout.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use portman_core::platform;
use portman_util::errors::PortmanError;
use portman_util::process::{decode_output, CommandBuilder};
use portman_util::progress;

use crate::tool::Vcpkg;

/// Path inside the repository archive.
const ARCHIVE_PATH: &str = "archive/master.zip";
/// Top-level directory of the archive; only its contents are extracted.
const ARCHIVE_SUBDIR: &str = "vcpkg-master/";

/// Files whose presence marks a directory as a vcpkg checkout.
const CHECKOUT_MARKERS: [&str; 3] = [".vcpkg-root", "bootstrap-vcpkg.sh", "bootstrap-vcpkg.bat"];

/// Whether `dir` holds a vcpkg checkout.
pub fn is_checkout(dir: &Path) -> bool {
    CHECKOUT_MARKERS.iter().all(|f| dir.join(f).is_file())
}

/// Download URL of the master branch archive for a repository URL.
pub fn archive_url(repo_url: &str) -> String {
    format!("{}/{ARCHIVE_PATH}", repo_url.trim_end_matches('/'))
}

/// Download a file from `url` to `dest`, showing a progress bar.
pub fn download_file(url: &str, dest: &Path) -> miette::Result<()> {
    tracing::info!("Downloading {}", url);

    let resp = reqwest::blocking::Client::builder()
        .user_agent("portman")
        .build()
        .map_err(|e| PortmanError::Network {
            message: format!("Failed to build HTTP client: {e}"),
        })?
        .get(url)
        .send()
        .map_err(|e| PortmanError::Network {
            message: format!("Failed to download {url}: {e}"),
        })?;

    if !resp.status().is_success() {
        return Err(PortmanError::Network {
            message: format!("HTTP {} for {url}", resp.status()),
        }
        .into());
    }

    let pb = resp.content_length().map(progress::download_bar);

    let mut out = File::create(dest).map_err(PortmanError::Io)?;
    let mut reader = resp;
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).map_err(|e| PortmanError::Network {
            message: format!("Read error: {e}"),
        })?;
        if n == 0 {
            break;
        }
        out.write_all(&buf[..n]).map_err(PortmanError::Io)?;
        if let Some(ref pb) = pb {
            pb.inc(n as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(())
}

/// Extract the entries of `zip_path` below `subdir` into `dest`, dropping
/// the `subdir` prefix. Returns the number of files written.
pub fn extract_subtree(zip_path: &Path, dest: &Path, subdir: &str) -> miette::Result<usize> {
    let file = File::open(zip_path).map_err(PortmanError::Io)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| PortmanError::Tool {
        message: format!("Failed to open zip: {e}"),
    })?;
    let prefix = Path::new(subdir.trim_end_matches('/'));

    let mut written = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| PortmanError::Tool {
            message: format!("Zip entry error: {e}"),
        })?;

        let name = entry.mangled_name();
        let Ok(relative) = name.strip_prefix(prefix) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path).map_err(PortmanError::Io)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(PortmanError::Io)?;
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).map_err(|e| PortmanError::Tool {
            message: format!("Failed to read zip entry: {e}"),
        })?;
        fs::write(&out_path, &buf).map_err(PortmanError::Io)?;
        written += 1;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))
                    .map_err(PortmanError::Io)?;
            }
        }
    }
    Ok(written)
}

/// Download the repository archive and unpack it into `dir`.
pub fn download_checkout(dir: &Path, repo_url: &str) -> miette::Result<()> {
    let url = archive_url(repo_url);
    let tmp = tempfile::tempdir().map_err(PortmanError::Io)?;
    let zip_path = tmp.path().join("vcpkg-master.zip");

    let step = progress::Step::start("Downloading", &url);
    download_file(&url, &zip_path)?;
    step.ok("done");

    let step = progress::Step::start("Extracting", &dir.display().to_string());
    portman_util::fs::ensure_dir(dir).map_err(PortmanError::Io)?;
    let files = extract_subtree(&zip_path, dir, ARCHIVE_SUBDIR)?;
    if !is_checkout(dir) {
        step.fail("not a vcpkg checkout");
        return Err(PortmanError::Tool {
            message: format!("{url} did not contain a vcpkg checkout"),
        }
        .into());
    }
    step.ok(&progress::plural(files, "file", "files"));
    Ok(())
}

/// Build the vcpkg executable unless it already exists.
///
/// Returns `false` when there was nothing to do.
pub fn bootstrap(vcpkg: &Vcpkg) -> miette::Result<bool> {
    if vcpkg.is_bootstrapped() {
        return Ok(false);
    }

    let script = vcpkg.root().join(platform::bootstrap_script_name());
    let cmd = if cfg!(windows) {
        CommandBuilder::new(script.to_string_lossy())
    } else {
        CommandBuilder::new("bash").arg(script.to_string_lossy())
    };
    let cmd = cmd.cwd(vcpkg.root().to_string_lossy());

    let step = progress::Step::start("Bootstrapping", "vcpkg (this may take some time)");
    let output = cmd.exec()?;
    if !output.status.success() {
        step.fail("failed");
        return Err(PortmanError::Tool {
            message: format!(
                "`{}` failed with {}\n--- stdout ---\n{}\n--- stderr ---\n{}",
                cmd.display(),
                output.status,
                decode_output(&output.stdout),
                decode_output(&output.stderr)
            ),
        }
        .into());
    }
    step.ok("done");
    Ok(true)
}

/// Make sure `dir` holds a bootstrapped vcpkg, downloading it if needed.
pub fn prepare(dir: &Path, repo_url: &str, triplet: &str) -> miette::Result<Vcpkg> {
    let step = progress::Step::start("Checking", &format!("for vcpkg in {}", dir.display()));
    if is_checkout(dir) {
        step.ok("found");
    } else {
        step.warn("not found");
        download_checkout(dir, repo_url)?;
    }

    let vcpkg = Vcpkg::new(dir, triplet);
    if !bootstrap(&vcpkg)? {
        progress::status_info("Fresh", &format!("{} already built", vcpkg.exe_path().display()));
    }
    Ok(vcpkg)
}

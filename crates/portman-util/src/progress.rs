use std::io::Write;
use std::time::Instant;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Print a Cargo-style status line: `  Installing zlib[core]`
///
/// The `label` is right-padded to 12 characters and printed in bold green,
/// followed by the `message` in the default terminal colour.
pub fn status(label: &str, message: &str) {
    let green_bold = Style::new().green().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        green_bold.apply_to(label),
    );
}

/// Like [`status`] but uses bold cyan for informational (non-action) messages.
pub fn status_info(label: &str, message: &str) {
    let cyan_bold = Style::new().cyan().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        cyan_bold.apply_to(label),
    );
}

/// Print a warning-style status line (bold yellow label).
pub fn status_warn(label: &str, message: &str) {
    let yellow_bold = Style::new().yellow().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        yellow_bold.apply_to(label),
    );
}

/// Print an error-style status line (bold red label).
pub fn status_error(label: &str, message: &str) {
    let red_bold = Style::new().red().bold();
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        red_bold.apply_to(label),
    );
}

/// Print a bold section heading separating the phases of an operation.
pub fn section(title: &str) {
    let white_bold = Style::new().white().bold();
    let _ = writeln!(std::io::stderr(), "{}", white_bold.apply_to(title));
}

/// A unit of work whose outcome and wall-clock duration are reported when it ends.
///
/// ```no_run
/// let step = portman_util::progress::Step::start("Enumerating", "installed packages");
/// step.ok("12 packages");
/// ```
pub struct Step {
    label: String,
    message: String,
    started: Instant,
}

impl Step {
    pub fn start(label: &str, message: &str) -> Self {
        tracing::debug!("{label} {message}");
        Self {
            label: label.to_string(),
            message: message.to_string(),
            started: Instant::now(),
        }
    }

    fn line(&self, outcome: &str) -> String {
        let elapsed = self.started.elapsed().as_secs_f64();
        format!("{}: {outcome} ({elapsed:.2}s)", self.message)
    }

    /// Finish the step successfully.
    pub fn ok(self, outcome: &str) {
        status(&self.label, &self.line(outcome));
    }

    /// Finish the step with a non-fatal remark.
    pub fn warn(self, outcome: &str) {
        status_warn(&self.label, &self.line(outcome));
    }

    /// Finish the step as failed. The caller still reports the error itself.
    pub fn fail(self, outcome: &str) {
        status_error(&self.label, &self.line(outcome));
    }
}

/// Pluralise a count for status messages: `plural(1, "package", "packages")`.
pub fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

/// Create a byte-counting progress bar for downloads of known size.
pub fn download_bar(total_bytes: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    pb.set_style(
        ProgressStyle::with_template("  {bar:40.cyan/dim} {bytes}/{total_bytes} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plural_forms() {
        assert_eq!(plural(0, "package", "packages"), "0 packages");
        assert_eq!(plural(1, "package", "packages"), "1 package");
        assert_eq!(plural(3, "dependency", "dependencies"), "3 dependencies");
    }

    #[test]
    fn step_line_includes_elapsed() {
        let step = Step::start("Resolving", "dependency tree");
        let line = step.line("4 packages");
        assert!(line.starts_with("dependency tree: 4 packages ("));
        assert!(line.ends_with("s)"));
    }
}

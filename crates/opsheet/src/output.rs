//! Build status lines on stderr.

use std::error::Error;
use std::path::Path;

use console::{Style, Term};

/// Status reporter for `opsheet build`.
///
/// Everything goes to stderr so the page itself can be piped from stdout.
pub(crate) struct Output {
    term: Term,
    label: Style,
    done: Style,
    failed: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().cyan().bold(),
            done: Style::new().green(),
            failed: Style::new().red(),
        }
    }

    /// Announce which section documents are rendered.
    pub(crate) fn building(&self, ops_dir: &Path, sections: usize) {
        let line = format!(
            "{} {sections} sections from {}",
            self.label.apply_to("Building"),
            ops_dir.display()
        );
        let _ = self.term.write_line(&line);
    }

    /// Report the written page.
    pub(crate) fn written(&self, path: &Path, bytes: usize) {
        let line = format!("Wrote {} ({})", path.display(), format_size(bytes));
        let _ = self.term.write_line(&self.done.apply_to(line).to_string());
    }

    /// Report a failed build with its causes.
    pub(crate) fn failed(&self, err: &dyn Error) {
        for line in failure_lines(err) {
            let _ = self.term.write_line(&self.failed.apply_to(line).to_string());
        }
    }
}

/// Human-readable byte count.
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else {
        format!("{}.{} KiB", bytes / 1024, bytes % 1024 * 10 / 1024)
    }
}

/// Error message followed by each cause not already spelled out above it.
fn failure_lines(err: &dyn Error) -> Vec<String> {
    let mut shown = err.to_string();
    let mut lines = vec![format!("Error: {shown}")];
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !shown.contains(&text) {
            lines.push(format!("  caused by: {text}"));
            shown = text;
        }
        source = cause.source();
    }
    lines
}

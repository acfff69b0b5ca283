//! Output formatting and styling module.
//!
//! Every line the organizer and the CLI print goes through [`OutputFormatter`],
//! so styling stays consistent across passes.

use crate::organizer::Summary;
use colored::*;
use std::path::Path;

/// Prints styled status lines to the terminal.
///
/// - Success messages (green with ✓)
/// - Error messages (red with ✗, on stderr)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::output::OutputFormatter;
    /// OutputFormatter::success("Moved: report.pdf");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints the end-of-pass line for `source_dir`.
    ///
    /// ```no_run
    /// use dirsort::organizer::Summary;
    /// use dirsort::output::OutputFormatter;
    /// use std::path::Path;
    ///
    /// OutputFormatter::pass_summary(Path::new("/home/me/Downloads"), &Summary::default());
    /// ```
    pub fn pass_summary(source_dir: &Path, summary: &Summary) {
        let mut line = format!(
            "Summary -> {}: {} moved, {} skipped",
            source_dir.display(),
            summary.moved.to_string().green(),
            summary.skipped
        );
        if summary.already_sorted > 0 {
            line.push_str(&format!(", {} already sorted", summary.already_sorted));
        }
        if !summary.failed.is_empty() {
            line.push_str(&format!(
                ", {} failed",
                summary.failed.len().to_string().red()
            ));
        }
        println!("\n{}\n", line.bold());
    }

    /// Prints totals across several passes, listing every failed file.
    pub fn run_totals(total: &Summary, passes: usize) {
        Self::header("TOTAL");
        println!(
            "{} {}, {} moved, {} already sorted, {} skipped, {} failed",
            passes,
            if passes == 1 { "pass" } else { "passes" },
            total.moved.to_string().green(),
            total.already_sorted,
            total.skipped,
            total.failed.len()
        );

        for (path, reason) in &total.failed {
            eprintln!("  - {}: {}", path.display(), reason);
        }
    }
}

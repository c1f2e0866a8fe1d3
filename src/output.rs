//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: the per-move log
//! lines, colored notices, the progress bar and the summary report. Line
//! builders return plain text so callers (and tests) can inspect them; the
//! printing helpers add styling.

use crate::file_category::Category;
use crate::file_organizer::{CategoryCounts, PlannedMove};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Rule printed above and below the summary title.
pub const SUMMARY_RULE: &str = "-.-_.-._-.-_.-._.-._.-.-";

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
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

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// `MOVE <source> -> <Category>/<destination>`
    ///
    /// # Example
    ///
    /// ```
    /// use dirsort::file_category::Category;
    /// use dirsort::file_organizer::PlannedMove;
    /// use dirsort::output::OutputFormatter;
    /// use std::path::PathBuf;
    ///
    /// let planned = PlannedMove {
    ///     source: PathBuf::from("/dl/a.png"),
    ///     destination: PathBuf::from("/dl/Images/a (1).png"),
    ///     category: Category::Images,
    /// };
    /// assert_eq!(OutputFormatter::move_line(&planned), "MOVE a.png -> Images/a (1).png");
    /// ```
    pub fn move_line(planned: &PlannedMove) -> String {
        format!(
            "MOVE {} -> {}/{}",
            planned.source_name(),
            planned.category,
            planned.destination_name()
        )
    }

    /// `SKIP <source> -> <Category>/<destination> [error: <details>]`
    pub fn skip_line(planned: &PlannedMove, details: &str) -> String {
        format!(
            "SKIP {} -> {}/{} [error: {}]",
            planned.source_name(),
            planned.category,
            planned.destination_name(),
            details
        )
    }

    /// A move line marked as simulated.
    pub fn dry_run_line(planned: &PlannedMove) -> String {
        format!("[DRY RUN] {}", Self::move_line(planned))
    }

    /// Creates a progress bar for file moves.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Renders the summary report as plain text.
    ///
    /// A banner, one `Category: count` line per category in fixed order
    /// (zeros included), then `Total: <sum>`.
    ///
    /// # Example
    ///
    /// ```
    /// use dirsort::file_category::Category;
    /// use dirsort::file_organizer::CategoryCounts;
    /// use dirsort::output::OutputFormatter;
    ///
    /// let mut counts = CategoryCounts::new();
    /// counts.increment(Category::Others);
    /// let text = OutputFormatter::render_summary(&counts);
    /// assert!(text.contains("Others: 1"));
    /// assert!(text.contains("Total: 1"));
    /// ```
    pub fn render_summary(counts: &CategoryCounts) -> String {
        let mut out = format!("{SUMMARY_RULE}\n\tSummary\n{SUMMARY_RULE}\n");
        for line in Self::summary_rows(counts) {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }

    /// Prints the summary report with a styled banner.
    pub fn print_summary(counts: &CategoryCounts) {
        println!("\n{}", SUMMARY_RULE.dimmed());
        println!("\t{}", "Summary".bold());
        println!("{}", SUMMARY_RULE.dimmed());
        for line in Self::summary_rows(counts) {
            println!("{}", line);
        }
    }

    fn summary_rows(counts: &CategoryCounts) -> Vec<String> {
        let mut rows: Vec<String> = counts
            .iter()
            .map(|(category, count)| Self::summary_row(category, count))
            .collect();
        rows.push(format!("Total: {}", counts.total()));
        rows
    }

    fn summary_row(category: Category, count: usize) -> String {
        format!("{}: {}", category, count)
    }
}

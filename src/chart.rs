//! Terminal chart of files per category.
//!
//! Only consumes the final counts. Each non-zero category gets one row with a
//! bar proportional to its share of the total.

use crate::file_category::Category;
use crate::file_organizer::CategoryCounts;
use crate::output::OutputFormatter;
use colored::*;

/// Printed instead of a chart when every count is zero.
pub const NO_FILES_MESSAGE: &str = "No files to plot";

const CHART_TITLE: &str = "Files per category";
const BAR_WIDTH: usize = 40;

/// Renders the chart as plain text, or `None` when there is nothing to plot.
///
/// # Example
///
/// ```
/// use dirsort::chart::render_chart;
/// use dirsort::file_category::Category;
/// use dirsort::file_organizer::CategoryCounts;
///
/// assert!(render_chart(&CategoryCounts::new()).is_none());
///
/// let mut counts = CategoryCounts::new();
/// counts.increment(Category::Code);
/// assert!(render_chart(&counts).unwrap().contains("Code"));
/// ```
pub fn render_chart(counts: &CategoryCounts) -> Option<String> {
    let rows = chart_rows(counts)?;
    let mut out = format!("{CHART_TITLE}\n");
    for row in rows {
        out.push_str(&format!(
            "{:<width$} {:<bar$} {} ({}%)\n",
            row.category.dir_name(),
            "█".repeat(row.cells),
            row.count,
            row.percent,
            width = label_width(),
            bar = BAR_WIDTH,
        ));
    }
    Some(out)
}

/// The uncolored chart, or [`NO_FILES_MESSAGE`] when all counts are zero.
pub fn chart_text(counts: &CategoryCounts) -> String {
    render_chart(counts).unwrap_or_else(|| NO_FILES_MESSAGE.to_string())
}

/// Prints the chart, or [`NO_FILES_MESSAGE`] when all counts are zero.
pub fn show_chart(counts: &CategoryCounts) {
    let Some(rows) = chart_rows(counts) else {
        OutputFormatter::plain(&chart_text(counts));
        return;
    };

    OutputFormatter::header(CHART_TITLE);
    for row in rows {
        let bar = "█".repeat(row.cells);
        let padding = " ".repeat(BAR_WIDTH - row.cells);
        println!(
            "{:<width$} {}{} {} ({}%)",
            row.category.dir_name(),
            bar.color(slice_color(row.category)),
            padding,
            row.count,
            row.percent,
            width = label_width(),
        );
    }
}

struct ChartRow {
    category: Category,
    count: usize,
    cells: usize,
    percent: usize,
}

fn chart_rows(counts: &CategoryCounts) -> Option<Vec<ChartRow>> {
    let total = counts.total();
    if total == 0 {
        return None;
    }

    let rows = counts
        .non_zero()
        .map(|(category, count)| ChartRow {
            category,
            count,
            // every present category gets at least one cell
            cells: ((count * BAR_WIDTH + total / 2) / total).clamp(1, BAR_WIDTH),
            percent: (count * 100 + total / 2) / total,
        })
        .collect();
    Some(rows)
}

fn label_width() -> usize {
    Category::ALL
        .iter()
        .map(|c| c.dir_name().len())
        .max()
        .unwrap_or(0)
}

fn slice_color(category: Category) -> Color {
    match category {
        Category::Images => Color::Magenta,
        Category::Documents => Color::Blue,
        Category::Videos => Color::Red,
        Category::Audio => Color::Green,
        Category::Archives => Color::Yellow,
        Category::Code => Color::Cyan,
        Category::EBooks => Color::BrightMagenta,
        Category::Others => Color::White,
    }
}

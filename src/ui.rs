//! Terminal UI utilities.
//!
//! - `Table` - auto-sizing table with box-drawing borders
//! - `boxed` - a framed block of lines, used for the target list
//!
//! ## Example
//!
//! ```rust
//! use crossbake::ui::Table;
//!
//! let mut table = Table::new(&["Target", "Output"]);
//! table.add_row(vec!["linux-x64".to_string(), "dist/linux-x64".to_string()]);
//! table.print();
//! ```

use colored::*;
use console::{measure_text_width, truncate_str};

/// Narrowest a column gets when the table is squeezed to fit the terminal.
const MIN_COLUMN_WIDTH: usize = 8;

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn print(&self) {
        let (_rows, cols) = console::Term::stdout().size();
        for line in self.render(cols as usize) {
            println!("{}", line);
        }
    }

    /// Lines of the table, fitted into `max_width` columns where possible.
    pub fn render(&self, max_width: usize) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }

        let widths = self.column_widths(max_width);
        let sep = |left: &str, mid: &str, right: &str| {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}", left, inner.join(mid), right)
        };
        let row_line = |cells: &[String], bold: bool| {
            let mut line = String::from("  │");
            for (cell, &width) in cells.iter().zip(&widths) {
                let cell = flatten(cell);
                let shown = truncate_str(&cell, width, "...");
                let padding = width.saturating_sub(measure_text_width(&shown));
                if bold {
                    line.push_str(&format!(" {}{} │", shown.as_ref().bold(), " ".repeat(padding)));
                } else {
                    line.push_str(&format!(" {}{} │", shown, " ".repeat(padding)));
                }
            }
            line
        };

        let mut lines = vec![sep("┌", "┬", "┐"), row_line(&self.headers[..], true)];
        lines.push(sep("├", "┼", "┤"));
        for row in &self.rows {
            lines.push(row_line(&row[..], false));
        }
        lines.push(sep("└", "┴", "┘"));
        lines
    }

    fn column_widths(&self, max_width: usize) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .headers
            .iter()
            .map(|h| measure_text_width(h))
            .collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(&flatten(cell)));
            }
        }

        // indent + borders + one space of padding each side
        let overhead = 3 + 3 * widths.len();
        let available = max_width.saturating_sub(overhead);
        let mut total: usize = widths.iter().sum();

        // shave the widest column until the table fits
        while total > available {
            let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widest <= MIN_COLUMN_WIDTH {
                break;
            }
            widths[idx] -= 1;
            total -= 1;
        }
        widths
    }
}

/// A framed block, one entry per line.
pub fn boxed(lines: &[String]) -> Vec<String> {
    let width = lines.iter().map(|l| measure_text_width(l)).max().unwrap_or(0);
    let mut out = vec![format!("  ╭{}╮", "─".repeat(width + 2))];
    for line in lines {
        let padding = width - measure_text_width(line);
        out.push(format!("  │ {}{} │", line, " ".repeat(padding)));
    }
    out.push(format!("  ╰{}╯", "─".repeat(width + 2)));
    out
}

pub fn print_boxed(lines: &[String]) {
    for line in boxed(lines) {
        println!("{}", line);
    }
}

fn flatten(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shape() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Target", "Output"]);
        table.add_row(vec!["linux-x64".to_string(), "dist/linux-x64".to_string()]);
        table.add_row(vec!["ignored".to_string()]);

        let lines = table.render(200);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("  ┌"));
        assert!(lines[1].contains("Target"));
        assert!(lines[3].contains("linux-x64"));
        assert!(lines[3].contains("dist/linux-x64"));
        let widths: Vec<usize> = lines.iter().map(|l| measure_text_width(l)).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_render_squeezes_to_width() {
        colored::control::set_override(false);
        let mut table = Table::new(&["Target", "Output"]);
        table.add_row(vec![
            "linux-x64".to_string(),
            "a/very/long/output/directory/path/for/linux-x64".to_string(),
        ]);
        let lines = table.render(40);
        assert!(lines.iter().all(|l| measure_text_width(l) <= 40));
        assert!(lines[3].contains("..."));
    }

    #[test]
    fn test_flatten_newlines() {
        assert_eq!(flatten("a\nb\tc"), "a b c");
    }

    #[test]
    fn test_boxed() {
        let lines = boxed(&["linux-x64".to_string(), "darwin-arm64".to_string()]);
        assert_eq!(lines.len(), 4);
        assert_eq!(measure_text_width(&lines[1]), measure_text_width(&lines[2]));
        assert!(lines[2].contains("darwin-arm64"));
    }
}

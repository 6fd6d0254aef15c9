//! Table capture for pretty table mode.
//!
//! While a `table` element is being rendered the engine fills a
//! [`TableContext`] instead of writing cell text to the output. Once the table
//! is complete the captured matrix goes through the ASCII formatter and,
//! for Org output, is rewritten into a pipe table.

use crate::options::PrettyTablesOptions;
use crate::table_writer::{self, TableCells};

/// Cells captured from a single `table` element.
#[derive(Debug, Default)]
pub(crate) struct TableContext {
    pub header: Vec<String>,
    pub body: Vec<Vec<String>>,
    pub footer: Vec<String>,
    /// Index of the body row that data cells append to.
    pub current_row: usize,
    pub in_footer: bool,
}

impl TableContext {
    /// Start a new body row.
    pub(crate) fn open_row(&mut self) {
        self.body.push(Vec::new());
    }

    /// Move the row cursor past the row that just finished.
    pub(crate) fn close_row(&mut self) {
        self.current_row += 1;
    }

    pub(crate) fn push_header_cell(&mut self, cell: String) {
        self.header.push(cell);
    }

    /// Append a data cell to the footer or to the current body row.
    pub(crate) fn push_data_cell(&mut self, cell: String) {
        if self.in_footer {
            self.footer.push(cell);
            return;
        }
        while self.body.len() <= self.current_row {
            self.body.push(Vec::new());
        }
        self.body[self.current_row].push(cell);
    }

    /// Format the captured cells.
    pub(crate) fn render(&self, style: &PrettyTablesOptions) -> String {
        let rendered = table_writer::render(
            TableCells {
                header: &self.header,
                body: &self.body,
                footer: &self.footer,
            },
            style,
        );
        if style.org_format {
            to_org_table(&rendered, style)
        } else {
            rendered
        }
    }
}

/// Rewrite an ASCII table into Org pipe-table markup.
///
/// The outer border lines are dropped and the remaining rule lines have their
/// corner characters replaced by the column separator, turning
/// `+----+----+` into `|----+----|`.
pub(crate) fn to_org_table(rendered: &str, style: &PrettyTablesOptions) -> String {
    let center = style.center_separator;
    let mut lines: Vec<&str> = rendered.trim_end_matches('\n').split('\n').collect();

    if lines.len() > 1 && lines.last().is_some_and(|line| line.contains(center)) {
        lines.pop();
    }
    if lines.len() > 1 && lines.first().is_some_and(|line| line.contains(center)) {
        lines.remove(0);
    }

    lines
        .into_iter()
        .map(|line| replace_corners(line, center, style.column_separator))
        .collect::<Vec<_>>()
        .join("\n")
}

fn replace_corners(line: &str, center: char, column: char) -> String {
    if !line.starts_with(center) {
        return line.to_string();
    }
    let mut chars: Vec<char> = line.chars().collect();
    if let Some(first) = chars.first_mut() {
        *first = column;
    }
    if chars.len() > 1 && chars.last() == Some(&center) {
        if let Some(last) = chars.last_mut() {
            *last = column;
        }
    }
    chars.into_iter().collect()
}

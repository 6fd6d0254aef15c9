//! ASCII table formatter used by pretty table mode.
//!
//! Given header, body and footer cell matrices it produces a bordered,
//! column-aligned text table:
//!
//! ```text
//! +-------------+-------------+
//! |  HEADER 1   |  HEADER 2   |
//! +-------------+-------------+
//! | Row 1 Col 1 | Row 1 Col 2 |
//! +-------------+-------------+
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_width::UnicodeWidthStr;

use crate::options::{Alignment, PrettyTablesOptions};
use crate::text;

static NUMERIC_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(?:\d{1,3}(?:,\d{3})*|\d+)(?:\.\d+)?$").expect("valid regex"));

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Body,
    Footer,
}

/// Captured table content.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableCells<'a> {
    pub header: &'a [String],
    pub body: &'a [Vec<String>],
    pub footer: &'a [String],
}

/// Render `cells` as an ASCII table. Returns an empty string for a table
/// without any columns. Body rows with no cells are skipped.
pub(crate) fn render(cells: TableCells<'_>, style: &PrettyTablesOptions) -> String {
    let body: Vec<&Vec<String>> = cells.body.iter().filter(|row| !row.is_empty()).collect();
    let columns = body
        .iter()
        .map(|row| row.len())
        .chain([cells.header.len(), cells.footer.len()])
        .max()
        .unwrap_or(0);
    if columns == 0 {
        return String::new();
    }

    let header = (!cells.header.is_empty()).then(|| prepare_row(cells.header, columns, style, Section::Header));
    let footer = (!cells.footer.is_empty()).then(|| prepare_row(cells.footer, columns, style, Section::Footer));
    let rows: Vec<Vec<Vec<String>>> = body
        .iter()
        .map(|row| prepare_row(row, columns, style, Section::Body))
        .collect();

    let mut widths = vec![0usize; columns];
    for row in header.iter().chain(rows.iter()).chain(footer.iter()) {
        for (col, lines) in row.iter().enumerate() {
            for line in lines {
                widths[col] = widths[col].max(UnicodeWidthStr::width(line.as_str()));
            }
        }
    }

    let rule = rule_line(&widths, style);
    let mut out: Vec<String> = Vec::new();

    if let Some(header) = &header {
        if style.borders.top {
            out.push(rule.clone());
        }
        push_row(&mut out, header, &widths, style, Section::Header);
        if style.header_line {
            out.push(rule.clone());
        }
    } else if style.borders.top {
        out.push(rule.clone());
    }

    for (idx, row) in rows.iter().enumerate() {
        if idx > 0 && style.row_line {
            out.push(rule.clone());
        }
        push_row(&mut out, row, &widths, style, Section::Body);
    }

    if let Some(footer) = &footer {
        out.push(rule.clone());
        push_row(&mut out, footer, &widths, style, Section::Footer);
    }
    if style.borders.bottom {
        out.push(rule);
    }

    log::trace!("rendered {} column table with {} body rows", columns, rows.len());

    let mut rendered = out.join("\n");
    rendered.push('\n');
    rendered
}

/// Split each cell into display lines, padding the row to `columns` cells.
fn prepare_row(row: &[String], columns: usize, style: &PrettyTablesOptions, section: Section) -> Vec<Vec<String>> {
    (0..columns)
        .map(|col| {
            let raw = row.get(col).map(String::as_str).unwrap_or("");
            let cell = if section != Section::Body && style.auto_format_header {
                format_header(raw)
            } else {
                raw.to_string()
            };
            cell_lines(&cell, style)
        })
        .collect()
}

fn format_header(cell: &str) -> String {
    cell.trim().replace('_', " ").to_uppercase()
}

fn cell_lines(cell: &str, style: &PrettyTablesOptions) -> Vec<String> {
    let mut lines = Vec::new();
    for line in cell.split('\n') {
        if style.auto_wrap_text && style.col_width > 0 && UnicodeWidthStr::width(line) > style.col_width {
            lines.extend(
                text::wrap_to_width(line, 0, style.col_width)
                    .into_iter()
                    .map(|piece| piece.trim_end_matches('\n').to_string()),
            );
        } else {
            lines.push(line.to_string());
        }
    }
    lines
}

fn rule_line(widths: &[usize], style: &PrettyTablesOptions) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|width| style.row_separator.to_string().repeat(width + 2))
        .collect();
    let center = style.center_separator.to_string();
    let mut line = String::new();
    if style.borders.left {
        line.push(style.center_separator);
    }
    line.push_str(&segments.join(&center));
    if style.borders.right {
        line.push(style.center_separator);
    }
    line
}

fn push_row(out: &mut Vec<String>, row: &[Vec<String>], widths: &[usize], style: &PrettyTablesOptions, section: Section) {
    let height = row.iter().map(Vec::len).max().unwrap_or(1).max(1);
    let separator = style.column_separator.to_string();

    for line_idx in 0..height {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(col, (lines, &width))| {
                let content = lines.get(line_idx).map(String::as_str).unwrap_or("");
                let alignment = resolve_alignment(section, style, col, content);
                format!(" {} ", pad(content, width, alignment))
            })
            .collect();

        let mut line = String::new();
        if style.borders.left {
            line.push(style.column_separator);
        }
        line.push_str(&cells.join(&separator));
        if style.borders.right {
            line.push(style.column_separator);
        }
        out.push(line);
    }
}

fn resolve_alignment(section: Section, style: &PrettyTablesOptions, col: usize, content: &str) -> Alignment {
    let configured = match section {
        Section::Header => style.header_alignment,
        Section::Footer => style.footer_alignment,
        Section::Body => match style.column_alignment.get(col) {
            Some(&alignment) if alignment != Alignment::Default => alignment,
            _ => style.alignment,
        },
    };
    match (configured, section) {
        (Alignment::Default, Section::Header | Section::Footer) => Alignment::Center,
        (Alignment::Default, Section::Body) if NUMERIC_CELL.is_match(content.trim()) => Alignment::Right,
        (Alignment::Default, Section::Body) => Alignment::Left,
        (other, _) => other,
    }
}

fn pad(content: &str, width: usize, alignment: Alignment) -> String {
    let gap = width.saturating_sub(UnicodeWidthStr::width(content));
    let (left, right) = match alignment {
        Alignment::Right => (gap, 0),
        Alignment::Center => (gap / 2, gap - gap / 2),
        Alignment::Left | Alignment::Default => (0, gap),
    };
    format!("{}{}{}", " ".repeat(left), content, " ".repeat(right))
}

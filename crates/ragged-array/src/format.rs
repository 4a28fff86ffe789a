//! Text rendering of ragged arrays.
use std::fmt;

use crate::array::RaggedArray;
use crate::config::RenderStyle;

/// Rows shown at each end once the array is too long to print in full.
const EDGE_ROWS: usize = 3;

fn format_values<T: fmt::Debug>(values: &[T]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{:?}", v)).collect();
    format!("[{}]", parts.join(", "))
}

fn format_row<T: fmt::Debug>(row: &[T], width: Option<usize>) -> String {
    match width {
        None => format_values(row),
        Some(width) => {
            let parts: Vec<String> = row.chunks(width).map(format_values).collect();
            format!("[{}]", parts.join(", "))
        }
    }
}

impl<T: fmt::Debug> RaggedArray<T> {
    pub fn render(&self, style: RenderStyle) -> String {
        let (header, footer, indent) = match style {
            RenderStyle::Debug => ("RaggedArray([\n", "])", "      "),
            RenderStyle::Plain => ("[", "]", " "),
        };
        let width = self.width();
        let line = |row: &[T]| format_row(row, width);

        let lines: Vec<String> = if self.len() > 2 * EDGE_ROWS {
            let rows: Vec<&[T]> = self.rows().collect();
            let mut lines: Vec<String> = rows[..EDGE_ROWS].iter().map(|&r| line(r)).collect();
            lines.push("...".to_string());
            lines.extend(rows[rows.len() - EDGE_ROWS..].iter().map(|&r| line(r)));
            lines
        } else {
            self.rows().map(line).collect()
        };

        let body: Vec<String> = lines.iter().map(|l| format!("{}{}", indent, l)).collect();
        format!("{}{}{}", header, body.join(",\n"), footer)
    }
}

impl<T: fmt::Debug> fmt::Debug for RaggedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(RenderStyle::Debug))
    }
}

impl<T: fmt::Debug> fmt::Display for RaggedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(RenderStyle::Plain))
    }
}

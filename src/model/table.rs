//! Table model structures.

use super::Paragraph;
use serde::{Deserialize, Serialize};

/// Horizontal alignment for table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl CellAlignment {
    /// Value for the HTML `align` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellAlignment::Left => "left",
            CellAlignment::Center => "center",
            CellAlignment::Right => "right",
        }
    }
}

/// Vertical merge state from `w:vMerge`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalMerge {
    /// Not part of a vertical merge
    #[default]
    None,
    /// First cell of a merged column run
    Restart,
    /// Covered by the cell above
    Continue,
}

/// A cell in a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Cell content (paragraphs)
    #[serde(default)]
    pub content: Vec<Paragraph>,

    /// Tables nested inside this cell
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested_tables: Vec<Table>,

    /// Horizontal span (colspan)
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub col_span: u32,

    /// Vertical span (rowspan); 0 for cells covered by a merge above
    #[serde(default = "default_span", skip_serializing_if = "is_default_span")]
    pub row_span: u32,

    /// Vertical merge marker as read from the document
    #[serde(default, skip_serializing_if = "is_default_merge")]
    pub v_merge: VerticalMerge,

    /// Horizontal alignment
    #[serde(default, skip_serializing_if = "is_default_cell_alignment")]
    pub alignment: CellAlignment,

    /// Whether this is a header cell
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
}

fn default_span() -> u32 {
    1
}

fn is_default_span(n: &u32) -> bool {
    *n == 1
}

fn is_default_merge(m: &VerticalMerge) -> bool {
    *m == VerticalMerge::None
}

fn is_default_cell_alignment(a: &CellAlignment) -> bool {
    *a == CellAlignment::Left
}

impl Cell {
    /// Create a new empty cell.
    pub fn new() -> Self {
        Self {
            col_span: 1,
            row_span: 1,
            ..Default::default()
        }
    }

    /// Create a cell with text content.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![Paragraph::with_text(text)],
            ..Self::new()
        }
    }

    /// Get the plain text content.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if this cell is covered by a vertical merge and renders nothing.
    pub fn is_covered(&self) -> bool {
        self.row_span == 0
    }
}

/// A row in a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Row {
    /// Cells in this row
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Whether this row repeats as a header
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_header: bool,
}

impl Row {
    /// Create a new row from cells.
    pub fn new(cells: Vec<Cell>) -> Self {
        Self {
            cells,
            is_header: false,
        }
    }
}

/// A table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table rows
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of grid columns in the widest row.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(|c| c.col_span.max(1) as usize).sum())
            .max()
            .unwrap_or(0)
    }

    /// Turn `vMerge` markers into row spans.
    ///
    /// Cells are matched by grid column, so a restart cell in column 2
    /// absorbs the continuation cells sitting at column 2 in later rows.
    /// Continuations get `row_span = 0`.
    pub fn resolve_vertical_merges(&mut self) {
        // (row, cell index) of the open restart cell per grid column
        let mut open: Vec<Option<(usize, usize)>> = Vec::new();

        for row_idx in 0..self.rows.len() {
            let mut col = 0usize;
            for cell_idx in 0..self.rows[row_idx].cells.len() {
                let (span, merge) = {
                    let cell = &self.rows[row_idx].cells[cell_idx];
                    (cell.col_span.max(1) as usize, cell.v_merge)
                };
                if open.len() < col + span {
                    open.resize(col + span, None);
                }

                match merge {
                    VerticalMerge::Restart => {
                        self.rows[row_idx].cells[cell_idx].row_span = 1;
                        open[col] = Some((row_idx, cell_idx));
                    }
                    VerticalMerge::Continue => match open[col] {
                        Some((r, c)) => {
                            self.rows[r].cells[c].row_span += 1;
                            self.rows[row_idx].cells[cell_idx].row_span = 0;
                        }
                        // A continuation with nothing above it starts a run.
                        None => {
                            self.rows[row_idx].cells[cell_idx].row_span = 1;
                            open[col] = Some((row_idx, cell_idx));
                        }
                    },
                    VerticalMerge::None => open[col] = None,
                }
                for slot in open.iter_mut().skip(col + 1).take(span - 1) {
                    *slot = None;
                }
                col += span;
            }
        }
    }

    /// Get the plain text content, one row per line.
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .filter(|c| !c.is_covered())
                    .map(|c| c.plain_text())
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_cell(text: &str, v_merge: VerticalMerge) -> Cell {
        Cell {
            v_merge,
            ..Cell::with_text(text)
        }
    }

    #[test]
    fn test_column_count() {
        let mut table = Table::new();
        table.add_row(Row::new(vec![Cell::with_text("A"), Cell::with_text("B")]));
        table.add_row(Row::new(vec![Cell {
            col_span: 3,
            ..Cell::with_text("wide")
        }]));
        assert_eq!(table.column_count(), 3);
    }

    #[test]
    fn test_resolve_vertical_merges() {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            merge_cell("Merged", VerticalMerge::Restart),
            Cell::with_text("B1"),
        ]));
        table.add_row(Row::new(vec![
            merge_cell("", VerticalMerge::Continue),
            Cell::with_text("B2"),
        ]));
        table.add_row(Row::new(vec![
            merge_cell("", VerticalMerge::Continue),
            Cell::with_text("B3"),
        ]));
        table.add_row(Row::new(vec![Cell::with_text("A4"), Cell::with_text("B4")]));

        table.resolve_vertical_merges();

        assert_eq!(table.rows[0].cells[0].row_span, 3);
        assert!(table.rows[1].cells[0].is_covered());
        assert!(table.rows[2].cells[0].is_covered());
        assert_eq!(table.rows[3].cells[0].row_span, 1);
        assert_eq!(table.rows[1].cells[1].row_span, 1);
    }

    #[test]
    fn test_merge_follows_grid_column() {
        let mut table = Table::new();
        table.add_row(Row::new(vec![
            Cell {
                col_span: 2,
                ..Cell::with_text("Header")
            },
            merge_cell("Side", VerticalMerge::Restart),
        ]));
        table.add_row(Row::new(vec![
            Cell::with_text("A"),
            Cell::with_text("B"),
            merge_cell("", VerticalMerge::Continue),
        ]));

        table.resolve_vertical_merges();

        assert_eq!(table.rows[0].cells[1].row_span, 2);
        assert!(table.rows[1].cells[2].is_covered());
    }

    #[test]
    fn test_plain_text_skips_covered_cells() {
        let mut table = Table::new();
        table.add_row(Row::new(vec![merge_cell("X", VerticalMerge::Restart)]));
        table.add_row(Row::new(vec![merge_cell("", VerticalMerge::Continue)]));
        table.resolve_vertical_merges();
        assert_eq!(table.plain_text(), "X\n");
    }
}

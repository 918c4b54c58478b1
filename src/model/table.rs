//! Table types.

use super::{Block, Paragraph};
use serde::{Deserialize, Serialize};

/// A table: rows in document order, with any markup between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows and interleaved markup, in document order
    pub content: Vec<TableContent>,

    /// Original table properties and grid markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

/// An entry of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TableContent {
    /// A row
    Row(TableRow),

    /// Markup between rows (bookmarks, row-level content controls), kept
    /// verbatim and not searched
    Raw {
        /// XML fragment
        xml: String,
    },
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from rows of plain strings.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            content: rows
                .into_iter()
                .map(|row| TableContent::Row(TableRow::from_strings(row)))
                .collect(),
            properties: None,
        }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.content.push(TableContent::Row(row));
    }

    /// Iterate over the rows.
    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.content.iter().filter_map(|c| match c {
            TableContent::Row(row) => Some(row),
            TableContent::Raw { .. } => None,
        })
    }

    /// Iterate mutably over the rows.
    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut TableRow> {
        self.content.iter_mut().filter_map(|c| match c {
            TableContent::Row(row) => Some(row),
            TableContent::Raw { .. } => None,
        })
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows().count()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows().next().map(|r| r.cell_count()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows().next().is_none()
    }

    /// Get a cell by row and column.
    pub fn cell(&self, row: usize, column: usize) -> Option<&TableCell> {
        self.rows().nth(row).and_then(|r| r.cells().nth(column))
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        self.rows()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells and interleaved markup, in document order
    pub content: Vec<RowContent>,

    /// Original row properties markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,

    /// Attributes of the original `w:tr` element
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
}

/// An entry of a table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowContent {
    /// A cell
    Cell(TableCell),

    /// Markup between cells (cell-level content controls, bookmarks), kept
    /// verbatim and not searched
    Raw {
        /// XML fragment
        xml: String,
    },
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            content: cells.into_iter().map(RowContent::Cell).collect(),
            ..Default::default()
        }
    }

    /// Create a row from text values.
    pub fn from_strings<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(TableCell::text).collect())
    }

    /// Iterate over the cells.
    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.content.iter().filter_map(|c| match c {
            RowContent::Cell(cell) => Some(cell),
            RowContent::Raw { .. } => None,
        })
    }

    /// Iterate mutably over the cells.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TableCell> {
        self.content.iter_mut().filter_map(|c| match c {
            RowContent::Cell(cell) => Some(cell),
            RowContent::Raw { .. } => None,
        })
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells().count()
    }

    /// Get plain text representation.
    pub fn plain_text(&self) -> String {
        self.cells()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
///
/// Cells hold paragraphs. Anything else found in a cell (nested tables,
/// content controls) is kept as [`Block::Raw`] and is not searched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content
    pub content: Vec<Block>,

    /// Original cell properties markup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_paragraphs(vec![Paragraph::with_text(text)])
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a cell with multiple paragraphs.
    pub fn with_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            content: paragraphs.into_iter().map(Block::Paragraph).collect(),
            properties: None,
        }
    }

    /// Iterate over the cell's paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.content.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate mutably over the cell's paragraphs.
    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.content.iter_mut().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Get plain text content.
    pub fn plain_text(&self) -> String {
        self.paragraphs()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Check if the cell is empty.
    pub fn is_empty(&self) -> bool {
        self.paragraphs().all(|p| p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_new() {
        let table = Table::new();
        assert!(table.is_empty());
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_table_from_rows() {
        let table = Table::from_rows([["Name", "[NAME]"], ["Date", "{DATE}"]]);

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(1, 1).unwrap().plain_text(), "{DATE}");
        assert_eq!(table.plain_text(), "Name\t[NAME]\nDate\t{DATE}");
    }

    #[test]
    fn test_raw_entries_are_not_rows_or_cells() {
        let mut row = TableRow::from_strings(["A", "C"]);
        row.content.insert(
            1,
            RowContent::Raw {
                xml: "<w:sdt/>".to_string(),
            },
        );
        let mut table = Table::new();
        table.content.push(TableContent::Raw {
            xml: "<w:bookmarkStart w:id=\"0\" w:name=\"rows\"/>".to_string(),
        });
        table.add_row(row);

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(0, 1).unwrap().plain_text(), "C");
        assert_eq!(table.plain_text(), "A\tC");
    }

    #[test]
    fn test_cell_skips_raw_blocks() {
        let mut cell = TableCell::text("first");
        cell.content.push(Block::Raw {
            xml: "<w:tbl/>".to_string(),
        });
        cell.content.push(Block::Paragraph(Paragraph::with_text("second")));

        assert_eq!(cell.paragraphs().count(), 2);
        assert_eq!(cell.plain_text(), "first\nsecond");
        assert!(!cell.is_empty());
        assert!(TableCell::empty().is_empty());
    }
}

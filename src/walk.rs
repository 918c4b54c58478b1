//! Traversal of every text-bearing region of a document.
//!
//! Scanning and substitution both go through this module, so they always
//! see the same paragraphs in the same order:
//!
//! 1. body paragraphs, in document order;
//! 2. paragraphs inside each body table, row by row, cell by cell, then in
//!    paragraph order within the cell;
//! 3. for each section in document order: its header, then its footer, each
//!    walked with the same paragraphs-then-tables rule as the body.
//!
//! Markup kept raw (nested tables inside cells, content controls around
//! blocks, rows or cells) is not entered. Row and column indices count
//! rows and cells only.

use crate::model::{Block, Document, Paragraph, Section, Table};
use serde::Serialize;

/// The top-level container a paragraph belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "area", content = "section", rename_all = "snake_case")]
pub enum Area {
    /// Document body
    Body,
    /// Header of the section with this index
    Header(usize),
    /// Footer of the section with this index
    Footer(usize),
}

/// Position of a table cell within its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellRef {
    /// Index of the table among the container's tables
    pub table: usize,
    /// Row index
    pub row: usize,
    /// Column index
    pub column: usize,
}

/// Where a walked paragraph lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    /// Container
    pub area: Area,
    /// Cell, when the paragraph is inside a table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellRef>,
}

impl Region {
    fn direct(area: Area) -> Self {
        Self { area, cell: None }
    }

    fn cell(area: Area, table: usize, row: usize, column: usize) -> Self {
        Self {
            area,
            cell: Some(CellRef { table, row, column }),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.area {
            Area::Body => write!(f, "body")?,
            Area::Header(s) => write!(f, "header of section {}", s + 1)?,
            Area::Footer(s) => write!(f, "footer of section {}", s + 1)?,
        }
        if let Some(cell) = self.cell {
            write!(
                f,
                ", table {} row {} column {}",
                cell.table + 1,
                cell.row + 1,
                cell.column + 1
            )?;
        }
        Ok(())
    }
}

/// Walk every paragraph of the document.
pub fn paragraphs(doc: &Document) -> impl Iterator<Item = (Region, &Paragraph)> + '_ {
    let sections = doc.sections.iter().enumerate().flat_map(|(i, section)| {
        let header = section
            .header
            .iter()
            .flat_map(move |h| container(&h.content, Area::Header(i)));
        let footer = section
            .footer
            .iter()
            .flat_map(move |f| container(&f.content, Area::Footer(i)));
        header.chain(footer)
    });
    container(&doc.body, Area::Body).chain(sections)
}

/// Walk every paragraph of the document with mutable access.
///
/// Yields exactly the sequence [`paragraphs`] yields.
pub fn paragraphs_mut(doc: &mut Document) -> impl Iterator<Item = (Region, &mut Paragraph)> + '_ {
    let sections = doc.sections.iter_mut().enumerate().flat_map(|(i, section)| {
        let Section { header, footer } = section;
        let header = header
            .iter_mut()
            .flat_map(move |h| container_mut(&mut h.content, Area::Header(i)));
        let footer = footer
            .iter_mut()
            .flat_map(move |f| container_mut(&mut f.content, Area::Footer(i)));
        header.chain(footer)
    });
    container_mut(&mut doc.body, Area::Body).chain(sections)
}

/// Number of paragraphs the walker visits.
pub fn region_count(doc: &Document) -> usize {
    paragraphs(doc).count()
}

fn container(blocks: &[Block], area: Area) -> impl Iterator<Item = (Region, &Paragraph)> + '_ {
    let direct = blocks.iter().filter_map(move |b| match b {
        Block::Paragraph(p) => Some((Region::direct(area), p)),
        _ => None,
    });
    let tables = blocks
        .iter()
        .filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
        .enumerate()
        .flat_map(move |(index, table)| table_paragraphs(table, index, area));
    direct.chain(tables)
}

fn table_paragraphs(
    table: &Table,
    index: usize,
    area: Area,
) -> impl Iterator<Item = (Region, &Paragraph)> + '_ {
    table.rows().enumerate().flat_map(move |(r, row)| {
        row.cells().enumerate().flat_map(move |(c, cell)| {
            let region = Region::cell(area, index, r, c);
            cell.paragraphs().map(move |p| (region, p))
        })
    })
}

fn container_mut(
    blocks: &mut [Block],
    area: Area,
) -> impl Iterator<Item = (Region, &mut Paragraph)> + '_ {
    // Paragraphs come before tables, so split the blocks once up front.
    let mut direct = Vec::new();
    let mut tables = Vec::new();
    for block in blocks.iter_mut() {
        match block {
            Block::Paragraph(p) => direct.push(p),
            Block::Table(t) => tables.push(t),
            Block::Raw { .. } => {}
        }
    }

    let direct = direct
        .into_iter()
        .map(move |p| (Region::direct(area), p));
    let tables = tables
        .into_iter()
        .enumerate()
        .flat_map(move |(index, table)| table_paragraphs_mut(table, index, area));
    direct.chain(tables)
}

fn table_paragraphs_mut(
    table: &mut Table,
    index: usize,
    area: Area,
) -> impl Iterator<Item = (Region, &mut Paragraph)> + '_ {
    table.rows_mut().enumerate().flat_map(move |(r, row)| {
        row.cells_mut().enumerate().flat_map(move |(c, cell)| {
            let region = Region::cell(area, index, r, c);
            cell.paragraphs_mut().map(move |p| (region, p))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeaderFooter, RowContent, TableCell, TableContent, TableRow};

    fn sample() -> Document {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("p1"));
        doc.add_table(Table::from_rows([["t1r1c1", "t1r1c2"], ["t1r2c1", "t1r2c2"]]));
        doc.add_paragraph(Paragraph::with_text("p2"));
        doc.add_block(Block::Raw {
            xml: "<w:sdt/>".to_string(),
        });
        doc.add_table(Table::from_rows([["t2"]]));
        doc.add_section(
            Section::new()
                .with_header(HeaderFooter::with_text("h1"))
                .with_footer(HeaderFooter::with_text("f1")),
        );
        doc.add_section(Section::new().with_footer(HeaderFooter::with_text("f2")));
        doc
    }

    #[test]
    fn test_walk_order() {
        let doc = sample();
        let texts: Vec<String> = paragraphs(&doc).map(|(_, p)| p.plain_text()).collect();
        assert_eq!(
            texts,
            vec!["p1", "p2", "t1r1c1", "t1r1c2", "t1r2c1", "t1r2c2", "t2", "h1", "f1", "f2"]
        );
    }

    #[test]
    fn test_walk_regions() {
        let doc = sample();
        let regions: Vec<Region> = paragraphs(&doc).map(|(r, _)| r).collect();

        assert_eq!(regions[0], Region::direct(Area::Body));
        assert_eq!(regions[5], Region::cell(Area::Body, 0, 1, 1));
        assert_eq!(regions[6], Region::cell(Area::Body, 1, 0, 0));
        assert_eq!(regions[7], Region::direct(Area::Header(0)));
        assert_eq!(regions[9], Region::direct(Area::Footer(1)));
        assert_eq!(regions[5].to_string(), "body, table 1 row 2 column 2");
        assert_eq!(regions[9].to_string(), "footer of section 2");
    }

    #[test]
    fn test_mutable_walk_matches_shared_walk() {
        let mut doc = sample();
        doc.sections[0]
            .header
            .as_mut()
            .unwrap()
            .content
            .push(Block::Table(Table::from_rows([["h-cell"]])));

        let shared: Vec<(Region, String)> = paragraphs(&doc)
            .map(|(r, p)| (r, p.plain_text()))
            .collect();
        let exclusive: Vec<(Region, String)> = paragraphs_mut(&mut doc)
            .map(|(r, p)| (r, p.plain_text()))
            .collect();

        assert_eq!(shared, exclusive);
        assert_eq!(region_count(&doc), 11);
    }

    #[test]
    fn test_mutable_walk_edits_in_place() {
        let mut doc = sample();
        for (_, paragraph) in paragraphs_mut(&mut doc) {
            let upper = paragraph.plain_text().to_uppercase();
            paragraph.set_text(upper);
        }

        assert_eq!(doc.sections[1].footer.as_ref().unwrap().content.len(), 1);
        let texts: Vec<String> = paragraphs(&doc).map(|(_, p)| p.plain_text()).collect();
        assert_eq!(texts[0], "P1");
        assert_eq!(texts[9], "F2");
    }

    #[test]
    fn test_nested_raw_blocks_are_not_entered() {
        let mut doc = Document::new();
        let mut cell = TableCell::text("outer");
        cell.content.push(Block::Raw {
            xml: "<w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl>".to_string(),
        });
        let mut table = Table::new();
        table.add_row(TableRow::new(vec![cell]));
        doc.add_table(table);

        assert_eq!(region_count(&doc), 1);
    }

    #[test]
    fn test_raw_row_entries_do_not_shift_columns() {
        let mut row = TableRow::from_strings(["A", "C"]);
        row.content.insert(
            1,
            RowContent::Raw {
                xml: "<w:sdt><w:sdtContent><w:tc><w:p/></w:tc></w:sdtContent></w:sdt>".to_string(),
            },
        );
        let mut table = Table::new();
        table.content.push(TableContent::Raw {
            xml: "<w:bookmarkStart w:id=\"0\" w:name=\"rows\"/>".to_string(),
        });
        table.add_row(row);
        let mut doc = Document::new();
        doc.add_table(table);

        let found: Vec<(Region, String)> = paragraphs(&doc)
            .map(|(r, p)| (r, p.plain_text()))
            .collect();
        assert_eq!(
            found,
            vec![
                (Region::cell(Area::Body, 0, 0, 0), "A".to_string()),
                (Region::cell(Area::Body, 0, 0, 1), "C".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert_eq!(region_count(&doc), 0);
    }
}

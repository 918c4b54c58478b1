//! Document model for word-processing templates.
//!
//! The model keeps what placeholder work needs (paragraphs, runs, tables,
//! headers and footers) as typed values and carries everything else as
//! verbatim markup so that a loaded document can be written back without
//! losing content.

mod document;
mod paragraph;
mod table;

pub use document::{Block, Document, HeaderFooter, Section};
pub(crate) use document::{Package, PackageEntry};
pub use paragraph::{
    Alignment, InlineContent, Paragraph, ParagraphStyle, RunObject, RunPiece, TextRun, TextStyle,
};
pub use table::{RowContent, Table, TableCell, TableContent, TableRow};

//! DOCX reading and writing.
//!
//! A document read from a package remembers that package. Saving it copies
//! every entry it does not model (styles, numbering, media, settings) and
//! re-renders only the main part and the header and footer parts.

mod package;
mod reader;
mod writer;
mod xml;

pub use reader::read_document;
pub use writer::write_document;

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::model::Document;

/// Read a DOCX file.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Document> {
    let data = fs::read(path.as_ref())?;
    read_document(&data)
}

/// Write a document to a DOCX file.
pub fn save<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    let bytes = write_document(doc)?;
    fs::write(path.as_ref(), bytes)?;
    Ok(())
}

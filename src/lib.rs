//! # formfill
//!
//! Fill DOCX form templates with values found in PDF reports.
//!
//! A template marks the fields to fill with placeholders in any of three
//! forms: `{{Field Name}}`, `[FIELD_NAME]` or `{FIELD_NAME}`. formfill scans
//! the template for them, reads the reports, asks a field extractor for the
//! values, and writes them back into the document.
//!
//! ## Quick Start
//!
//! ```no_run
//! use formfill::{find_placeholders, load_template, replace_placeholders, save, FieldValues};
//!
//! fn main() -> formfill::Result<()> {
//!     let mut doc = load_template("claim_form.docx")?;
//!     let fields = find_placeholders(&doc);
//!     println!("Fields: {}", fields.join(", "));
//!
//!     let mut values = FieldValues::new();
//!     values.insert("ClaimantName", "Jane Doe");
//!     replace_placeholders(&mut doc, &values);
//!
//!     save(&doc, "filled.docx")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Full pipeline
//!
//! ```no_run
//! use formfill::{FillRequest, OpenRouterOptions, Pipeline, ReportSource};
//!
//! fn main() -> formfill::Result<()> {
//!     let pipeline = Pipeline::openrouter("sk-or-...", OpenRouterOptions::default())?;
//!     let request = FillRequest::new(
//!         std::fs::read("claim_form.docx")?,
//!         vec![ReportSource::from_path("photo_report.pdf")?],
//!     );
//!     let output = pipeline.run(&request)?;
//!     output.save_in(".")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Three placeholder syntaxes**, scanned independently
//! - **Every region**: body, table cells, section headers and footers
//! - **Untouched packages**: styles, media and settings are copied as is
//! - **Parallel report reading** with Rayon
//! - **Pluggable collaborators**: bring your own text or field extractor

pub mod detect;
pub mod docx;
pub mod error;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod placeholder;
pub mod report;
pub mod template;
pub mod walk;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, Format};
pub use error::{Error, ErrorKind, Result};
pub use extract::{
    FieldExtractor, FieldValues, OpenRouterExtractor, OpenRouterOptions, PresetExtractor,
    NOT_FOUND,
};
pub use model::{
    Alignment, Block, Document, HeaderFooter, InlineContent, Paragraph, ParagraphStyle, RowContent,
    RunObject, RunPiece, Section, Table, TableCell, TableContent, TableRow, TextRun, TextStyle,
};
pub use pipeline::{
    FillOptions, FillRequest, FilledDocument, LogObserver, Pipeline, PipelineObserver, Step,
};
pub use placeholder::{Occurrence, Syntax};
pub use report::{ErrorMode, PdfTextExtractor, ReportOptions, ReportSource, TextExtractor};
pub use template::{Template, TemplateInfo};
pub use walk::{Area, CellRef, Region};

use std::path::Path;

/// Load a DOCX template.
///
/// # Example
///
/// ```no_run
/// let doc = formfill::load_template("claim_form.docx").unwrap();
/// println!("Sections: {}", doc.sections.len());
/// ```
pub fn load_template<P: AsRef<Path>>(path: P) -> Result<Document> {
    docx::open(path)
}

/// Load a DOCX template from bytes.
pub fn load_template_bytes(data: &[u8]) -> Result<Document> {
    docx::read_document(data)
}

/// Unique placeholder names in a document, sorted.
///
/// An empty list means the document has nothing to fill.
pub fn find_placeholders(doc: &Document) -> Vec<String> {
    placeholder::find_placeholders(doc)
}

/// Substitute field values into a document in place.
///
/// Returns the same document for chaining.
pub fn replace_placeholders<'a>(doc: &'a mut Document, values: &FieldValues) -> &'a mut Document {
    placeholder::replace_placeholders(doc, values)
}

/// Serialize a document to DOCX bytes.
pub fn to_bytes(doc: &Document) -> Result<Vec<u8>> {
    docx::write_document(doc)
}

/// Write a document to a DOCX file.
pub fn save<P: AsRef<Path>>(doc: &Document, path: P) -> Result<()> {
    docx::save(doc, path)
}

/// Combined text of PDF reports on disk.
///
/// # Example
///
/// ```no_run
/// use formfill::{report_text, ReportOptions};
///
/// let text = report_text(&["a.pdf", "b.pdf"], &ReportOptions::default()).unwrap();
/// assert!(text.contains("=== COMBINED REPORTS ==="));
/// ```
pub fn report_text<P: AsRef<Path>>(paths: &[P], options: &ReportOptions) -> Result<String> {
    let reports = paths
        .iter()
        .map(ReportSource::from_path)
        .collect::<Result<Vec<_>>>()?;
    report::combined_text(&PdfTextExtractor::new(), &reports, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim_form() -> Document {
        let mut doc = Document::new();
        doc.add_paragraph(Paragraph::with_text("Claimant: [CLAIMANTNAME]"));
        doc.add_table(Table::from_rows([["Date", "{{AccidentDate}}"]]));
        doc
    }

    #[test]
    fn test_find_and_replace() {
        let mut doc = claim_form();
        assert_eq!(find_placeholders(&doc), vec!["AccidentDate", "CLAIMANTNAME"]);

        let values: FieldValues = [
            ("CLAIMANTNAME".to_string(), "Jane Doe".to_string()),
            ("AccidentDate".to_string(), "2025-01-15".to_string()),
        ]
        .into_iter()
        .collect();
        let text = replace_placeholders(&mut doc, &values).plain_text();

        assert!(text.contains("Claimant: Jane Doe"));
        assert!(text.contains("2025-01-15"));
        assert!(find_placeholders(&doc).is_empty());
    }

    #[test]
    fn test_bytes_round_trip() {
        let bytes = to_bytes(&claim_form()).unwrap();
        assert!(detect::is_docx_bytes(&bytes));

        let doc = load_template_bytes(&bytes).unwrap();
        assert_eq!(find_placeholders(&doc), vec!["AccidentDate", "CLAIMANTNAME"]);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_load_template_empty_data() {
        let result = load_template_bytes(&[]);
        assert!(matches!(result, Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_load_template_pdf_bytes() {
        let result = load_template_bytes(b"%PDF-1.7\n%test");
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Load);
    }

    #[test]
    fn test_load_template_missing_file() {
        let result = load_template("does/not/exist.docx");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_report_text_requires_reports() {
        let paths: [&str; 0] = [];
        let result = report_text(&paths, &ReportOptions::default());
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format_from_bytes(b"PK\x03\x04rest").unwrap(), Format::Docx);
        assert_eq!(
            detect_format_from_bytes(b"%PDF-2.0\n").unwrap(),
            Format::Pdf {
                version: "2.0".to_string()
            }
        );
        assert!(matches!(
            detect_format_from_bytes(b"<html>"),
            Err(Error::UnknownFormat)
        ));
    }
}

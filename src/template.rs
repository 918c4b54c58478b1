//! A loaded template together with its scan results.

use std::path::Path;

use serde::Serialize;

use crate::docx;
use crate::error::{Error, Result};
use crate::extract::FieldValues;
use crate::model::Document;
use crate::placeholder::{self, Occurrence};
use crate::walk;

/// Summary of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    /// Body paragraphs outside tables
    pub paragraph_count: usize,
    /// Body tables
    pub table_count: usize,
    /// Sections
    pub section_count: usize,
    /// Paragraphs visited when scanning (body, cells, headers, footers)
    pub region_count: usize,
    /// Placeholder names, sorted
    pub placeholders: Vec<String>,
}

/// A document template, scanned for placeholders when it is created.
///
/// The scan records how many regions it walked. [`Template::fill`] walks the
/// document again and refuses to substitute if that number changed, so a
/// document edited through [`Template::document_mut`] after scanning cannot
/// be filled against stale results.
#[derive(Debug, Clone)]
pub struct Template {
    document: Document,
    placeholders: Vec<String>,
    scanned_regions: usize,
}

impl Template {
    /// Scan a document.
    pub fn from_document(document: Document) -> Self {
        let placeholders = placeholder::find_placeholders(&document);
        let scanned_regions = walk::region_count(&document);
        log::debug!(
            "Template has {} regions and {} placeholders",
            scanned_regions,
            placeholders.len()
        );
        Self {
            document,
            placeholders,
            scanned_regions,
        }
    }

    /// Load and scan a DOCX template from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Ok(Self::from_document(docx::read_document(data)?))
    }

    /// Load and scan a DOCX template from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_document(docx::open(path)?))
    }

    /// Placeholder names found by the scan, sorted.
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Placeholder names, or [`Error::NoPlaceholders`] when there are none.
    pub fn require_placeholders(&self) -> Result<&[String]> {
        if self.placeholders.is_empty() {
            return Err(Error::NoPlaceholders);
        }
        Ok(&self.placeholders)
    }

    /// Every placeholder occurrence with its location.
    pub fn locations(&self) -> Vec<Occurrence> {
        placeholder::scan_locations(&self.document)
    }

    /// Template summary.
    pub fn info(&self) -> TemplateInfo {
        TemplateInfo {
            paragraph_count: self.document.paragraphs().count(),
            table_count: self.document.tables().count(),
            section_count: self.document.sections.len(),
            region_count: self.scanned_regions,
            placeholders: self.placeholders.clone(),
        }
    }

    /// Substitute values into the template.
    ///
    /// Returns the number of paragraphs rewritten.
    pub fn fill(&mut self, values: &FieldValues) -> Result<usize> {
        let regions = walk::region_count(&self.document);
        if regions != self.scanned_regions {
            return Err(Error::Consistency(format!(
                "scan saw {} regions but the document now has {}",
                self.scanned_regions, regions
            )));
        }

        let missing = values.missing(&self.placeholders);
        if !missing.is_empty() {
            log::warn!("No value for {}", missing.join(", "));
        }

        let rewrites = placeholder::substitute(&mut self.document, values);
        log::info!(
            "Filled {} fields into {} paragraphs",
            values.len(),
            rewrites
        );
        Ok(rewrites)
    }

    /// The underlying document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access to the underlying document.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Take the underlying document.
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Serialize the template as DOCX bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        docx::write_document(&self.document)
    }

    /// Write the template to a DOCX file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        docx::save(&self.document, path)
    }
}

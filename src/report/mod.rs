//! Source text from report documents.
//!
//! Each report is turned into page-marked text; several reports are
//! combined into one text block with a `File:` prefix per report.

mod options;
mod pdf;

pub use options::{ErrorMode, ReportOptions};
pub use pdf::{report_info, PdfTextExtractor, ReportInfo};

use std::path::Path;

use rayon::prelude::*;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// Separator placed between reports in combined text.
pub const COMBINED_SEPARATOR: &str = "=== COMBINED REPORTS ===";

/// Text written for pages without a text layer.
pub const IMAGE_PAGE_NOTE: &str = "[Image-based page - OCR needed]";

/// Turns a binary report into plain text, one string per page.
pub trait TextExtractor: Send + Sync {
    /// Extract the text of every page, in page order.
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>>;
}

impl<T: TextExtractor + ?Sized> TextExtractor for Box<T> {
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>> {
        (**self).page_texts(data)
    }
}

/// A named report document.
#[derive(Debug, Clone)]
pub struct ReportSource {
    /// Name shown in combined text (usually the file name)
    pub name: String,
    /// Raw document bytes
    pub data: Vec<u8>,
}

impl ReportSource {
    /// Create a report from a name and bytes.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Read a report from disk, named after its file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown.pdf".to_string());
        Ok(Self { name, data })
    }
}

/// Render page texts with page markers.
///
/// Pages are numbered from 1; a blank page gets [`IMAGE_PAGE_NOTE`].
pub fn format_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let text = text.as_ref();
            if text.trim().is_empty() {
                format!("--- Page {} ---\n{}", i + 1, IMAGE_PAGE_NOTE)
            } else {
                format!("--- Page {} ---\n{}", i + 1, text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Combine per-report texts.
///
/// A single report is returned as is; several are prefixed with
/// `File: <name>` and joined by [`COMBINED_SEPARATOR`].
pub fn combine_texts<N: AsRef<str>, T: AsRef<str>>(texts: &[(N, T)]) -> String {
    if let [(_, text)] = texts {
        return text.as_ref().to_string();
    }
    texts
        .iter()
        .map(|(name, text)| format!("File: {}\n{}", name.as_ref(), text.as_ref()))
        .collect::<Vec<_>>()
        .join(format!("\n\n{}\n\n", COMBINED_SEPARATOR).as_str())
}

/// Text of one report.
pub fn report_text(
    extractor: &dyn TextExtractor,
    data: &[u8],
    options: &ReportOptions,
) -> Result<String> {
    let pages = extractor.page_texts(data)?;
    let text = format_pages(&pages);
    if options.normalize_unicode {
        Ok(text.nfc().collect())
    } else {
        Ok(text)
    }
}

/// Text of every report, in input order.
///
/// In lenient mode a report that cannot be read contributes
/// `Error: <message>` instead of failing the whole batch.
pub fn extract_reports(
    extractor: &dyn TextExtractor,
    reports: &[ReportSource],
    options: &ReportOptions,
) -> Result<Vec<(String, String)>> {
    let read_one = |report: &ReportSource| -> Result<(String, String)> {
        match report_text(extractor, &report.data, options) {
            Ok(text) => {
                log::debug!("{}: {} characters", report.name, text.len());
                Ok((report.name.clone(), text))
            }
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!("Failed to read {}: {}", report.name, e);
                Ok((report.name.clone(), format!("Error: {}", e)))
            }
            Err(e) => {
                log::error!("Failed to read {}: {}", report.name, e);
                Err(e)
            }
        }
    };

    if options.parallel && reports.len() > 1 {
        reports.par_iter().map(read_one).collect()
    } else {
        reports.iter().map(read_one).collect()
    }
}

/// Combined source text of all reports.
pub fn combined_text(
    extractor: &dyn TextExtractor,
    reports: &[ReportSource],
    options: &ReportOptions,
) -> Result<String> {
    if reports.is_empty() {
        return Err(Error::InvalidInput("at least one report is required".to_string()));
    }
    let texts = extract_reports(extractor, reports, options)?;
    Ok(combine_texts(&texts))
}

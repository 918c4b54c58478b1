//! PDF text extraction using lopdf.

use lopdf::Document as LopdfDocument;
use serde::Serialize;

use super::TextExtractor;
use crate::detect;
use crate::error::{Error, Result};

/// Page text extractor backed by lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn page_texts(&self, data: &[u8]) -> Result<Vec<String>> {
        let doc = load(data)?;
        let pages = doc.get_pages();
        log::debug!("Extracting text from {} pages", pages.len());

        let texts = pages
            .keys()
            .map(|&page_num| match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    // Treated like a page without a text layer.
                    log::warn!("Page {}: text extraction failed: {}", page_num, e);
                    String::new()
                }
            })
            .collect();
        Ok(texts)
    }
}

fn load(data: &[u8]) -> Result<LopdfDocument> {
    if !detect::is_pdf_bytes(data) {
        return Err(Error::UnknownFormat);
    }
    LopdfDocument::load_mem(data).map_err(|e| match e {
        lopdf::Error::Decryption(_) => {
            Error::PdfParse("encrypted reports are not supported".to_string())
        }
        _ => Error::from(e),
    })
}

/// Summary of a report file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReportInfo {
    /// Number of pages
    pub page_count: usize,

    /// Size of the file in bytes
    pub size_bytes: usize,

    /// PDF version from the header
    pub version: String,

    /// Document title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Document author
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Producing application
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,

    /// Creation date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<chrono::DateTime<chrono::Utc>>,
}

/// Read page count and document info of a PDF report.
pub fn report_info(data: &[u8]) -> Result<ReportInfo> {
    let doc = load(data)?;
    let mut info = ReportInfo {
        page_count: doc.get_pages().len(),
        size_bytes: data.len(),
        version: doc.version.to_string(),
        ..Default::default()
    };

    if let Ok(dict) = doc
        .trailer
        .get(b"Info")
        .and_then(|obj| obj.as_reference())
        .and_then(|id| doc.get_dictionary(id))
    {
        info.title = get_string_from_dict(dict, b"Title");
        info.author = get_string_from_dict(dict, b"Author");
        info.producer = get_string_from_dict(dict, b"Producer");
        info.created = get_string_from_dict(dict, b"CreationDate").and_then(|d| parse_pdf_date(&d));
    }

    Ok(info)
}

fn get_string_from_dict(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        lopdf::Object::String(bytes, _) => {
            // UTF-16BE with byte order mark
            if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
                let utf16: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                String::from_utf16(&utf16).ok()
            } else {
                String::from_utf8(bytes.clone())
                    .ok()
                    .or_else(|| Some(bytes.iter().map(|&b| b as char).collect()))
            }
        }
        lopdf::Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string (D:YYYYMMDDHHmmSS...).
fn parse_pdf_date(s: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    chrono::NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))
        .and_then(|date| date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0)))
        .map(|dt| chrono::DateTime::from_naive_utc_and_offset(dt, chrono::Utc))
}

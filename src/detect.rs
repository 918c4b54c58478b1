//! Input format detection.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Formats formfill knows how to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Format {
    /// Office Open XML word-processing package (zip container)
    Docx,
    /// PDF document with its header version (e.g., "1.7")
    Pdf {
        /// PDF version
        version: String,
    },
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Docx => write!(f, "DOCX"),
            Format::Pdf { version } => write!(f, "PDF {}", version),
        }
    }
}

/// Zip local file header magic.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Detect the format of a file from its first bytes.
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<Format> {
    let mut header = Vec::with_capacity(16);
    File::open(path)?.take(16).read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the format of in-memory data.
///
/// # Returns
/// * `Ok(Format)` if the data starts with a known signature
/// * `Err(Error::UnknownFormat)` otherwise
pub fn detect_format_from_bytes(data: &[u8]) -> Result<Format> {
    if data.starts_with(ZIP_MAGIC) {
        return Ok(Format::Docx);
    }

    if data.len() >= PDF_MAGIC.len() + VERSION_LEN && data.starts_with(PDF_MAGIC) {
        let version_bytes = &data[PDF_MAGIC.len()..PDF_MAGIC.len() + VERSION_LEN];
        let version = String::from_utf8_lossy(version_bytes).to_string();
        if is_valid_version(&version) {
            return Ok(Format::Pdf { version });
        }
    }

    Err(Error::UnknownFormat)
}

/// Check if a version string looks like "1.7".
fn is_valid_version(version: &str) -> bool {
    let chars: Vec<char> = version.chars().collect();
    chars.len() == 3 && chars[0].is_ascii_digit() && chars[1] == '.' && chars[2].is_ascii_digit()
}

/// Check if bytes look like a DOCX (zip) package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(Format::Docx))
}

/// Check if bytes look like a PDF.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(detect_format_from_bytes(data), Ok(Format::Pdf { .. }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_docx() {
        let data = b"PK\x03\x04\x14\x00\x06\x00";
        assert_eq!(detect_format_from_bytes(data).unwrap(), Format::Docx);
        assert!(is_docx_bytes(data));
        assert!(!is_pdf_bytes(data));
    }

    #[test]
    fn test_detect_pdf() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        let format = detect_format_from_bytes(data).unwrap();
        assert_eq!(
            format,
            Format::Pdf {
                version: "1.7".to_string()
            }
        );
        assert_eq!(format.to_string(), "PDF 1.7");
    }

    #[test]
    fn test_detect_unknown() {
        assert!(matches!(
            detect_format_from_bytes(b"<!DOCTYPE html>"),
            Err(Error::UnknownFormat)
        ));
        assert!(matches!(detect_format_from_bytes(b""), Err(Error::UnknownFormat)));
        assert!(matches!(detect_format_from_bytes(b"%PDF"), Err(Error::UnknownFormat)));
    }

    #[test]
    fn test_version_validation() {
        assert!(is_valid_version("1.0"));
        assert!(is_valid_version("2.0"));
        assert!(!is_valid_version("10.0"));
        assert!(!is_valid_version("abc"));
    }
}

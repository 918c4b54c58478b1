//! Error types for formfill.

use std::io;
use thiserror::Error;

/// Result type alias for formfill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while filling a template.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither a DOCX package nor a PDF.
    #[error("Unknown file format: expected a DOCX package or a PDF")]
    UnknownFormat,

    /// The zip container of a DOCX package is broken.
    #[error("Invalid DOCX container: {0}")]
    Zip(String),

    /// A package part is not well-formed XML.
    #[error("XML error in {part}: {message}")]
    Xml {
        /// Package part being parsed
        part: String,
        /// Parser message
        message: String,
    },

    /// A required package part is missing.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// A report could not be parsed as PDF.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Scanning the template found no placeholders.
    #[error(
        "No placeholders found in template. Use {} format.",
        crate::placeholder::syntax_examples()
    )]
    NoPlaceholders,

    /// Text extraction from a report failed.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The extraction service could not be reached.
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The extraction service answered with a non-success status.
    #[error("API returned status {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// The extraction service answered with something that is not a field map.
    #[error("Malformed extraction response: {0}")]
    MalformedResponse(String),

    /// The document tree changed shape between scanning and substitution,
    /// or a region has no backing part.
    #[error("Document consistency fault: {0}")]
    Consistency(String),

    /// A request is missing something it needs.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Template or report cannot be parsed as its expected format
    Load,
    /// The template contains no placeholders
    NoPlaceholders,
    /// A text or field extraction collaborator failed
    Collaborator,
    /// The document tree is structurally inconsistent
    Substitution,
    /// The request itself is incomplete
    Input,
    /// File system failure
    Io,
}

impl ErrorKind {
    /// Short label used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Load => "LoadError",
            ErrorKind::NoPlaceholders => "NoPlaceholdersError",
            ErrorKind::Collaborator => "CollaboratorError",
            ErrorKind::Substitution => "SubstitutionError",
            ErrorKind::Input => "InputError",
            ErrorKind::Io => "IoError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::UnknownFormat
            | Error::Zip(_)
            | Error::Xml { .. }
            | Error::MissingPart(_)
            | Error::PdfParse(_) => ErrorKind::Load,
            Error::NoPlaceholders => ErrorKind::NoPlaceholders,
            Error::TextExtract(_)
            | Error::Http(_)
            | Error::Api { .. }
            | Error::MalformedResponse(_) => ErrorKind::Collaborator,
            Error::Consistency(_) => ErrorKind::Substitution,
            Error::InvalidInput(_) => ErrorKind::Input,
        }
    }

    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        Error::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

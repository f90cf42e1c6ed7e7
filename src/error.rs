//! Error types for the redoc library.

use std::io;
use thiserror::Error;

/// Result type alias for redoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while importing, exporting or storing documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format could not be determined.
    #[error("Unknown file format")]
    UnknownFormat,

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required document component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during text encoding conversion.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The DOCX bytes could not be turned into HTML.
    #[error("Conversion failed: {0}")]
    Conversion(String),

    /// The content could not be serialized for download.
    #[error("Export failed: {0}")]
    Export(String),

    /// The file extension or MIME type is not accepted.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The upload store could not persist or read its data.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A requested stored file does not exist.
    #[error("File not found: {0}")]
    NotFound(String),
}

/// Caller-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or unsupported DOCX bytes.
    Conversion,
    /// Serialization failure during export.
    Export,
    /// Extension or MIME type not recognized.
    UnsupportedFileType,
    /// Persistence failure.
    Storage,
    /// Requested download missing.
    NotFound,
}

impl Error {
    /// Classify this error into one of the caller-facing kinds.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownFormat
            | Error::ZipArchive(_)
            | Error::XmlParse(_)
            | Error::MissingComponent(_)
            | Error::Encoding(_)
            | Error::Conversion(_) => ErrorKind::Conversion,
            Error::Export(_) => ErrorKind::Export,
            Error::UnsupportedFileType(_) => ErrorKind::UnsupportedFileType,
            Error::Io(_) | Error::Storage(_) => ErrorKind::Storage,
            Error::NotFound(_) => ErrorKind::NotFound,
        }
    }

    /// Wrap any parse-level failure as a conversion error.
    pub(crate) fn into_conversion(self) -> Self {
        match self {
            Error::Conversion(_) => self,
            other => Error::Conversion(other.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownFormat;
        assert_eq!(err.to_string(), "Unknown file format");

        let err = Error::UnsupportedFileType("resume.pdf".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: resume.pdf");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Storage);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(Error::ZipArchive("bad".into()).kind(), ErrorKind::Conversion);
        assert_eq!(Error::Export("font".into()).kind(), ErrorKind::Export);
        assert_eq!(Error::NotFound("x".into()).kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_into_conversion() {
        let err = Error::XmlParse("unexpected eof".into()).into_conversion();
        assert!(matches!(err, Error::Conversion(ref m) if m.contains("unexpected eof")));
    }
}

//! Error types for the image stamper.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use serde::Serialize;

/// Validation errors for batch requests and settings.
#[derive(Error, Debug, Serialize)]
pub enum ValidationError {
    /// Path-related validation error
    #[error("Path error: {0}")]
    Path(#[from] PathError),
    /// Placement parameters out of range
    #[error("Placement error: {0}")]
    Placement(String),
    /// Missing or invalid settings value
    #[error("Settings error: {0}")]
    Settings(String),
}

/// File path errors.
#[derive(Error, Debug, Serialize)]
pub enum PathError {
    /// Path does not exist
    #[error("Not found: {0}")]
    NotFound(PathBuf),
    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    /// Path exists but is not a file
    #[error("Not a file: {0}")]
    NotFile(PathBuf),
    /// IO error accessing the path
    #[error("IO error: {0}")]
    IO(String),
}

/// Main error type for the stamper.
///
/// Item-level failures are converted into [`crate::core::ItemOutcome::Failure`]
/// values before they reach the coordinator; only batch-level conditions
/// travel as this error past the coordinator boundary.
#[derive(Error, Debug, Serialize)]
pub enum StamperError {
    /// Request or settings validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Anchor name is not one of the recognized placements
    #[error("Invalid anchor: {0}")]
    InvalidAnchor(String),

    /// Image processing failed
    #[error("Processing error: {0}")]
    Processing(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Unsupported or invalid image format
    #[error("Format error: {0}")]
    Format(String),

    /// Settings file could not be read or written
    #[error("Settings error: {0}")]
    Settings(String),

    /// The whole batch was aborted before dispatching any item
    #[error("{0}")]
    BatchFatal(String),
}

/// Failure of a single item. Rendered into the item's failure reason; never
/// propagated past the item boundary.
#[derive(Error, Debug)]
pub enum ItemError {
    #[error("decode error: {0}")]
    Decode(String),
    #[error("logo resize error: {0}")]
    Resize(String),
    #[error("encode error: {0}")]
    Encode(String),
    #[error("write error: {0}")]
    Write(String),
    /// The blocking task running the item panicked or was aborted
    #[error("worker error: {0}")]
    Worker(String),
}

/// Convenience result type for stamper operations.
pub type StamperResult<T> = Result<T, StamperError>;

impl StamperError {
    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn settings<T: Into<String>>(msg: T) -> Self {
        Self::Settings(msg.into())
    }

    pub fn batch_fatal<T: Into<String>>(msg: T) -> Self {
        Self::BatchFatal(msg.into())
    }

    pub fn invalid_anchor<T: Into<String>>(name: T) -> Self {
        Self::InvalidAnchor(name.into())
    }

    /// Returns `true` for conditions that abort a whole batch.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(self, Self::BatchFatal(_))
    }
}

impl ValidationError {
    pub fn path_not_found(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFound(path.into()))
    }

    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotADirectory(path.into()))
    }

    pub fn not_a_file(path: impl Into<PathBuf>) -> Self {
        Self::Path(PathError::NotFile(path.into()))
    }

    pub fn placement(msg: impl Into<String>) -> Self {
        Self::Placement(msg.into())
    }

    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

// Convert std::io::Error to StamperError
impl From<io::Error> for StamperError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

// Convert io::Error to PathError
impl From<io::Error> for PathError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

// Convert PathError to StamperError
impl From<PathError> for StamperError {
    fn from(err: PathError) -> Self {
        Self::Validation(ValidationError::Path(err))
    }
}

impl From<image::ImageError> for StamperError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Self::IO(e.to_string()),
            image::ImageError::Unsupported(e) => Self::Format(e.to_string()),
            other => Self::Processing(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_errors_nest_under_validation() {
        let err: StamperError = PathError::NotFound(PathBuf::from("/nope")).into();
        assert!(matches!(
            err,
            StamperError::Validation(ValidationError::Path(PathError::NotFound(_)))
        ));
        assert_eq!(err.to_string(), "Validation error: Path error: Not found: /nope");
    }

    #[test]
    fn batch_fatal_is_reported_verbatim() {
        let err = StamperError::batch_fatal("logo load error: missing");
        assert!(err.is_batch_fatal());
        assert_eq!(err.to_string(), "logo load error: missing");
        assert!(!StamperError::processing("x").is_batch_fatal());
    }

    #[test]
    fn errors_serialize_for_json_reports() {
        let err = StamperError::invalid_anchor("middle");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json, serde_json::json!({ "InvalidAnchor": "middle" }));
    }
}

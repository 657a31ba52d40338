//! Error types for casfile
//!
//! This module defines the error taxonomy shared by the atomic writer and
//! the verifying reader, plus the conversions needed to carry those errors
//! through `std::io::Read` / `std::io::Write`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for casfile operations
#[derive(Error, Debug)]
pub enum CasError {
    /// Write or commit attempted on a writer that was already committed or abandoned
    #[error("Already closed")]
    AlreadyClosed,

    /// Exclusive create failed: another writer owns the path, or a leftover file is present
    #[error("Already exists: {path}")]
    AlreadyExists {
        path: PathBuf,
    },

    /// Computed digest disagrees with the expected identifier
    #[error("Content mismatch: expected OID {expected}, got {actual}")]
    ContentMismatch {
        expected: String,
        actual: String,
    },

    /// A tracked handle no longer refers to the path recorded for it
    #[error("Invalid filename: expected {expected:?}, got {actual:?}")]
    InvalidFilename {
        expected: PathBuf,
        actual: PathBuf,
    },

    /// Identifier is not 64 lowercase hex characters
    #[error("Invalid OID: {0:?}")]
    InvalidOid(String),

    /// I/O error during file operations
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CasError {
    /// Create an I/O error with path context.
    ///
    /// Exclusive-create collisions are reported as [`CasError::AlreadyExists`]
    /// so callers can tell "another writer is in progress" apart from real
    /// filesystem failures.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::AlreadyExists {
            return Self::AlreadyExists { path };
        }
        Self::Io { path, source }
    }

    /// Create a content mismatch error
    pub fn content_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::ContentMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Check if this error may succeed on a later attempt.
    ///
    /// Mismatches and consistency violations never do: either the content
    /// or the caller's expectation is wrong.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. } | Self::Io { .. })
    }

    /// Check if this error reports an integrity failure
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::ContentMismatch { .. })
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::AlreadyExists { path } | Self::Io { path, .. } => Some(path),
            Self::InvalidFilename { expected, .. } => Some(expected),
            _ => None,
        }
    }

    /// Recover a `CasError` carried inside an `io::Error`.
    ///
    /// Readers and writers report through the `std::io` traits, so this is
    /// how callers find out whether a failed read was an integrity failure.
    pub fn from_io_ref(err: &io::Error) -> Option<&CasError> {
        err.get_ref().and_then(|inner| inner.downcast_ref::<CasError>())
    }

    /// Turn an error from a read back into a `CasError`.
    ///
    /// Mismatches reported by a [`VerifyingReader`](crate::fs::VerifyingReader)
    /// come back typed; anything else becomes [`CasError::Io`] at `path`.
    pub fn from_read_error(path: impl Into<PathBuf>, err: io::Error) -> Self {
        match Self::from_io_ref(&err) {
            Some(Self::ContentMismatch { expected, actual }) => {
                Self::content_mismatch(expected.as_str(), actual.as_str())
            }
            _ => Self::io(path, err),
        }
    }
}

/// Result type alias for casfile operations
pub type Result<T> = std::result::Result<T, CasError>;

impl From<io::Error> for CasError {
    fn from(err: io::Error) -> Self {
        CasError::io(PathBuf::new(), err)
    }
}

impl From<serde_json::Error> for CasError {
    fn from(err: serde_json::Error) -> Self {
        CasError::Config(err.to_string())
    }
}

impl From<CasError> for io::Error {
    fn from(err: CasError) -> Self {
        match err {
            CasError::Io { source, .. } => source,
            CasError::AlreadyExists { .. } => io::Error::new(io::ErrorKind::AlreadyExists, err),
            CasError::ContentMismatch { .. } | CasError::InvalidOid(_) => {
                io::Error::new(io::ErrorKind::InvalidData, err)
            }
            CasError::Config(_) => io::Error::new(io::ErrorKind::InvalidInput, err),
            CasError::AlreadyClosed | CasError::InvalidFilename { .. } => io::Error::other(err),
        }
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| CasError::io(path, e))
    }
}

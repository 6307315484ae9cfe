//! Unified application error types for RevHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The file name has no active revision.
    ActiveNotFound,
    /// No revision matches the requested file name and version.
    RevisionNotFound,
    /// A folder still holds revision records and cannot be removed.
    FolderNotEmpty,
    /// Stored content could not be decompressed.
    CorruptPayload,
    /// The record was committed but the filesystem mirror could not be updated.
    MirrorWriteFailed,
    /// A generic resource (directory, route target) was not found.
    NotFound,
    /// Input validation failed.
    Validation,
    /// A concurrent modification was detected.
    Conflict,
    /// A database error occurred.
    Database,
    /// A storage I/O error occurred.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ActiveNotFound => write!(f, "ACTIVE_NOT_FOUND"),
            Self::RevisionNotFound => write!(f, "REVISION_NOT_FOUND"),
            Self::FolderNotEmpty => write!(f, "FOLDER_NOT_EMPTY"),
            Self::CorruptPayload => write!(f, "CORRUPT_PAYLOAD"),
            Self::MirrorWriteFailed => write!(f, "MIRROR_WRITE_FAILED"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout RevHub.
///
/// Crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an active-revision-not-found error.
    pub fn active_not_found(file_name: &str) -> Self {
        Self::new(
            ErrorKind::ActiveNotFound,
            format!("No active revision for file: {file_name}"),
        )
    }

    /// Create a revision-not-found error.
    pub fn revision_not_found(file_name: &str, version: i32) -> Self {
        Self::new(
            ErrorKind::RevisionNotFound,
            format!("Version {version} not found for file: {file_name}"),
        )
    }

    /// Create a folder-not-empty error.
    pub fn folder_not_empty(folder: &str, records: usize) -> Self {
        Self::new(
            ErrorKind::FolderNotEmpty,
            format!("Folder '{folder}' still holds {records} revision(s)"),
        )
    }

    /// Create a corrupt-payload error.
    pub fn corrupt_payload(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CorruptPayload, message)
    }

    /// Create a mirror-write-failed error.
    pub fn mirror_write_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MirrorWriteFailed, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns whether the error means "the thing asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::ActiveNotFound | ErrorKind::RevisionNotFound | ErrorKind::NotFound
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

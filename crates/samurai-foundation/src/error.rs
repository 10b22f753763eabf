//! Error handling for the samurai import rewriter

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type used throughout samurai
///
/// Every variant is unrecoverable at the point of detection: inputs are static
/// files, so there is nothing to retry. Variants carry the file path and, where
/// relevant, the offending import literal so a human can fix the source tree.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SamuraiError {
    #[error("Parse error in {}: {message}", file.display())]
    Parse { file: PathBuf, message: String },

    #[error("No owning module for {}: no module marker found below the library root", path.display())]
    NoOwningModule { path: PathBuf },

    #[error("More than one module marker in {}: {}", directory.display(), candidates.join(", "))]
    AmbiguousModule {
        directory: PathBuf,
        candidates: Vec<String>,
    },

    #[error("Could not find a module for the import path {literal} in {}", file.display())]
    UnresolvableImportTarget { file: PathBuf, literal: String },

    #[error("Overlapping edits in {}: [{first_start}, {first_end}) and [{second_start}, {second_end})", file.display())]
    OverlappingEdit {
        file: PathBuf,
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    #[error("Edit [{start}, {end}) is out of bounds for {} ({len} bytes)", file.display())]
    EditOutOfBounds {
        file: PathBuf,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("I/O error{}: {message}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Manifest error in {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },

    #[error("Invalid path {}: {message}", path.display())]
    InvalidPath { path: PathBuf, message: String },
}

impl SamuraiError {
    /// Create a new parse error
    pub fn parse(file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a new missing-owner error
    pub fn no_owning_module(path: impl Into<PathBuf>) -> Self {
        Self::NoOwningModule { path: path.into() }
    }

    /// Create a new unresolvable import error
    pub fn unresolvable_import(file: impl Into<PathBuf>, literal: impl Into<String>) -> Self {
        Self::UnresolvableImportTarget {
            file: file.into(),
            literal: literal.into(),
        }
    }

    /// Create a new I/O error bound to a path
    pub fn io_at(path: &Path, err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: Some(path.to_path_buf()),
            source: Some(err),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new manifest error
    pub fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new invalid path error
    pub fn invalid_path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Whether a run must stop at this error even when collecting diagnostics.
    ///
    /// Parse failures and unresolvable imports are scoped to one file. Everything
    /// else points at a structural problem or an internal invariant violation.
    pub fn is_fatal_for_run(&self) -> bool {
        !matches!(
            self,
            Self::Parse { .. } | Self::UnresolvableImportTarget { .. }
        )
    }

    /// Source file the error is attributed to, when known
    pub fn file(&self) -> Option<&Path> {
        match self {
            Self::Parse { file, .. }
            | Self::UnresolvableImportTarget { file, .. }
            | Self::OverlappingEdit { file, .. }
            | Self::EditOutOfBounds { file, .. } => Some(file),
            Self::NoOwningModule { path } | Self::InvalidPath { path, .. } => Some(path),
            Self::Manifest { path, .. } => Some(path),
            Self::Io { path, .. } => path.as_deref(),
            Self::AmbiguousModule { directory, .. } => Some(directory),
            Self::Json { .. } | Self::Config { .. } => None,
        }
    }
}

impl From<std::io::Error> for SamuraiError {
    fn from(err: std::io::Error) -> Self {
        SamuraiError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for SamuraiError {
    fn from(err: serde_json::Error) -> Self {
        SamuraiError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias for convenience
pub type SamuraiResult<T> = Result<T, SamuraiError>;

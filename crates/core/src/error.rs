//! Error types for theme-font rewriting.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, rewriting or saving a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file exists but is not a well-formed presentation package.
    #[error("Not a valid presentation package: {0}")]
    InvalidPackage(String),

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    XmlError(String),

    /// The document tree is shaped in a way the walker refuses to follow.
    #[error("Document structure error: {0}")]
    StructureError(String),
}


//! # Error Module
//!
//! User-friendly error types for the half-frame splitter.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Expected outcomes are not errors** - a scan with no separator or a
//!   region that fails the validity filter is ordinary control flow and is
//!   represented with `Option`, never with a variant here
//! - **Recovery hints** - suggest how to fix when possible

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SplitterError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Processing error: {0}")]
    Process(#[from] ProcessError),

    #[error("Stamping error: {0}")]
    Stamp(#[from] StampError),

    #[error("Contact sheet error: {0}")]
    Sheet(#[from] SheetError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors that occur while discovering source images
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while splitting a single source image
///
/// These are fatal for the affected file only; the pipeline records them
/// and continues with the remaining files.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Errors that occur while persisting a validated frame
#[derive(Error, Debug)]
pub enum StampError {
    #[error("Failed to encode frame to {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write tag sidecar {path}: {source}")]
    WriteTags {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize frame tags: {0}")]
    SerializeTags(#[from] serde_json::Error),
}

/// Errors that occur while laying out the contact sheet
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("No frames to lay out")]
    NoFrames,

    #[error("Failed to read frame {path}: {source}")]
    ReadFrame {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to write contact sheet {path}: {source}")]
    WriteSheet {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SplitterError>;

//! # Scanner Module
//!
//! Discovers scanned source images in a directory and counts everything
//! it skips - the ignored-file count is part of the final report, so a
//! source that never entered the pipeline is never silently dropped.
//!
//! ## Supported Formats
//! - JPEG (.jpg, .jpeg) - what film labs deliver
//! - PNG (.png)
//! - TIFF (.tiff, .tif) - high-resolution scans
//!
//! ## Example
//! ```rust,ignore
//! use tych_split::core::scanner::{ScanConfig, SourceScanner, WalkDirScanner};
//!
//! let scanner = WalkDirScanner::new(ScanConfig::default());
//! let outcome = scanner.scan(&"/scans/roll-12".into())?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{ScanConfig, WalkDirScanner};

use crate::error::ScanError;
use crate::events::EventSender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// A discovered source image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path to the source scan
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modified time
    pub modified: SystemTime,
    /// Detected image format
    pub format: SourceFormat,
}

/// Source image formats the splitter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    Jpeg,
    Png,
    Tiff,
    Unknown,
}

impl SourceFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => SourceFormat::Jpeg,
            "png" => SourceFormat::Png,
            "tiff" | "tif" => SourceFormat::Tiff,
            _ => SourceFormat::Unknown,
        }
    }
}

/// Result of a scan operation
#[derive(Debug)]
pub struct ScanOutcome {
    /// Source images to split
    pub images: Vec<SourceFile>,
    /// Files skipped (wrong extension, hidden, subdirectories when
    /// non-recursive); reported back to the user as a count
    pub ignored: Vec<PathBuf>,
    /// Errors that occurred during scanning (non-fatal)
    pub errors: Vec<ScanError>,
}

/// Trait for source discovery
///
/// Implement this trait to create custom scanners (e.g., for testing).
pub trait SourceScanner: Send + Sync {
    /// Scan a directory and return discovered sources
    fn scan(&self, root: &PathBuf) -> Result<ScanOutcome, ScanError>;

    /// Scan with progress reporting via events
    fn scan_with_events(
        &self,
        root: &PathBuf,
        events: &EventSender,
    ) -> Result<ScanOutcome, ScanError>;
}

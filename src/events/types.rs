//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::splitter::FrameSide;

/// All events emitted by the splitting pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Source discovery events
    Scan(ScanEvent),
    /// Per-image splitting events
    Frame(FrameEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during source discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Discovery has started
    Started { path: PathBuf },
    /// A source image was found
    ImageFound { path: PathBuf },
    /// A file was ignored (wrong extension, hidden, ...)
    FileIgnored { path: PathBuf },
    /// An error occurred but discovery continues
    Error { path: PathBuf, message: String },
    /// Discovery completed
    Completed {
        total_images: usize,
        total_ignored: usize,
    },
}

/// Events while splitting a single source image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FrameEvent {
    /// Processing of a source image has started
    Started { path: PathBuf },
    /// A separator band was located
    SeparatorFound { path: PathBuf, x: u32, width: u32 },
    /// No separator qualified; the source yields zero frames
    NoSeparator { path: PathBuf },
    /// A region was cut but rejected by the validity filter
    RegionDiscarded {
        path: PathBuf,
        side: FrameSide,
        reason: DiscardReason,
    },
    /// A half-frame was written to disk
    Written { path: PathBuf, side: FrameSide },
    /// A per-file error occurred; remaining files continue
    Error { path: PathBuf, message: String },
    /// Progress update across all source images
    Progress(FrameProgress),
}

/// Why a cut region was not persisted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DiscardReason {
    /// The separator sat at an image edge and the region has zero area
    Empty,
    /// Mean intensity fell at or below the brightness threshold
    Blank { mean_intensity: f64 },
}

/// Progress information across source images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameProgress {
    /// Number of source images fully processed so far
    pub completed: usize,
    /// Total number of source images
    pub total: usize,
    /// Source image just processed
    pub current_path: PathBuf,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Splitting,
    Layout,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Source images successfully decoded and split
    pub images_processed: usize,
    /// Half-frame files created
    pub frames_created: usize,
    /// Files skipped by the scanner
    pub files_ignored: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Splitting => write!(f, "Splitting"),
            PipelinePhase::Layout => write!(f, "Layout"),
        }
    }
}

//! # Frame Splitter Module
//!
//! Cuts a scanned photograph at the detected separator band and decides
//! which of the two resulting regions are real photographic content.
//!
//! ## Outcomes
//! Every source image yields zero, one, or two frames, and the types say
//! which: `split` produces two `Option` regions, `validate` keeps only
//! regions with nonzero area and mean intensity above the brightness
//! threshold. Blank and black regions are silent, expected outcomes - the
//! film winder leaves unexposed half-frames at the start and end of a roll.

use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::detector::SeparatorCandidate;

/// Configuration for region extraction and validation
#[derive(Debug, Clone, Copy)]
pub struct SplitConfig {
    /// Pixels trimmed from each region at the separator edge
    pub buffer: u32,
    /// Minimum mean intensity (exclusive, 0-255) for a region to count as content
    pub brightness_threshold: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            buffer: 2,
            brightness_threshold: 91.0,
        }
    }
}

/// Which side of the separator a frame came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameSide {
    /// Left of the separator
    A,
    /// Right of the separator
    B,
}

impl FrameSide {
    /// Output filename suffix for this side
    pub fn suffix(&self) -> &'static str {
        match self {
            FrameSide::A => "a",
            FrameSide::B => "b",
        }
    }
}

impl std::fmt::Display for FrameSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

/// The two regions produced by cutting at the separator
///
/// Both regions are `None` when no separator was found. A region at an
/// image edge may be present but have zero area; validation rejects it.
#[derive(Debug, Clone)]
pub struct SplitResult {
    pub left: Option<DynamicImage>,
    pub right: Option<DynamicImage>,
}

impl SplitResult {
    /// A result with neither region, for sources with no separator
    pub fn empty() -> Self {
        Self {
            left: None,
            right: None,
        }
    }
}

/// A region that passed the content-validity filter
#[derive(Debug, Clone)]
pub struct ValidatedFrame {
    /// Which side of the separator the frame came from
    pub side: FrameSide,
    /// The frame pixels, unchanged from the cut region
    pub image: DynamicImage,
    /// Mean intensity over all channels, kept for reporting
    pub mean_intensity: f64,
}

/// Cut the image at the separator candidate.
///
/// Each region is offset inward by `config.buffer` pixels so the edge
/// pixels of the band itself never bleed into a frame. Offsets are clamped
/// at the image bounds, so a separator touching an edge produces a
/// zero-width region rather than an out-of-range cut.
pub fn split(
    image: &DynamicImage,
    candidate: Option<&SeparatorCandidate>,
    config: &SplitConfig,
) -> SplitResult {
    let candidate = match candidate {
        Some(candidate) => candidate,
        None => return SplitResult::empty(),
    };

    let (width, height) = image.dimensions();

    let left_width = candidate.x.saturating_sub(config.buffer).min(width);
    let right_start = (candidate.x + candidate.width)
        .saturating_add(config.buffer)
        .min(width);

    debug!(
        left_width,
        right_start,
        image_width = width,
        "cutting at separator"
    );

    SplitResult {
        left: Some(image.crop_imm(0, 0, left_width, height)),
        right: Some(image.crop_imm(right_start, 0, width - right_start, height)),
    }
}

/// Mean pixel intensity over all channels, on a 0-255 scale.
pub fn mean_intensity(image: &DynamicImage) -> f64 {
    let rgb = image.to_rgb8();
    let samples = rgb.as_raw();

    if samples.is_empty() {
        return 0.0;
    }

    let sum: u64 = samples.iter().map(|&v| v as u64).sum();
    sum as f64 / samples.len() as f64
}

/// Outcome of assessing one region against the validity filter
#[derive(Debug)]
pub enum RegionVerdict {
    /// No region existed (no separator was found)
    Absent,
    /// The separator sat at an image edge; the region has zero area
    Empty,
    /// Mean intensity at or below the brightness threshold; blank film
    Blank { mean_intensity: f64 },
    /// Real content
    Valid(ValidatedFrame),
}

/// Assess one region against the content-validity filter.
///
/// Rejects absent regions, zero-area regions (separator at an image edge),
/// and regions whose mean intensity is at or below the brightness threshold
/// (blank or unexposed film). Surviving regions are wrapped unchanged.
pub fn assess(region: Option<DynamicImage>, side: FrameSide, config: &SplitConfig) -> RegionVerdict {
    let region = match region {
        Some(region) => region,
        None => return RegionVerdict::Absent,
    };

    let (width, height) = region.dimensions();
    if width == 0 || height == 0 {
        debug!(%side, "region discarded: zero area");
        return RegionVerdict::Empty;
    }

    let mean = mean_intensity(&region);
    if mean <= config.brightness_threshold {
        debug!(%side, mean, "region discarded: below brightness threshold");
        return RegionVerdict::Blank {
            mean_intensity: mean,
        };
    }

    RegionVerdict::Valid(ValidatedFrame {
        side,
        image: region,
        mean_intensity: mean,
    })
}

/// Apply the content-validity filter to one region.
///
/// The `Option` view of [`assess`]: a frame for valid content, `None` for
/// everything else. Idempotent - re-validating a validated frame returns
/// it unchanged.
pub fn validate(
    region: Option<DynamicImage>,
    side: FrameSide,
    config: &SplitConfig,
) -> Option<ValidatedFrame> {
    match assess(region, side, config) {
        RegionVerdict::Valid(frame) => Some(frame),
        _ => None,
    }
}

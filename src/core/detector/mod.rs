//! # Separator Detector Module
//!
//! Locates the vertical black band that divides the two exposures of a
//! scanned half-frame photograph.
//!
//! ## Method
//! The scan is binarized so that near-black pixels become foreground, then
//! contour outlines of the foreground blobs are extracted. A blob whose
//! bounding box spans more than 90% of the image height is consistent with
//! a divider running the length of the frame; requiring "nearly full" rather
//! than exactly full height tolerates minor scan skew without any rotation
//! correction. When several blobs qualify the leftmost wins - deterministic,
//! and favors the first physically-encountered band.

use image::DynamicImage;
use imageproc::contours::{find_contours, BorderType};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::point::Point;
use tracing::debug;

/// Configuration for separator detection
#[derive(Debug, Clone, Copy)]
pub struct DetectorConfig {
    /// Maximum grayscale intensity treated as "black" (0-255)
    pub darkness_threshold: u8,
    /// Fraction of image height a blob must span to qualify as a separator
    pub min_height_ratio: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            darkness_threshold: 15,
            min_height_ratio: 0.9,
        }
    }
}

/// A detected vertical strip that may divide the two half-frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorCandidate {
    /// Horizontal offset of the band's left edge, in pixels
    pub x: u32,
    /// Width of the band, in pixels
    pub width: u32,
}

/// Axis-aligned bounding box of a contour
struct BoundingBox {
    x: u32,
    width: u32,
    height: u32,
}

fn bounding_box(points: &[Point<u32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);

    for point in points {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    Some(BoundingBox {
        x: min_x,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Locate the separator band in a scanned half-frame photograph.
///
/// Returns `None` when no near-full-height dark region exists (for example
/// an overexposed scan). Callers must treat that as "this source yields zero
/// frames", not as an error.
pub fn detect(image: &DynamicImage, config: &DetectorConfig) -> Option<SeparatorCandidate> {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();

    if width == 0 || height == 0 {
        return None;
    }

    // Invert so the dark separator becomes the foreground blob.
    let binary = threshold(
        &gray,
        config.darkness_threshold,
        ThresholdType::BinaryInverted,
    );

    let min_height = config.min_height_ratio * height as f32;

    let mut candidates: Vec<SeparatorCandidate> = find_contours::<u32>(&binary)
        .iter()
        .filter(|contour| contour.border_type == BorderType::Outer)
        .filter_map(|contour| bounding_box(&contour.points))
        .filter(|bbox| bbox.height as f32 > min_height)
        .map(|bbox| SeparatorCandidate {
            x: bbox.x,
            width: bbox.width,
        })
        .collect();

    // Leftmost-x tie-break. A heuristic: with multiple near-full-height dark
    // regions (vignetting, torn film edges) the first band wins.
    candidates.sort_by_key(|candidate| candidate.x);
    let selected = candidates.into_iter().next();

    match selected {
        Some(candidate) => debug!(
            x = candidate.x,
            width = candidate.width,
            "separator candidate selected"
        ),
        None => debug!("no separator candidate qualified"),
    }

    selected
}

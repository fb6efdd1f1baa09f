//! # Stamper Module
//!
//! Persists validated half-frames and attaches descriptive tags.
//!
//! ## Tags
//! Each written frame gets a JSON sidecar (`{frame-stem}.json`) carrying
//! the camera identity, the processing-software string, the source scan it
//! was cut from, its dimensions, an optional copyright line, and the
//! source's EXIF capture date when one is readable. The sidecar stands in
//! for in-file EXIF assignment, which belongs to an external encoder.

use image::GenericImageView;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::metadata::extract_metadata;
use super::splitter::ValidatedFrame;
use crate::error::StampError;
use chrono::{DateTime, Utc};

/// Identity written into every frame's tags
#[derive(Debug, Clone)]
pub struct StampConfig {
    /// Camera make tag
    pub make: String,
    /// Camera model tag
    pub model: String,
    /// Processing-software tag
    pub software: String,
    /// Copyright line, user-supplied
    pub copyright: Option<String>,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            make: "Alfie Cameras".to_string(),
            model: "TYCH".to_string(),
            software: format!("tych-split v{}", env!("CARGO_PKG_VERSION")),
            copyright: None,
        }
    }
}

/// Descriptive tags attached to a persisted half-frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameTags {
    /// Camera make
    pub make: String,
    /// Camera model
    pub model: String,
    /// Normal orientation; the splitter never rotates
    pub orientation: u16,
    /// Tool that produced the frame
    pub software: String,
    /// The source scan this frame was cut from
    pub document_name: PathBuf,
    /// Copyright line, if one was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Capture date carried over from the source's EXIF
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<DateTime<Utc>>,
}

/// Writes half-frames to disk with their descriptive tags
pub struct MetadataStamper {
    config: StampConfig,
}

impl MetadataStamper {
    /// Create a stamper with the given identity
    pub fn new(config: StampConfig) -> Self {
        Self { config }
    }

    /// Build the tag set for a frame cut from `source`.
    pub fn tags_for(&self, frame: &ValidatedFrame, source: &Path) -> FrameTags {
        let (width, height) = frame.image.dimensions();
        let source_meta = extract_metadata(source);

        FrameTags {
            make: self.config.make.clone(),
            model: self.config.model.clone(),
            orientation: 1,
            software: self.config.software.clone(),
            document_name: source.to_path_buf(),
            copyright: self.config.copyright.clone(),
            width,
            height,
            date_taken: source_meta.date_taken,
        }
    }

    /// Persist a validated frame to `output_path` and write its sidecar.
    ///
    /// Returns the tags that were attached.
    pub fn stamp(
        &self,
        frame: &ValidatedFrame,
        source: &Path,
        output_path: &Path,
    ) -> Result<FrameTags, StampError> {
        frame
            .image
            .save(output_path)
            .map_err(|source| StampError::Encode {
                path: output_path.to_path_buf(),
                source,
            })?;

        let tags = self.tags_for(frame, source);

        let sidecar_path = output_path.with_extension("json");
        let json = serde_json::to_string_pretty(&tags)?;
        std::fs::write(&sidecar_path, json).map_err(|source| StampError::WriteTags {
            path: sidecar_path.clone(),
            source,
        })?;

        debug!(frame = %output_path.display(), sidecar = %sidecar_path.display(), "frame stamped");

        Ok(tags)
    }
}

impl Default for MetadataStamper {
    fn default() -> Self {
        Self::new(StampConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::splitter::FrameSide;
    use image::{DynamicImage, ImageBuffer, Rgb};
    use tempfile::TempDir;

    fn test_frame(side: FrameSide) -> ValidatedFrame {
        let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(120, 180, Rgb([200, 200, 200]));
        ValidatedFrame {
            side,
            image: DynamicImage::ImageRgb8(buffer),
            mean_intensity: 200.0,
        }
    }

    #[test]
    fn tags_carry_identity_and_dimensions() {
        let stamper = MetadataStamper::default();
        let frame = test_frame(FrameSide::A);

        let tags = stamper.tags_for(&frame, Path::new("/scans/0001.jpg"));

        assert_eq!(tags.make, "Alfie Cameras");
        assert_eq!(tags.model, "TYCH");
        assert_eq!(tags.orientation, 1);
        assert_eq!(tags.document_name, PathBuf::from("/scans/0001.jpg"));
        assert_eq!(tags.width, 120);
        assert_eq!(tags.height, 180);
        assert!(tags.copyright.is_none());
    }

    #[test]
    fn copyright_is_carried_when_supplied() {
        let config = StampConfig {
            copyright: Some("Jane Doe, 2026".to_string()),
            ..Default::default()
        };
        let stamper = MetadataStamper::new(config);
        let frame = test_frame(FrameSide::B);

        let tags = stamper.tags_for(&frame, Path::new("/scans/0001.jpg"));
        assert_eq!(tags.copyright.as_deref(), Some("Jane Doe, 2026"));
    }

    #[test]
    fn stamp_writes_frame_and_sidecar() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("0001-a.jpg");

        let stamper = MetadataStamper::default();
        let frame = test_frame(FrameSide::A);

        let tags = stamper
            .stamp(&frame, Path::new("/scans/0001.jpg"), &output_path)
            .unwrap();

        assert!(output_path.exists());

        let sidecar_path = temp_dir.path().join("0001-a.json");
        assert!(sidecar_path.exists());

        let raw = std::fs::read_to_string(&sidecar_path).unwrap();
        let parsed: FrameTags = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.make, tags.make);
        assert_eq!(parsed.width, 120);
        assert!(raw.contains("0001.jpg"));
    }

    #[test]
    fn stamp_fails_on_unwritable_path() {
        let stamper = MetadataStamper::default();
        let frame = test_frame(FrameSide::A);

        let result = stamper.stamp(
            &frame,
            Path::new("/scans/0001.jpg"),
            Path::new("/nonexistent-dir-xyz/0001-a.jpg"),
        );

        assert!(result.is_err());
    }
}

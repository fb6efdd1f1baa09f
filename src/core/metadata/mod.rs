//! # Metadata Module
//!
//! Reads EXIF metadata from source scans so the capture date can travel
//! with the half-frames cut from them.
//!
//! EXIF is typically present in JPEG and TIFF scans; a source without
//! readable EXIF simply contributes no date.

use chrono::{DateTime, NaiveDateTime, Utc};
use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Metadata extracted from a source scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Original capture date/time (DateTimeOriginal)
    pub date_taken: Option<DateTime<Utc>>,
    /// Camera make recorded by the scanner or camera
    pub camera_make: Option<String>,
    /// Camera model recorded by the scanner or camera
    pub camera_model: Option<String>,
}

impl SourceMetadata {
    /// Check if any metadata was extracted
    pub fn has_data(&self) -> bool {
        self.date_taken.is_some() || self.camera_make.is_some() || self.camera_model.is_some()
    }
}

/// Extract EXIF metadata from a source scan.
///
/// Missing files, unreadable containers, and absent fields all degrade to
/// an empty result; metadata is never a reason to skip a frame.
pub fn extract_metadata(path: &Path) -> SourceMetadata {
    let mut metadata = SourceMetadata::default();

    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return metadata,
    };

    let mut bufreader = BufReader::new(&file);
    let exif_reader = match Reader::new().read_from_container(&mut bufreader) {
        Ok(r) => r,
        Err(_) => return metadata,
    };

    if let Some(field) = exif_reader.get_field(Tag::DateTimeOriginal, In::PRIMARY) {
        if let Value::Ascii(ref vec) = field.value {
            if let Some(bytes) = vec.first() {
                if let Ok(s) = std::str::from_utf8(bytes) {
                    // EXIF date format: "YYYY:MM:DD HH:MM:SS"
                    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S") {
                        metadata.date_taken =
                            Some(DateTime::from_naive_utc_and_offset(naive, Utc));
                    }
                }
            }
        }
    }

    if let Some(field) = exif_reader.get_field(Tag::Make, In::PRIMARY) {
        metadata.camera_make = get_string_value(&field.value);
    }

    if let Some(field) = exif_reader.get_field(Tag::Model, In::PRIMARY) {
        metadata.camera_model = get_string_value(&field.value);
    }

    metadata
}

/// Helper to extract string from EXIF ASCII value
fn get_string_value(value: &Value) -> Option<String> {
    if let Value::Ascii(ref vec) = value {
        if let Some(bytes) = vec.first() {
            if let Ok(s) = std::str::from_utf8(bytes) {
                let trimmed = s.trim_end_matches('\0').trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }
    None
}

//! Integration tests for the splitting pipeline.
//!
//! These tests verify end-to-end behavior on real files:
//! - splitting synthetic dual-frame scans into half-frames
//! - ignored-file and processed-image accounting
//! - validity filtering of blank half-frames
//! - contact sheet generation

use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tych_split::core::pipeline::Pipeline;
use tych_split::core::splitter::mean_intensity;

/// Save a synthetic dual-frame scan: two solid exposures around a black
/// separator band at the given offset.
fn write_scan(
    dir: &Path,
    name: &str,
    width: u32,
    band_x: u32,
    band_width: u32,
    left_value: u8,
    right_value: u8,
) -> PathBuf {
    let path = dir.join(name);
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, 300, |x, _| {
        if x < band_x {
            Rgb([left_value; 3])
        } else if x < band_x + band_width {
            Rgb([0, 0, 0])
        } else {
            Rgb([right_value; 3])
        }
    });
    DynamicImage::ImageRgb8(buffer).save(&path).unwrap();
    path
}

#[test]
fn directory_harness_reports_processed_and_ignored_counts() {
    let temp_dir = TempDir::new().unwrap();

    write_scan(temp_dir.path(), "0001.png", 400, 190, 20, 200, 200);
    write_scan(temp_dir.path(), "0002.png", 400, 190, 20, 200, 200);
    write_scan(temp_dir.path(), "0003.png", 400, 190, 20, 200, 200);
    std::fs::write(temp_dir.path().join("notes.txt"), b"roll 12, pushed +1").unwrap();
    std::fs::write(temp_dir.path().join("scanner.log"), b"done").unwrap();

    let pipeline = Pipeline::builder()
        .input(temp_dir.path().to_path_buf())
        .build();

    let result = pipeline.run().unwrap();

    assert_eq!(result.images_processed, 3);
    assert_eq!(result.files_ignored, 2);
    assert_eq!(result.frames_created(), 6);
    assert!(result.errors.is_empty());
}

#[test]
fn round_trip_preserves_frame_intensities() {
    let temp_dir = TempDir::new().unwrap();
    write_scan(temp_dir.path(), "0001.png", 1000, 490, 20, 200, 200);

    let pipeline = Pipeline::builder()
        .input(temp_dir.path().to_path_buf())
        .build();

    let result = pipeline.run().unwrap();
    assert_eq!(result.frames_created(), 2);

    for output in &result.outputs {
        let frame = image::open(output).unwrap();
        // 488 columns each side: full width minus band minus 2px buffers
        assert_eq!(frame.width(), 488);
        assert_eq!(frame.height(), 300);

        // JPEG round-trip tolerance on a solid frame
        let mean = mean_intensity(&frame);
        assert!(
            (mean - 200.0).abs() < 3.0,
            "expected mean near 200, got {} for {:?}",
            mean,
            output
        );
    }
}

#[test]
fn blank_left_half_yields_only_side_b() {
    let temp_dir = TempDir::new().unwrap();
    // Left half mean 40: below the brightness threshold, unexposed film
    write_scan(temp_dir.path(), "0001.png", 1000, 490, 20, 40, 200);

    let pipeline = Pipeline::builder()
        .input(temp_dir.path().to_path_buf())
        .build();

    let result = pipeline.run().unwrap();

    assert_eq!(result.frames_created(), 1);
    assert!(result.outputs[0].ends_with("0001-b.jpg"));
    assert!(result.errors.is_empty());
}

#[test]
fn scan_without_separator_is_skipped_not_failed() {
    let temp_dir = TempDir::new().unwrap();
    // Overexposed: no dark band anywhere
    let path = temp_dir.path().join("0001.png");
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(400, 300, Rgb([220, 220, 220]));
    DynamicImage::ImageRgb8(buffer).save(&path).unwrap();

    let pipeline = Pipeline::builder()
        .input(temp_dir.path().to_path_buf())
        .build();

    let result = pipeline.run().unwrap();

    assert_eq!(result.images_processed, 1);
    assert_eq!(result.frames_created(), 0);
    assert!(result.errors.is_empty());
}

#[test]
fn all_black_scan_yields_zero_frames() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("0001.png");
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(400, 300, Rgb([0, 0, 0]));
    DynamicImage::ImageRgb8(buffer).save(&path).unwrap();

    let pipeline = Pipeline::builder()
        .input(temp_dir.path().to_path_buf())
        .build();

    let result = pipeline.run().unwrap();

    assert_eq!(result.images_processed, 1);
    assert_eq!(result.frames_created(), 0);
}

#[test]
fn frames_get_tag_sidecars() {
    let temp_dir = TempDir::new().unwrap();
    write_scan(temp_dir.path(), "0001.png", 400, 190, 20, 200, 200);

    let pipeline = Pipeline::builder()
        .input(temp_dir.path().to_path_buf())
        .build();

    let result = pipeline.run().unwrap();
    assert_eq!(result.frames_created(), 2);

    for output in &result.outputs {
        let sidecar = output.with_extension("json");
        assert!(sidecar.exists(), "missing sidecar for {:?}", output);

        let raw = std::fs::read_to_string(&sidecar).unwrap();
        assert!(raw.contains("Alfie Cameras"));
        assert!(raw.contains("0001.png"));
    }
}

#[test]
fn contact_sheet_is_written_when_requested() {
    let temp_dir = TempDir::new().unwrap();
    write_scan(temp_dir.path(), "0001.png", 400, 190, 20, 200, 200);
    write_scan(temp_dir.path(), "0002.png", 400, 190, 20, 200, 200);

    let pipeline = Pipeline::builder()
        .input(temp_dir.path().to_path_buf())
        .contact_sheet(true)
        .build();

    let result = pipeline.run().unwrap();

    assert_eq!(result.frames_created(), 4);
    let sheet = result.contact_sheet.expect("contact sheet path");
    assert!(sheet.exists());
    assert!(sheet.ends_with("contact_sheet.png"));

    // The sheet decodes and is larger than a single cell
    let sheet_image = image::open(&sheet).unwrap();
    assert!(sheet_image.width() > 320);
}

#[test]
fn contact_sheet_is_skipped_when_no_frames_exist() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("0001.png");
    let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(400, 300, Rgb([220, 220, 220]));
    DynamicImage::ImageRgb8(buffer).save(&path).unwrap();

    let pipeline = Pipeline::builder()
        .input(temp_dir.path().to_path_buf())
        .contact_sheet(true)
        .build();

    let result = pipeline.run().unwrap();

    assert_eq!(result.frames_created(), 0);
    assert!(result.contact_sheet.is_none());
}

#[test]
fn rerunning_does_not_consume_previous_outputs() {
    let temp_dir = TempDir::new().unwrap();
    write_scan(temp_dir.path(), "0001.png", 400, 190, 20, 200, 200);

    let build = || {
        Pipeline::builder()
            .input(temp_dir.path().to_path_buf())
            .build()
    };

    let first = build().run().unwrap();
    assert_eq!(first.images_processed, 1);

    // The processed/ directory now exists; a second run must not treat the
    // frames inside it as new sources.
    let second = build().run().unwrap();
    assert_eq!(second.images_processed, 1);
    assert_eq!(second.frames_created(), 2);
}

#[test]
fn nonexistent_input_is_an_error() {
    let pipeline = Pipeline::builder()
        .input(PathBuf::from("/nonexistent/path/that/does/not/exist"))
        .build();

    assert!(pipeline.run().is_err());
}

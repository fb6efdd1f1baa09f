//! # Contact Sheet Module
//!
//! Lays the produced half-frames out on a single summary image, the raster
//! equivalent of a darkroom contact sheet: a fixed number of portrait cells
//! per row, padding between cells, a margin around the page.
//!
//! Frames are placed in filename order, so the sheet reads in shooting
//! order left to right, top to bottom.

use image::{imageops, DynamicImage, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::SheetError;

/// Geometry of the contact sheet
#[derive(Debug, Clone, Copy)]
pub struct ContactSheetConfig {
    /// Frames per row
    pub columns: u32,
    /// Width of one cell in pixels; cells are 2:3 portrait
    pub cell_width: u32,
    /// Space between cells in pixels
    pub padding: u32,
    /// Page margin in pixels
    pub margin: u32,
    /// Page background intensity (255 = white)
    pub background: u8,
}

impl Default for ContactSheetConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            cell_width: 320,
            padding: 16,
            margin: 48,
            background: 255,
        }
    }
}

impl ContactSheetConfig {
    /// Cell height for portrait-orientation half-frames
    fn cell_height(&self) -> u32 {
        self.cell_width * 3 / 2
    }
}

/// Compose a contact sheet from the given frame files.
///
/// Returns the path of the written sheet (`contact_sheet.png` in
/// `output_dir`). Frames that fail to decode abort the sheet; they were
/// written by this run and should never be unreadable.
pub fn build_contact_sheet(
    output_dir: &Path,
    frames: &[PathBuf],
    config: &ContactSheetConfig,
) -> Result<PathBuf, SheetError> {
    if frames.is_empty() {
        return Err(SheetError::NoFrames);
    }

    let mut frames: Vec<PathBuf> = frames.to_vec();
    frames.sort();

    let cell_height = config.cell_height();
    let columns = config.columns.max(1);
    let rows = (frames.len() as u32).div_ceil(columns);

    let sheet_width = 2 * config.margin + columns * config.cell_width
        + (columns - 1) * config.padding;
    let sheet_height = 2 * config.margin + rows * cell_height + (rows - 1) * config.padding;

    debug!(rows, columns, sheet_width, sheet_height, "laying out contact sheet");

    let mut sheet = RgbImage::from_pixel(
        sheet_width,
        sheet_height,
        Rgb([config.background, config.background, config.background]),
    );

    for (index, frame_path) in frames.iter().enumerate() {
        let frame = image::open(frame_path).map_err(|source| SheetError::ReadFrame {
            path: frame_path.clone(),
            source,
        })?;

        // Fit inside the cell preserving aspect ratio, centered
        let thumb = frame.thumbnail(config.cell_width, cell_height).to_rgb8();

        let column = index as u32 % columns;
        let row = index as u32 / columns;

        let cell_x = config.margin + column * (config.cell_width + config.padding);
        let cell_y = config.margin + row * (cell_height + config.padding);
        let offset_x = cell_x + (config.cell_width - thumb.width().min(config.cell_width)) / 2;
        let offset_y = cell_y + (cell_height - thumb.height().min(cell_height)) / 2;

        imageops::overlay(&mut sheet, &thumb, offset_x as i64, offset_y as i64);
    }

    let sheet_path = output_dir.join("contact_sheet.png");
    DynamicImage::ImageRgb8(sheet)
        .save(&sheet_path)
        .map_err(|source| SheetError::WriteSheet {
            path: sheet_path.clone(),
            source,
        })?;

    info!(path = %sheet_path.display(), frames = frames.len(), "contact sheet written");

    Ok(sheet_path)
}

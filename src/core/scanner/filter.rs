//! File filtering logic for the scanner.

use super::SourceFormat;
use std::path::Path;

/// Filters files to determine if they are splittable source images
pub struct ImageFilter {
    /// File extensions to include
    extensions: std::collections::HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ImageFilter {
    /// Create a new filter with default supported extensions
    pub fn new() -> Self {
        Self {
            extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
                "tiff".to_string(),
                "tif".to_string(),
            ]
            .into_iter()
            .collect(),
            include_hidden: false,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Override the list of extensions to accept
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions.into_iter().map(|e| e.to_lowercase()).collect();
        self
    }

    /// Check if a file should be split
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            self.extensions.contains(&ext.to_lowercase())
        } else {
            false
        }
    }

    /// Get the source format for a path
    pub fn get_format(&self, path: &Path) -> SourceFormat {
        path.extension()
            .and_then(|e| e.to_str())
            .map(SourceFormat::from_extension)
            .unwrap_or(SourceFormat::Unknown)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}

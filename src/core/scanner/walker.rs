//! Directory walking implementation using walkdir.

use super::{filter::ImageFilter, ScanOutcome, SourceFile, SourceScanner};
use crate::error::ScanError;
use crate::events::{Event, EventSender, ScanEvent};
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone, Default)]
pub struct ScanConfig {
    /// Whether to descend into subdirectories. Film rolls are scanned into
    /// flat directories, so the default is a single level.
    pub recursive: bool,
    /// Whether to include hidden files
    pub include_hidden: bool,
    /// Custom extensions to include (None = use defaults)
    pub extensions: Option<Vec<String>>,
    /// A directory subtree to skip entirely, so a recursive scan never
    /// picks up the frames a previous run wrote
    pub exclude: Option<PathBuf>,
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let mut filter = ImageFilter::new().with_hidden(config.include_hidden);

        if let Some(ref extensions) = config.extensions {
            filter = filter.with_extensions(extensions.clone());
        }

        Self { config, filter }
    }
}

impl SourceScanner for WalkDirScanner {
    fn scan(&self, root: &PathBuf) -> Result<ScanOutcome, ScanError> {
        self.scan_with_events(root, &crate::events::null_sender())
    }

    fn scan_with_events(
        &self,
        root: &PathBuf,
        events: &EventSender,
    ) -> Result<ScanOutcome, ScanError> {
        if !root.exists() {
            return Err(ScanError::DirectoryNotFound { path: root.clone() });
        }
        if !root.is_dir() {
            return Err(ScanError::NotADirectory { path: root.clone() });
        }

        events.send(Event::Scan(ScanEvent::Started { path: root.clone() }));

        let mut images = Vec::new();
        let mut ignored = Vec::new();
        let mut errors = Vec::new();

        let max_depth = if self.config.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root).max_depth(max_depth);

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    let path = entry.path();

                    if path.is_dir() {
                        continue;
                    }

                    if let Some(ref exclude) = self.config.exclude {
                        if path.starts_with(exclude) {
                            continue;
                        }
                    }

                    if !self.filter.should_include(path) {
                        events.send(Event::Scan(ScanEvent::FileIgnored {
                            path: path.to_path_buf(),
                        }));
                        ignored.push(path.to_path_buf());
                        continue;
                    }

                    match fs::metadata(path) {
                        Ok(metadata) => {
                            let source = SourceFile {
                                path: path.to_path_buf(),
                                size: metadata.len(),
                                modified: metadata
                                    .modified()
                                    .unwrap_or(std::time::SystemTime::UNIX_EPOCH),
                                format: self.filter.get_format(path),
                            };

                            events.send(Event::Scan(ScanEvent::ImageFound {
                                path: source.path.clone(),
                            }));

                            images.push(source);
                        }
                        Err(e) => {
                            let error = ScanError::ReadDirectory {
                                path: path.to_path_buf(),
                                source: e,
                            };

                            events.send(Event::Scan(ScanEvent::Error {
                                path: path.to_path_buf(),
                                message: error.to_string(),
                            }));

                            errors.push(error);
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));

                    errors.push(error);
                }
            }
        }

        // Deterministic processing order regardless of directory iteration
        images.sort_by(|a, b| a.path.cmp(&b.path));
        ignored.sort();

        events.send(Event::Scan(ScanEvent::Completed {
            total_images: images.len(),
            total_ignored: ignored.len(),
        }));

        Ok(ScanOutcome {
            images,
            ignored,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::SourceFormat;
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_scan(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        // Minimal JPEG magic; the scanner only looks at extensions
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_finds_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let outcome = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert!(outcome.images.is_empty());
        assert!(outcome.ignored.is_empty());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn scan_finds_single_image() {
        let temp_dir = TempDir::new().unwrap();
        create_test_scan(&temp_dir, "0001.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(outcome.images.len(), 1);
        assert!(outcome.images[0].path.ends_with("0001.jpg"));
        assert_eq!(outcome.images[0].format, SourceFormat::Jpeg);
    }

    #[test]
    fn scan_counts_non_images_as_ignored() {
        let temp_dir = TempDir::new().unwrap();
        create_test_scan(&temp_dir, "0001.jpg");
        create_test_scan(&temp_dir, "0002.jpg");
        create_test_scan(&temp_dir, "0003.jpg");
        File::create(temp_dir.path().join("notes.txt")).unwrap();
        File::create(temp_dir.path().join("index.html")).unwrap();

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(outcome.images.len(), 3);
        assert_eq!(outcome.ignored.len(), 2);
    }

    #[test]
    fn scan_is_not_recursive_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_test_scan(&temp_dir, "root.jpg");

        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        let mut file = File::create(subdir.join("nested.jpg")).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(outcome.images.len(), 1);
        assert!(outcome.images[0].path.ends_with("root.jpg"));
    }

    #[test]
    fn recursive_scan_traverses_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        create_test_scan(&temp_dir, "root.jpg");

        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();
        let mut file = File::create(subdir.join("nested.jpg")).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let config = ScanConfig {
            recursive: true,
            ..Default::default()
        };
        let scanner = WalkDirScanner::new(config);
        let outcome = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(outcome.images.len(), 2);
    }

    #[test]
    fn recursive_scan_skips_excluded_subtree() {
        let temp_dir = TempDir::new().unwrap();
        create_test_scan(&temp_dir, "root.jpg");

        let processed = temp_dir.path().join("processed");
        fs::create_dir(&processed).unwrap();
        let mut file = File::create(processed.join("root-a.jpg")).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let config = ScanConfig {
            recursive: true,
            exclude: Some(processed),
            ..Default::default()
        };
        let scanner = WalkDirScanner::new(config);
        let outcome = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(outcome.images.len(), 1);
        assert!(outcome.images[0].path.ends_with("root.jpg"));
    }

    #[test]
    fn scan_ignores_hidden_files_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_test_scan(&temp_dir, "visible.jpg");
        create_test_scan(&temp_dir, ".hidden.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        assert_eq!(outcome.images.len(), 1);
        assert_eq!(outcome.ignored.len(), 1);
    }

    #[test]
    fn scan_images_are_sorted_by_path() {
        let temp_dir = TempDir::new().unwrap();
        create_test_scan(&temp_dir, "0003.jpg");
        create_test_scan(&temp_dir, "0001.jpg");
        create_test_scan(&temp_dir, "0002.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let outcome = scanner.scan(&temp_dir.path().to_path_buf()).unwrap();

        let names: Vec<_> = outcome
            .images
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["0001.jpg", "0002.jpg", "0003.jpg"]);
    }

    #[test]
    fn scan_nonexistent_directory_returns_error() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&PathBuf::from("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn scan_file_as_root_returns_error() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = create_test_scan(&temp_dir, "0001.jpg");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(&file_path);

        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }
}

//! Pipeline execution implementation.

use crate::core::detector::{self, DetectorConfig};
use crate::core::scanner::{ScanConfig, SourceFile, SourceScanner, WalkDirScanner};
use crate::core::sheet::{self, ContactSheetConfig};
use crate::core::splitter::{self, FrameSide, RegionVerdict, SplitConfig};
use crate::core::stamper::{MetadataStamper, StampConfig};
use crate::error::{ProcessError, SplitterError};
use crate::events::{
    null_sender, DiscardReason, Event, EventSender, FrameEvent, FrameProgress, PipelineEvent,
    PipelinePhase, PipelineSummary,
};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Source images successfully decoded and run through the splitter
    pub images_processed: usize,
    /// Half-frame files created, in sorted order
    pub outputs: Vec<PathBuf>,
    /// Files the scanner skipped
    pub files_ignored: usize,
    /// Per-file errors encountered (non-fatal)
    pub errors: Vec<String>,
    /// Contact sheet path, when one was requested and built
    pub contact_sheet: Option<PathBuf>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    /// Number of half-frame files created
    pub fn frames_created(&self) -> usize {
        self.outputs.len()
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Directory containing source scans
    pub input: PathBuf,
    /// Where frames are written (default: `<input>/processed`)
    pub output_dir: Option<PathBuf>,
    /// Separator detection settings
    pub detector: DetectorConfig,
    /// Cut and validity-filter settings
    pub splitter: SplitConfig,
    /// Scanner settings
    pub scan: ScanConfig,
    /// Whether to compose a contact sheet after splitting
    pub contact_sheet: bool,
    /// Contact sheet geometry
    pub sheet: ContactSheetConfig,
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    stamp: StampConfig,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            stamp: StampConfig::default(),
        }
    }

    /// Set the input directory
    pub fn input(mut self, input: PathBuf) -> Self {
        self.config.input = input;
        self
    }

    /// Override the output directory
    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.config.output_dir = Some(output_dir);
        self
    }

    /// Set separator detection settings
    pub fn detector(mut self, detector: DetectorConfig) -> Self {
        self.config.detector = detector;
        self
    }

    /// Set cut and validity-filter settings
    pub fn splitter(mut self, splitter: SplitConfig) -> Self {
        self.config.splitter = splitter;
        self
    }

    /// Set scanner settings
    pub fn scan_config(mut self, scan: ScanConfig) -> Self {
        self.config.scan = scan;
        self
    }

    /// Set the identity stamped into frame tags
    pub fn stamp(mut self, stamp: StampConfig) -> Self {
        self.stamp = stamp;
        self
    }

    /// Request a contact sheet
    pub fn contact_sheet(mut self, enabled: bool) -> Self {
        self.config.contact_sheet = enabled;
        self
    }

    /// Set contact sheet geometry
    pub fn sheet_config(mut self, sheet: ContactSheetConfig) -> Self {
        self.config.sheet = sheet;
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            config: self.config,
            stamper: MetadataStamper::new(self.stamp),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// What one source image produced
struct SourceOutcome {
    frames: Vec<PathBuf>,
    decode_failed: bool,
    errors: Vec<String>,
}

/// The splitting pipeline
pub struct Pipeline {
    config: PipelineConfig,
    stamper: MetadataStamper,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, SplitterError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(
        &self,
        events: &EventSender,
    ) -> Result<PipelineResult, SplitterError> {
        let start_time = Instant::now();
        let mut errors = Vec::new();

        events.send(Event::Pipeline(PipelineEvent::Started));

        let output_dir = self
            .config
            .output_dir
            .clone()
            .unwrap_or_else(|| self.config.input.join("processed"));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let mut scan_config = self.config.scan.clone();
        scan_config.exclude.get_or_insert_with(|| output_dir.clone());

        let scanner = WalkDirScanner::new(scan_config);
        let scan_outcome = scanner.scan_with_events(&self.config.input, events)?;

        for error in scan_outcome.errors {
            errors.push(error.to_string());
        }

        let images = scan_outcome.images;
        let files_ignored = scan_outcome.ignored.len();
        let total_images = images.len();

        if images.is_empty() {
            let duration_ms = start_time.elapsed().as_millis() as u64;
            events.send(Event::Pipeline(PipelineEvent::Completed {
                summary: PipelineSummary {
                    images_processed: 0,
                    frames_created: 0,
                    files_ignored,
                    duration_ms,
                },
            }));

            return Ok(PipelineResult {
                images_processed: 0,
                outputs: Vec::new(),
                files_ignored,
                errors,
                contact_sheet: None,
                duration_ms,
            });
        }

        std::fs::create_dir_all(&output_dir).map_err(|e| {
            SplitterError::Config(format!(
                "failed to create output directory {}: {}",
                output_dir.display(),
                e
            ))
        })?;

        // Phase 2: Splitting
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Splitting,
        }));

        let completed = AtomicUsize::new(0);

        let outcomes: Vec<SourceOutcome> = images
            .par_iter()
            .map(|source| {
                let outcome = self.process_source(source, &output_dir, events);

                let current_completed = completed.fetch_add(1, Ordering::SeqCst) + 1;
                events.send(Event::Frame(FrameEvent::Progress(FrameProgress {
                    completed: current_completed,
                    total: total_images,
                    current_path: source.path.clone(),
                })));

                outcome
            })
            .collect();

        let images_processed = outcomes.iter().filter(|o| !o.decode_failed).count();

        let mut outputs: Vec<PathBuf> = Vec::new();
        for outcome in outcomes {
            outputs.extend(outcome.frames);
            errors.extend(outcome.errors);
        }
        outputs.sort();

        info!(
            images_processed,
            frames_created = outputs.len(),
            files_ignored,
            "splitting complete"
        );

        // Phase 3: Layout
        let contact_sheet = if self.config.contact_sheet {
            events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
                phase: PipelinePhase::Layout,
            }));

            if outputs.is_empty() {
                warn!("contact sheet requested but no frames were created");
                None
            } else {
                Some(sheet::build_contact_sheet(
                    &output_dir,
                    &outputs,
                    &self.config.sheet,
                )?)
            }
        } else {
            None
        };

        let duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                images_processed,
                frames_created: outputs.len(),
                files_ignored,
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            images_processed,
            outputs,
            files_ignored,
            errors,
            contact_sheet,
            duration_ms,
        })
    }

    /// Process one source scan to completion: decode, detect, cut,
    /// validate both sides, stamp survivors.
    fn process_source(
        &self,
        source: &SourceFile,
        output_dir: &Path,
        events: &EventSender,
    ) -> SourceOutcome {
        events.send(Event::Frame(FrameEvent::Started {
            path: source.path.clone(),
        }));

        let image = match image::open(&source.path) {
            Ok(image) => image,
            Err(e) => {
                // DecodeFailure is fatal for this file only
                let error = ProcessError::Decode {
                    path: source.path.clone(),
                    source: e,
                };
                events.send(Event::Frame(FrameEvent::Error {
                    path: source.path.clone(),
                    message: error.to_string(),
                }));
                return SourceOutcome {
                    frames: Vec::new(),
                    decode_failed: true,
                    errors: vec![error.to_string()],
                };
            }
        };

        let candidate = detector::detect(&image, &self.config.detector);

        match candidate {
            Some(candidate) => events.send(Event::Frame(FrameEvent::SeparatorFound {
                path: source.path.clone(),
                x: candidate.x,
                width: candidate.width,
            })),
            // Zero frames for this source; a documented outcome, not an error
            None => events.send(Event::Frame(FrameEvent::NoSeparator {
                path: source.path.clone(),
            })),
        }

        let split = splitter::split(&image, candidate.as_ref(), &self.config.splitter);

        let stem = source
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "frame".to_string());

        let mut frames = Vec::new();
        let mut frame_errors = Vec::new();

        let regions = [(split.left, FrameSide::A), (split.right, FrameSide::B)];
        for (region, side) in regions {
            match splitter::assess(region, side, &self.config.splitter) {
                RegionVerdict::Absent => {}
                RegionVerdict::Empty => {
                    events.send(Event::Frame(FrameEvent::RegionDiscarded {
                        path: source.path.clone(),
                        side,
                        reason: DiscardReason::Empty,
                    }));
                }
                RegionVerdict::Blank { mean_intensity } => {
                    events.send(Event::Frame(FrameEvent::RegionDiscarded {
                        path: source.path.clone(),
                        side,
                        reason: DiscardReason::Blank { mean_intensity },
                    }));
                }
                RegionVerdict::Valid(frame) => {
                    let output_path =
                        output_dir.join(format!("{}-{}.jpg", stem, side.suffix()));

                    match self.stamper.stamp(&frame, &source.path, &output_path) {
                        Ok(_) => {
                            events.send(Event::Frame(FrameEvent::Written {
                                path: output_path.clone(),
                                side,
                            }));
                            frames.push(output_path);
                        }
                        Err(e) => {
                            let error = SplitterError::Stamp(e);
                            events.send(Event::Frame(FrameEvent::Error {
                                path: source.path.clone(),
                                message: error.to_string(),
                            }));
                            frame_errors.push(error.to_string());
                        }
                    }
                }
            }
        }

        SourceOutcome {
            frames,
            decode_failed: false,
            errors: frame_errors,
        }
    }
}

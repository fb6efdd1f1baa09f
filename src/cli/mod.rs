//! # CLI Module
//!
//! Command-line interface for the half-frame splitter.
//!
//! ## Usage
//! ```bash
//! # Split every scan in a directory
//! tych-split process ~/Scans/roll-12
//!
//! # With a contact sheet and a copyright line
//! tych-split process ~/Scans/roll-12 --with-contact-sheet --copyright "Jane Doe, 2026"
//!
//! # Tune the thresholds
//! tych-split process ~/Scans/roll-12 --brightness-threshold 80 --darkness-threshold 20
//!
//! # JSON output
//! tych-split process ~/Scans/roll-12 --output json
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;
use tych_split::core::detector::DetectorConfig;
use tych_split::core::pipeline::{Pipeline, PipelineResult};
use tych_split::core::scanner::ScanConfig;
use tych_split::core::splitter::SplitConfig;
use tych_split::core::stamper::StampConfig;
use tych_split::error::Result;
use tych_split::events::{Event, EventChannel, FrameEvent, PipelineEvent, ScanEvent};

/// TYCH Split - cut scanned half-frame photos at the separator bar
#[derive(Parser, Debug)]
#[command(name = "tych-split")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split every scan in a directory into half-frames
    Process {
        /// Directory containing the source scans
        directory: PathBuf,

        /// Where to write the half-frames (default: <directory>/processed)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Also compose a contact sheet of the produced frames
        #[arg(long)]
        with_contact_sheet: bool,

        /// Descend into subdirectories
        #[arg(long)]
        recursive: bool,

        /// Include hidden files
        #[arg(long)]
        include_hidden: bool,

        /// Copyright line stamped into each frame's tags
        #[arg(long)]
        copyright: Option<String>,

        /// Minimum mean intensity for a region to count as content (0-255)
        #[arg(long, default_value = "91.0")]
        brightness_threshold: f64,

        /// Maximum intensity treated as "black" when finding the separator (0-255)
        #[arg(long, default_value = "15")]
        darkness_threshold: u8,

        /// Pixels trimmed from each frame at the separator edge
        #[arg(long, default_value = "2")]
        buffer: u32,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (created frame paths only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    tych_split::init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            directory,
            output_dir,
            with_contact_sheet,
            recursive,
            include_hidden,
            copyright,
            brightness_threshold,
            darkness_threshold,
            buffer,
            output,
            verbose,
        } => {
            let detector = DetectorConfig {
                darkness_threshold,
                ..Default::default()
            };
            let splitter = SplitConfig {
                buffer,
                brightness_threshold,
            };
            let scan = ScanConfig {
                recursive,
                include_hidden,
                ..Default::default()
            };
            let stamp = StampConfig {
                copyright,
                ..Default::default()
            };

            let mut builder = Pipeline::builder()
                .input(directory)
                .detector(detector)
                .splitter(splitter)
                .scan_config(scan)
                .stamp(stamp)
                .contact_sheet(with_contact_sheet);

            if let Some(output_dir) = output_dir {
                builder = builder.output_dir(output_dir);
            }

            run_process(builder.build(), output, verbose)
        }
    }
}

fn run_process(pipeline: Pipeline, output: OutputFormat, verbose: bool) -> Result<()> {
    let term = Term::stderr();

    // Print header
    if matches!(output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("TYCH Split").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    // Set up event handling
    let (sender, receiver) = EventChannel::new();

    // Progress bar for pretty output
    let progress = if matches!(output, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let verbose_clone = verbose;

    // Handle events in a separate thread
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            match event {
                Event::Pipeline(PipelineEvent::PhaseChanged { phase }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_message(format!("{}", phase));
                    }
                }
                Event::Scan(ScanEvent::Completed { total_images, .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_length(total_images as u64);
                    }
                }
                Event::Frame(FrameEvent::Progress(p)) => {
                    if let Some(ref pb) = progress_clone {
                        pb.set_position(p.completed as u64);
                        if verbose_clone {
                            pb.set_message(
                                p.current_path
                                    .file_name()
                                    .unwrap_or_default()
                                    .to_string_lossy()
                                    .to_string(),
                            );
                        }
                    }
                }
                Event::Frame(FrameEvent::NoSeparator { path }) => {
                    if verbose_clone {
                        if let Some(ref pb) = progress_clone {
                            pb.println(format!(
                                "  no separator in {}",
                                path.file_name().unwrap_or_default().to_string_lossy()
                            ));
                        }
                    }
                }
                Event::Pipeline(PipelineEvent::Completed { .. }) => {
                    if let Some(ref pb) = progress_clone {
                        pb.finish_and_clear();
                    }
                }
                _ => {}
            }
        }
    });

    // Run the pipeline
    let result = pipeline.run_with_events(&sender)?;

    // Drop sender to signal event thread to finish
    drop(sender);
    event_thread.join().ok();

    // Output results
    match output {
        OutputFormat::Pretty => print_pretty_results(&term, &result, verbose),
        OutputFormat::Json => print_json_results(&result),
        OutputFormat::Minimal => print_minimal_results(&result),
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &PipelineResult, verbose: bool) {
    term.write_line("").ok();
    term.write_line(&format!("{} Split Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    // Summary
    term.write_line(&format!(
        "  {} images processed in {:.1}s",
        style(result.images_processed).cyan(),
        result.duration_ms as f64 / 1000.0
    ))
    .ok();

    term.write_line(&format!(
        "  {} half-frames created",
        style(result.frames_created()).cyan()
    ))
    .ok();

    term.write_line(&format!(
        "  {} files ignored",
        style(result.files_ignored).cyan()
    ))
    .ok();

    if !result.errors.is_empty() {
        term.write_line(&format!(
            "  {} files with errors",
            style(result.errors.len()).red()
        ))
        .ok();
        for error in &result.errors {
            term.write_line(&format!("    {} {}", style("!").red(), style(error).dim()))
                .ok();
        }
    }

    term.write_line("").ok();

    if verbose && !result.outputs.is_empty() {
        term.write_line(&format!("{}", style("Created frames:").bold().underlined()))
            .ok();
        for path in &result.outputs {
            term.write_line(&format!("  {}", path.display())).ok();
        }
        term.write_line("").ok();
    }

    if let Some(ref sheet) = result.contact_sheet {
        term.write_line(&format!(
            "  {} contact sheet: {}",
            style("▦").cyan(),
            sheet.display()
        ))
        .ok();
        term.write_line("").ok();
    }

    if result.frames_created() == 0 {
        term.write_line(&format!(
            "{}",
            style("No half-frames were created. Overexposed or separator-less scans yield zero frames.")
                .dim()
        ))
        .ok();
    }
}

fn print_json_results(result: &PipelineResult) {
    let output = serde_json::json!({
        "images_processed": result.images_processed,
        "frames_created": result.frames_created(),
        "files_ignored": result.files_ignored,
        "duration_ms": result.duration_ms,
        "outputs": result.outputs,
        "errors": result.errors,
        "contact_sheet": result.contact_sheet,
    });

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}

fn print_minimal_results(result: &PipelineResult) {
    for path in &result.outputs {
        println!("{}", path.display());
    }
}

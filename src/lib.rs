//! # TYCH Split
//!
//! Splits scanned half-frame film photos into two separate images by
//! locating and removing the black separator bar between the exposures.
//!
//! ## Core Philosophy
//! - **Skip, don't fail** - a scan with no separator yields zero frames, not an error
//! - **Explicit outcomes** - zero, one, or two frames per scan, stated in the types
//! - **Count everything** - processed, created, and ignored files are all reported
//!
//! ## Architecture
//! The library is split into a core engine (GUI-agnostic) and presentation layers:
//! - `core` - the frame-splitting engine
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - user-friendly error types
//! - `cli` - command-line interface

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SplitterError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}

//! # Pipeline Module
//!
//! Orchestrates the full splitting workflow.
//!
//! ## Pipeline Stages
//! 1. **Scan** - discover source images in the input directory
//! 2. **Split** - per image: decode, detect the separator, cut, validate, stamp
//! 3. **Layout** - optionally compose the contact sheet
//!
//! ## Parallelism
//! Images carry no shared state, so the split stage fans out across CPU
//! cores with rayon; each source is still processed to completion
//! (detect, split, validate, persist) before its slot is reused.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineResult};

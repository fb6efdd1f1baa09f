//! # tych-split CLI
//!
//! Command-line interface for the half-frame splitter.
//!
//! ## Usage
//! ```bash
//! tych-split process ~/Scans --with-contact-sheet
//! tych-split process ~/Scans --copyright "Jane Doe, 2026" --output json
//! ```

mod cli;

use tych_split::Result;

fn main() -> Result<()> {
    cli::run()
}

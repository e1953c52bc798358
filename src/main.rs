//! # csv-eda
//!
//! Command-line entry point.
//!
//! ```text
//! main()
//!   │
//!   ├─> Parse CLI arguments (clap)
//!   ├─> Install the tracing subscriber (stderr)
//!   └─> Run `overview` or `report`
//! ```
//!
//! ```bash
//! csv-eda overview data.csv --sep ';'
//! csv-eda report data.csv --out-dir reports --title "Customers"
//! ```

#![expect(clippy::print_stdout)]

mod cli;

use anyhow::Result;
use clap::Parser as _;

/// # Errors
///
/// Returns the first error of the command; anyhow prints it with its context
/// and the process exits non-zero.
fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    csv_eda::logging::init(cli.verbose)?;
    cli::run_command(cli.command)
}

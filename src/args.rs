//! src/args.rs
//!
//! Purpose:
//!   Define the command-line interface for seedcrawl using `clap`'s derive
//!   API. The crawler takes exactly two positional arguments: the number
//!   of worker tasks and the path to the URL list.

use clap::Parser;

/// Top-level CLI configuration for seedcrawl.
///
/// The `#[derive(Parser)]` attribute instructs `clap` to generate the
/// argument parsing logic for this struct; `author`, `version`, and
/// `about` feed `--help` and `--version`.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Number of concurrent crawl workers (at least 1).
    ///
    /// This is a *positional* argument — no flag is required. Each worker
    /// repeatedly pops one URL from the shared queue and runs it through
    /// the full pipeline; the pool exits when the queue is empty.
    pub num_threads: usize,

    /// Path to the input file: UTF-8 text, one URL per line.
    ///
    /// Lines are trimmed of surrounding whitespace. Blank lines are kept
    /// and simply fail URL parsing later, so they still show up in the
    /// extracted-URL count.
    pub input: String,
}

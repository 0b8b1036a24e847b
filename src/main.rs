//! src/main.rs
//!
//! Entry point for the seedcrawl binary.
//!
//! Responsibilities of this file:
//!   1) Parse command-line arguments into a typed `Args` struct (via `clap`).
//!   2) Validate the worker count (must be at least 1).
//!   3) Start the crawl and return any fatal error to the OS.
//!
//! Notes:
//!   - We use Tokio's multi-thread runtime so the worker tasks and the
//!     stats reporter actually run in parallel across OS threads.
//!   - `main` returns `Result<(), CrawlerError>` so we can bubble up
//!     failures cleanly; an `Err` becomes a non-zero process exit.

use clap::Parser;
use seedcrawl::args::Args;
use seedcrawl::crawler;
use seedcrawl::error::CrawlerError;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), CrawlerError> {
    // Parse the two positional arguments into a strongly-typed struct.
    // Example CLI:
    //   seedcrawl 32 urls.txt
    let args: Args = Args::parse();

    // The pool needs at least one worker; zero is a usage error, and we
    // want to fail before touching the input file.
    if args.num_threads < 1 {
        return Err(CrawlerError::InvalidThreadCount);
    }

    // Kick off the crawl orchestration. This will:
    //   - load the URL list into the work queue,
    //   - spawn the stats reporter and N crawl workers,
    //   - wait for the queue to drain,
    //   - and print the final summary.
    crawler::crawl(&args).await
}

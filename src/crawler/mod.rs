//! src/crawler/mod.rs
//!
//! This module coordinates the whole crawl:
//!   - Load the candidate URL list from disk into the work queue
//!   - Spawn the periodic stats reporter and N crawl workers
//!   - Wait for the workers to drain the queue
//!   - Stop the reporter and print the final summary
//!
//! The heavy lifting is delegated to submodules:
//!   - urlfile.rs : reading and trimming the input lines
//!   - queue.rs   : the mutex-guarded FIFO the workers drain
//!   - dedup.rs   : insert-if-absent host and IP sets
//!   - stats.rs   : the atomic counter bank and the 2-second reporter
//!   - http.rs    : DNS, the HTTP/1.0 client, and the bounded reader
//!   - links.rs   : counting anchors on fetched pages
//!   - worker.rs  : the per-URL gate pipeline

use crate::args::Args;
use crate::error::CrawlerError;
use std::sync::Arc;
use std::sync::atomic::Ordering::Relaxed;
use std::time::Instant;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

pub mod dedup;
pub mod http;
pub mod links;
pub mod queue;
pub mod stats;
pub mod urlfile;
pub mod worker;

use dedup::DedupSet;
use queue::WorkQueue;
use stats::CounterBank;

/// Everything the workers and the reporter share, behind one `Arc`.
///
/// The queue and each dedup set carry their own mutex; the counters are
/// atomics. A worker therefore never holds more than one lock at a time,
/// and no lock is ever held across an await.
pub struct CrawlerState {
    pub queue: WorkQueue,
    pub seen_hosts: DedupSet,
    pub seen_ips: DedupSet,
    pub counters: CounterBank,
}

impl CrawlerState {
    pub fn new(urls: Vec<String>, num_workers: usize) -> Self {
        Self {
            queue: WorkQueue::new(urls),
            seen_hosts: DedupSet::new(),
            seen_ips: DedupSet::new(),
            counters: CounterBank::new(num_workers),
        }
    }
}

/// Run the full crawl for the parsed CLI arguments.
///
/// Returns:
///   - Ok(()) after the queue is drained and the summary is printed
///   - Err(CrawlerError) on a fatal setup error (input file) or when a
///     spawned task fails to join (panic)
pub async fn crawl(args: &Args) -> Result<(), CrawlerError> {
    // 1) Load the URL list. Any I/O error here is fatal: no crawl work
    //    has started yet and an empty run would just print zeros.
    let urls = urlfile::read_urls(&args.input)?;

    // 2) Build the shared state and the reporter's shutdown signal.
    let state = Arc::new(CrawlerState::new(urls, args.num_threads));
    let shutdown = Arc::new(Notify::new());

    // 3) Spawn the reporter first so the run clock starts before any
    //    worker can pop a URL, then the N workers.
    let start = Instant::now();
    let reporter: JoinHandle<()> = tokio::spawn(stats::report_loop(
        Arc::clone(&state),
        Arc::clone(&shutdown),
        start,
    ));

    let mut workers: Vec<JoinHandle<()>> = Vec::with_capacity(args.num_threads);
    for _ in 0..args.num_threads {
        workers.push(tokio::spawn(worker::run(Arc::clone(&state))));
    }

    // 4) Wait for every worker to run the queue dry. A join error means
    //    a worker panicked; bubble it up so the process exits non-zero.
    for handle in workers {
        handle.await?;
    }

    // 5) The workers never observe the shutdown signal — queue
    //    exhaustion already stopped them. The reporter does.
    shutdown.notify_one();
    reporter.await?;

    // 6) Final summary against total elapsed time.
    print_summary(&state, start.elapsed().as_secs_f64());

    Ok(())
}

/// The six fixed summary lines. The DNS line reports unique hosts (every
/// admitted host gets exactly one lookup attempt) and the robots line
/// reports unique IPs (every admitted IP gets exactly one probe).
fn print_summary(state: &CrawlerState, total_secs: f64) {
    let c = &state.counters;

    let extracted = c.extracted_urls.load(Relaxed);
    let hosts = c.unique_hosts.load(Relaxed);
    let ips = c.unique_ips.load(Relaxed);
    let crawled = c.pages_crawled.load(Relaxed);
    let links = c.total_links.load(Relaxed);
    let bytes = c.total_bytes.load(Relaxed);

    println!(
        "Extracted {} URLs @ {:.0}/s",
        extracted,
        extracted as f64 / total_secs
    );
    println!(
        "Looked up {} DNS names @ {:.0}/s",
        hosts,
        hosts as f64 / total_secs
    );
    println!(
        "Attempted {} site robots @ {:.0}/s",
        ips,
        ips as f64 / total_secs
    );
    println!(
        "Crawled {} pages @ {:.0}/s ({:.2} MB)",
        crawled,
        crawled as f64 / total_secs,
        bytes as f64 / (1024.0 * 1024.0)
    );
    println!(
        "Parsed {} links @ {:.0}/s",
        links,
        links as f64 / total_secs
    );
    println!(
        "HTTP codes: 2xx = {}, 3xx = {}, 4xx = {}, 5xx = {}, other = {}",
        c.http_2xx.load(Relaxed),
        c.http_3xx.load(Relaxed),
        c.http_4xx.load(Relaxed),
        c.http_5xx.load(Relaxed),
        c.http_other.load(Relaxed)
    );
}

//! src/crawler/stats.rs
//!
//! The process-wide counter bank and the periodic stats reporter.
//!
//! Counters are plain atomics bumped in place at each pipeline gate; no
//! ordering between counters is needed because the per-URL inequalities
//! (hosts ≤ extracted, dns ≤ hosts, …) hold along each worker's own
//! path. The reporter samples them every two seconds on its own task and
//! wakes early when the orchestrator signals shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering::Relaxed};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio::time::sleep;

use super::CrawlerState;

/// Monotonically non-decreasing statistics for one crawl run, shared by
/// every worker and the reporter through an `Arc`.
pub struct CounterBank {
    /// URLs dequeued (valid or not).
    pub extracted_urls: AtomicU64,
    /// Distinct hosts admitted by the host gate.
    pub unique_hosts: AtomicU64,
    /// Successful DNS resolutions.
    pub dns_lookups: AtomicU64,
    /// Distinct IPs admitted by the IP gate.
    pub unique_ips: AtomicU64,
    /// Completed `HEAD /robots.txt` probes.
    pub robots_checked: AtomicU64,
    /// Probes whose status admitted the page fetch.
    pub robots_passed: AtomicU64,
    /// Page responses fully received.
    pub pages_crawled: AtomicU64,
    /// Links extracted across all 2xx pages.
    pub total_links: AtomicU64,
    /// Bytes received across completed fetches (robots and pages).
    pub total_bytes: AtomicU64,
    pub http_2xx: AtomicU64,
    pub http_3xx: AtomicU64,
    pub http_4xx: AtomicU64,
    pub http_5xx: AtomicU64,
    pub http_other: AtomicU64,
    /// Workers not yet exited; reaches 0 when the queue is drained.
    pub active_workers: AtomicUsize,
}

impl CounterBank {
    pub fn new(num_workers: usize) -> Self {
        Self {
            extracted_urls: AtomicU64::new(0),
            unique_hosts: AtomicU64::new(0),
            dns_lookups: AtomicU64::new(0),
            unique_ips: AtomicU64::new(0),
            robots_checked: AtomicU64::new(0),
            robots_passed: AtomicU64::new(0),
            pages_crawled: AtomicU64::new(0),
            total_links: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            http_2xx: AtomicU64::new(0),
            http_3xx: AtomicU64::new(0),
            http_4xx: AtomicU64::new(0),
            http_5xx: AtomicU64::new(0),
            http_other: AtomicU64::new(0),
            active_workers: AtomicUsize::new(num_workers),
        }
    }

    /// Bump the status-class tally for one completed page fetch. The sum
    /// of the five class counters always equals `pages_crawled`.
    pub fn classify_status(&self, status: u16) {
        if (200..300).contains(&status) {
            self.http_2xx.fetch_add(1, Relaxed);
        } else if (300..400).contains(&status) {
            self.http_3xx.fetch_add(1, Relaxed);
        } else if (400..500).contains(&status) {
            self.http_4xx.fetch_add(1, Relaxed);
        } else if (500..600).contains(&status) {
            self.http_5xx.fetch_add(1, Relaxed);
        } else {
            self.http_other.fetch_add(1, Relaxed);
        }
    }
}

/// Periodic reporter task: one compact status line plus a pps/Mbps delta
/// line every two seconds, until the orchestrator signals `shutdown`.
///
/// `start` anchors elapsed time for the whole run; deltas are computed
/// against the previous tick, not against the run start.
pub(crate) async fn report_loop(state: Arc<CrawlerState>, shutdown: Arc<Notify>, start: Instant) {
    let mut last_tick = start;
    let mut last_crawled: u64 = 0;
    let mut last_bytes: u64 = 0;

    loop {
        // Wait out the 2-second tick, but wake immediately on shutdown so
        // the final summary is not delayed by a partial tick.
        tokio::select! {
            _ = shutdown.notified() => break,
            _ = sleep(Duration::from_secs(2)) => {}
        }

        print_status_line(&state, start);

        let now = Instant::now();
        let elapsed = now.duration_since(last_tick).as_secs_f64();

        let crawled = state.counters.pages_crawled.load(Relaxed);
        let bytes = state.counters.total_bytes.load(Relaxed);

        let pps = (crawled - last_crawled) as f64 / elapsed;
        let mbps = ((bytes - last_bytes) as f64 * 8.0) / (elapsed * 1024.0 * 1024.0);

        println!("     *** crawling {:.1} pps @ {:.1} Mbps", pps, mbps);

        last_crawled = crawled;
        last_bytes = bytes;
        last_tick = now;
    }
}

/// One compact sample of every counter, in the fixed-width layout the
/// run log is grepped by.
fn print_status_line(state: &CrawlerState, start: Instant) {
    let c = &state.counters;
    println!(
        "[{:3}] {:3} Q {:7} E {:7} H {:6} D {:5} I {:5} R {:5} C {:5} L {:4}K",
        start.elapsed().as_secs(),
        c.active_workers.load(Relaxed),
        state.queue.len(),
        c.extracted_urls.load(Relaxed),
        c.unique_hosts.load(Relaxed),
        c.dns_lookups.load(Relaxed),
        c.unique_ips.load(Relaxed),
        c.robots_passed.load(Relaxed),
        c.pages_crawled.load(Relaxed),
        c.total_links.load(Relaxed) / 1000,
    );
}

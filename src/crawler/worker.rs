//! src/crawler/worker.rs
//!
//! One crawl worker: pop a URL, walk it through the gates, update the
//! counters, repeat until the queue is empty.
//!
//! Failure semantics are uniform across the pipeline: every stage either
//! admits the URL to the next stage or silently discards it. There are
//! no retries and no per-URL logging — a failed URL is visible only as
//! the difference between consecutive gate counters.

use std::sync::Arc;
use std::sync::atomic::Ordering::Relaxed;

use super::CrawlerState;
use super::http::{self, HttpClient, PAGE_BYTE_LIMIT, ROBOTS_BYTE_LIMIT};
use super::links::LinkExtractor;
use crate::url;

/// Worker task body. Each worker owns its HTTP client (socket + receive
/// buffer) and its link extractor; only the queue, the dedup sets, and
/// the counters are shared.
pub async fn run(state: Arc<CrawlerState>) {
    let extractor = LinkExtractor::new();
    let mut client = HttpClient::new();
    let counters = &state.counters;

    while let Some(raw_url) = state.queue.try_pop() {
        counters.extracted_urls.fetch_add(1, Relaxed);

        // 1) Parse. Malformed lines (including blanks) die here.
        let Some(parsed) = url::parse(&raw_url) else {
            continue;
        };

        // 2) Host gate: only the first worker to present this host
        //    proceeds; every later URL on the same host is dropped.
        if !state.seen_hosts.check_and_insert(&parsed.host) {
            continue;
        }
        counters.unique_hosts.fetch_add(1, Relaxed);

        // 3) DNS, first A record.
        let Ok(ip) = http::resolve_ipv4(&parsed.host, parsed.port).await else {
            continue;
        };
        counters.dns_lookups.fetch_add(1, Relaxed);

        // 4) IP gate, keyed on the dotted-decimal form. Virtual hosts
        //    sharing an address collapse to one crawl.
        if !state.seen_ips.check_and_insert(&ip.to_string()) {
            continue;
        }
        counters.unique_ips.fetch_add(1, Relaxed);

        // 5) Robots probe on a fresh connection.
        if client.connect(ip, parsed.port).await.is_err() {
            continue;
        }
        if client.send(&parsed.host, "/robots.txt", "HEAD").await.is_err() {
            continue;
        }
        let Ok(robots) = client.receive(ROBOTS_BYTE_LIMIT).await else {
            continue;
        };
        counters.robots_checked.fetch_add(1, Relaxed);

        // A definite 4xx means robots.txt exists and may restrict us;
        // any other status (including 5xx and unparsable) admits the page.
        if (400..500).contains(&robots.status()) {
            continue;
        }
        counters.robots_passed.fetch_add(1, Relaxed);

        // 6) Page fetch, again on a fresh connection.
        if client.connect(ip, parsed.port).await.is_err() {
            continue;
        }
        if client.send(&parsed.host, &parsed.path, "GET").await.is_err() {
            continue;
        }
        let Ok(page) = client.receive(PAGE_BYTE_LIMIT).await else {
            continue;
        };

        counters.total_bytes.fetch_add(page.len() as u64, Relaxed);
        counters.classify_status(page.status());

        // 7) Links are only extracted from successful pages, and only
        //    when the header terminator was actually received.
        if (200..300).contains(&page.status()) {
            if let Some(body) = page.body() {
                let base = format!("http://{}", parsed.host);
                let links = extractor.count_links(body, &base);
                counters.total_links.fetch_add(links, Relaxed);
            }
        }

        counters.pages_crawled.fetch_add(1, Relaxed);
    }

    counters.active_workers.fetch_sub(1, Relaxed);
}

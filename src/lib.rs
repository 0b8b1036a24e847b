//! Seeded HTTP crawler.
//!
//! `seedcrawl` drains a pre-materialized list of candidate URLs through a
//! politeness/deduplication pipeline (parse → host gate → DNS → IP gate →
//! robots probe → page fetch → link count) and reports aggregate
//! statistics. The queue is one-shot: extracted links are counted, never
//! re-enqueued.

pub mod args;     // CLI definition (parse positional args)
pub mod crawler;  // Orchestrates the queue, worker pool, reporter, and summary
pub mod error;    // Central application error type (`CrawlerError`)
pub mod url;      // Strict http URL parsing

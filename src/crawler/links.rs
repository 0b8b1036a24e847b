//! src/crawler/links.rs
//!
//! HTML link extraction. The pipeline only consumes the link COUNT — the
//! crawl is seeded, not recursive, so extracted links are tallied and
//! then dropped, never enqueued.

use scraper::{Html, Selector};
use url::Url;

/// Counts the anchors of a page that resolve to real link targets.
///
/// Owned by one worker (the selector is compiled once per worker, the
/// document is parsed per page).
pub struct LinkExtractor {
    anchor: Selector,
}

impl LinkExtractor {
    pub fn new() -> Self {
        Self {
            anchor: Selector::parse("a[href]").unwrap(),
        }
    }

    /// Parse `body` as an HTML document and count the `<a href>` elements
    /// whose href joins cleanly against `base` (e.g. `http://host`).
    ///
    /// Non-UTF-8 bytes are replaced rather than rejected — real pages are
    /// frequently mislabeled or binary, and a garbage page simply yields
    /// few or zero countable links.
    pub fn count_links(&self, body: &[u8], base: &str) -> u64 {
        let Ok(base) = Url::parse(base) else {
            return 0;
        };

        let html = String::from_utf8_lossy(body);
        let document = Html::parse_document(&html);

        document
            .select(&self.anchor)
            .filter_map(|anchor| anchor.value().attr("href"))
            .filter(|href| base.join(href).is_ok())
            .count() as u64
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

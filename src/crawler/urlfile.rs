//! src/crawler/urlfile.rs
//!
//! Loads the candidate URL list: one URL per line, surrounding
//! whitespace trimmed. Blank lines are kept — they count as extracted
//! URLs and then fail parsing, exactly like any other malformed line.

use crate::error::CrawlerError;
use std::fs::File;
use std::io::{BufRead, BufReader};

pub fn read_urls(path: &str) -> Result<Vec<String>, CrawlerError> {
    let file = File::open(path)?;
    let size = file.metadata()?.len();
    println!("Opened {} with size {}", path, size);

    let reader = BufReader::new(file);
    let mut out: Vec<String> = Vec::new();

    for line_result in reader.lines() {
        match line_result {
            Ok(line) => out.push(line.trim().to_string()),
            Err(e) => {
                // Stop on the first I/O error
                return Err(CrawlerError::from(e));
            }
        }
    }

    Ok(out)
}

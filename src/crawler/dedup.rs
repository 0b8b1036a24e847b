//! src/crawler/dedup.rs
//!
//! Insert-if-absent sets backing the host and IP gates. Entries are
//! created by the first worker to present a key and never removed, so
//! for any key at most one worker ever proceeds past the gate.

use std::collections::HashSet;
use std::sync::Mutex;

/// A thread-safe set with atomic check-and-insert.
///
/// The crawler holds two independent instances (seen hosts, seen IPs),
/// each with its own mutex; the mutex covers the whole check-and-insert
/// so workers never observe partial state.
pub struct DedupSet {
    inner: Mutex<HashSet<String>>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashSet::new()),
        }
    }

    /// Returns `true` iff `key` was not previously present; the key is
    /// inserted atomically with the check.
    pub fn check_and_insert(&self, key: &str) -> bool {
        self.inner.lock().unwrap().insert(key.to_string())
    }
}

impl Default for DedupSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_insert_wins() {
        let set = DedupSet::new();
        assert!(set.check_and_insert("example.test"));
        assert!(!set.check_and_insert("example.test"));
        assert!(set.check_and_insert("other.test"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        let set = DedupSet::new();
        assert!(set.check_and_insert("Example.test"));
        assert!(set.check_and_insert("example.test"));
    }

    #[test]
    fn exactly_one_thread_wins_each_key() {
        let set = Arc::new(DedupSet::new());
        let mut handles = Vec::new();

        for _ in 0..8 {
            let set = Arc::clone(&set);
            handles.push(std::thread::spawn(move || {
                let mut wins = 0usize;
                for i in 0..100 {
                    if set.check_and_insert(&format!("host-{i}")) {
                        wins += 1;
                    }
                }
                wins
            }));
        }

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 100);
    }
}

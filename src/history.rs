//! A bounded, insertion-ordered log of previously accepted input lines.
//!
//! Entries are raw text, not parsed commands: recalling an entry re-tokenizes
//! it from scratch, so a stored pipeline replays as a full pipeline. The store
//! lives for the session only; nothing is persisted across runs.

use std::collections::VecDeque;

/// Maximum number of lines the session history retains.
pub const HISTORY_MAXITEMS: usize = 100;

/// Fixed-capacity FIFO of input lines, oldest first.
///
/// Indices are positions, not identities: once the oldest entry is evicted to
/// make room, every surviving entry shifts down by one, so index 0 always
/// names the oldest line currently stored.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    /// A history bounded at [`HISTORY_MAXITEMS`] entries.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_MAXITEMS)
    }

    /// A history with a custom bound; used by tests to exercise eviction.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Store one raw input line, evicting the oldest entry when full.
    pub fn record(&mut self, line: &str) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.to_owned());
    }

    /// All entries oldest-to-newest with their current positions.
    pub fn list(&self) -> impl Iterator<Item = (usize, &str)> {
        self.entries.iter().map(String::as_str).enumerate()
    }

    /// Look up an entry by its current position, 0 being the oldest.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_insertion_order() {
        let mut h = History::new();
        h.record("first");
        h.record("second");
        h.record("third");

        let listed: Vec<(usize, &str)> = h.list().collect();
        assert_eq!(listed, vec![(0, "first"), (1, "second"), (2, "third")]);
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn get_is_positional() {
        let mut h = History::new();
        h.record("a");
        h.record("b");
        assert_eq!(h.get(0), Some("a"));
        assert_eq!(h.get(1), Some("b"));
        assert_eq!(h.get(2), None);
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let mut h = History::with_capacity(3);
        h.record("a");
        h.record("b");
        h.record("c");
        h.record("d");

        assert_eq!(h.len(), 3);
        // "a" is gone; the survivors shifted down one position.
        assert_eq!(h.get(0), Some("b"));
        assert_eq!(h.get(1), Some("c"));
        assert_eq!(h.get(2), Some("d"));
        assert_eq!(h.get(3), None);
    }

    #[test]
    fn indices_shift_again_on_further_eviction() {
        let mut h = History::with_capacity(2);
        h.record("a");
        h.record("b");
        h.record("c");
        assert_eq!(h.get(0), Some("b"));
        h.record("d");
        assert_eq!(h.get(0), Some("c"));
        assert_eq!(h.get(1), Some("d"));
    }

    #[test]
    fn clear_empties_the_store() {
        let mut h = History::new();
        h.record("a");
        h.record("b");
        h.clear();

        assert!(h.is_empty());
        assert_eq!(h.list().count(), 0);
        assert_eq!(h.get(0), None);
    }

    #[test]
    fn stores_raw_text_verbatim() {
        let mut h = History::new();
        h.record("echo hi|wc -l");
        assert_eq!(h.get(0), Some("echo hi|wc -l"));
    }
}

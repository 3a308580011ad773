//! Bounded command history with `!!` / `!prefix` recall.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<String>,
    capacity: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Record a command line.
    ///
    /// Empty lines and an immediate repeat of the last entry are ignored.
    /// When full, the oldest entry is evicted.
    pub fn add(&mut self, line: &str) {
        if line.is_empty() || self.capacity == 0 {
            return;
        }
        if self.entries.back().is_some_and(|last| last == line) {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(line.to_string());
    }

    /// Resolve a recall expression.
    ///
    /// `!!` names the most recent entry; `!prefix` the most recent entry
    /// starting with `prefix`. Anything else recalls nothing.
    pub fn recall(&self, expression: &str) -> Option<&str> {
        if expression == "!!" {
            return self.entries.back().map(String::as_str);
        }
        let prefix = expression.strip_prefix('!')?;
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.starts_with(prefix))
            .map(String::as_str)
    }

    /// The last `count` entries paired with their 1-based position.
    ///
    /// `None`, zero or a count beyond the log size all mean the whole log.
    pub fn tail(&self, count: Option<usize>) -> impl Iterator<Item = (usize, &str)> {
        let len = self.entries.len();
        let count = match count {
            Some(n) if n > 0 && n <= len => n,
            _ => len,
        };
        self.entries
            .iter()
            .enumerate()
            .skip(len - count)
            .map(|(i, entry)| (i + 1, entry.as_str()))
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consecutive_duplicates_collapse() {
        let mut h = History::new(10);
        h.add("ls");
        h.add("ls");
        h.add("pwd");
        h.add("ls");
        assert_eq!(h.len(), 3);
        assert_eq!(h.last(), Some("ls"));
    }

    #[test]
    fn test_empty_line_not_recorded() {
        let mut h = History::new(10);
        h.add("");
        assert!(h.is_empty());
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut h = History::new(3);
        for line in ["one", "two", "three", "four"] {
            h.add(line);
        }
        let kept: Vec<_> = h.tail(None).map(|(_, e)| e).collect();
        assert_eq!(kept, ["two", "three", "four"]);
    }

    #[test]
    fn test_recall_last_and_prefix() {
        let mut h = History::new(10);
        h.add("echo one");
        h.add("ls -l");
        h.add("echo two");
        assert_eq!(h.recall("!!"), Some("echo two"));
        assert_eq!(h.recall("!ls"), Some("ls -l"));
        assert_eq!(h.recall("!echo"), Some("echo two"));
        assert_eq!(h.recall("!cat"), None);
        assert_eq!(h.recall("echo"), None);
    }

    #[test]
    fn test_recall_on_empty_history() {
        let h = History::new(10);
        assert_eq!(h.recall("!!"), None);
        assert_eq!(h.recall("!e"), None);
    }

    #[test]
    fn test_tail_clamps_count() {
        let mut h = History::new(10);
        for line in ["a", "b", "c"] {
            h.add(line);
        }
        let last_two: Vec<_> = h.tail(Some(2)).collect();
        assert_eq!(last_two, [(2, "b"), (3, "c")]);
        assert_eq!(h.tail(Some(0)).count(), 3);
        assert_eq!(h.tail(Some(99)).count(), 3);
    }
}

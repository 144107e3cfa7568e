//! Command history for up/down navigation.
//!
//! Append-only with duplicate-adjacent suppression. The cursor is an index
//! in `[0, len]`: `len` means "past the newest entry" (the editor shows its
//! own draft there), anything below indexes a stored command.

use std::sync::Arc;

/// Ordered store of submitted commands plus a navigation cursor.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: Vec<Arc<str>>,
    cursor: usize,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command unless it is empty or identical to the newest entry.
    ///
    /// The cursor is reset to `len` in every case, so the next
    /// `navigate_previous` always starts from the newest command.
    pub fn append(&mut self, command: &Arc<str>) {
        let duplicate = self.entries.last().is_some_and(|last| **last == **command);
        if !command.is_empty() && !duplicate {
            self.entries.push(Arc::clone(command));
        }
        self.cursor = self.entries.len();
    }

    /// Moves the cursor one step toward the oldest entry.
    ///
    /// Returns the command at the new position, or `None` when the cursor
    /// was already at the oldest entry (clamped, no visual change).
    pub fn navigate_previous(&mut self) -> Option<Arc<str>> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor).cloned()
    }

    /// Moves the cursor one step toward the newest entry.
    ///
    /// Returns the command at the new position; `None` when the cursor
    /// lands past the newest entry (the editor keeps its current buffer).
    pub fn navigate_next(&mut self) -> Option<Arc<str>> {
        if self.cursor >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor).cloned()
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

    fn cmd(text: &str) -> Arc<str> {
        Arc::from(text)
    }

    fn store_with(commands: &[&str]) -> HistoryStore {
        let mut store = HistoryStore::new();
        for c in commands {
            store.append(&cmd(c));
        }
        store
    }

    #[test]
    fn navigate_previous_walks_back_then_clamps() {
        let mut store = store_with(&["a", "b", "c"]);

        assert_eq!(store.navigate_previous().as_deref(), Some("c"));
        assert_eq!(store.navigate_previous().as_deref(), Some("b"));
        assert_eq!(store.navigate_previous().as_deref(), Some("a"));
        // Fourth call: cursor already at 0, no movement, nothing returned.
        assert_eq!(store.navigate_previous(), None);
    }

    #[test]
    fn navigate_next_returns_to_draft_position() {
        let mut store = store_with(&["a", "b"]);

        assert_eq!(store.navigate_previous().as_deref(), Some("b"));
        assert_eq!(store.navigate_previous().as_deref(), Some("a"));
        assert_eq!(store.navigate_next().as_deref(), Some("b"));
        // Past the newest entry: no command, editor keeps its buffer.
        assert_eq!(store.navigate_next(), None);
        assert_eq!(store.navigate_next(), None);
    }

    #[test]
    fn duplicate_adjacent_suppressed() {
        let mut store = store_with(&["a", "a"]);
        assert_eq!(store.len(), 1);

        // Non-adjacent repeats are stored.
        store.append(&cmd("b"));
        store.append(&cmd("a"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn empty_command_is_ignored() {
        let mut store = store_with(&["a", ""]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn append_resets_cursor() {
        let mut store = store_with(&["a", "b"]);
        store.navigate_previous();
        store.navigate_previous();

        store.append(&cmd("c"));
        // Cursor is back at len: previous yields the newest command.
        assert_eq!(store.navigate_previous().as_deref(), Some("c"));
    }
}

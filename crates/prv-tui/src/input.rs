//! The single-line command editor.
//!
//! Owns the editable buffer and cursor. History navigation lives in the
//! reducer, which replaces the buffer via [`InputState::set_text`] when the
//! history store returns a command.

use unicode_width::UnicodeWidthStr;

/// Editable input buffer with a char-indexed cursor.
#[derive(Debug, Default)]
pub struct InputState {
    text: String,
    /// Cursor position in chars, in `[0, char_count]`.
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Display width of the text before the cursor (for cursor placement).
    pub fn cursor_display_col(&self) -> u16 {
        self.text[..self.byte_cursor()].width() as u16
    }

    fn byte_cursor(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map_or(self.text.len(), |(i, _)| i)
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_cursor();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_cursor();
        self.text.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_cursor();
            self.text.remove(at);
        }
    }

    pub fn delete(&mut self) {
        let at = self.byte_cursor();
        if at < self.text.len() {
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Replaces the buffer (history recall); cursor moves to the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.move_end();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_at_cursor() {
        let mut input = InputState::new();
        input.insert_str("ac");
        input.move_left();
        input.insert_char('b');
        assert_eq!(input.text(), "abc");

        input.backspace();
        assert_eq!(input.text(), "ac");
        input.move_home();
        input.delete();
        assert_eq!(input.text(), "c");
    }

    #[test]
    fn cursor_handles_multibyte_chars() {
        let mut input = InputState::new();
        input.insert_str("∀x");
        input.move_left();
        input.move_left();
        input.insert_char('(');
        assert_eq!(input.text(), "(∀x");
        assert_eq!(input.cursor_display_col(), 1);
    }

    #[test]
    fn set_text_moves_cursor_to_end() {
        let mut input = InputState::new();
        input.set_text("recalled");
        input.insert_char('!');
        assert_eq!(input.text(), "recalled!");
    }

    #[test]
    fn movement_is_clamped() {
        let mut input = InputState::new();
        input.move_left();
        input.backspace();
        input.insert_char('x');
        input.move_right();
        input.move_right();
        assert_eq!(input.text(), "x");
    }
}

//! Single-line text input with a cursor.
//!
//! Editing methods return `Some(new_value)` when the text changed, `None`
//! when only the cursor moved or nothing happened. The cursor is a byte
//! offset that always sits on a char boundary.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
}

impl TextInput {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Replace the whole value, e.g. a paste; cursor moves to the end.
    pub fn set(&mut self, value: impl Into<String>) -> Option<String> {
        let value = value.into();
        self.cursor = value.len();
        if value == self.value {
            return None;
        }
        self.value = value;
        Some(self.value.clone())
    }

    pub fn insert_char(&mut self, c: char) -> Option<String> {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        Some(self.value.clone())
    }

    pub fn insert_str(&mut self, s: &str) -> Option<String> {
        if s.is_empty() {
            return None;
        }
        self.value.insert_str(self.cursor, s);
        self.cursor += s.len();
        Some(self.value.clone())
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) -> Option<String> {
        let prev = self.prev_boundary()?;
        self.value.replace_range(prev..self.cursor, "");
        self.cursor = prev;
        Some(self.value.clone())
    }

    /// Delete the char under the cursor.
    pub fn delete(&mut self) -> Option<String> {
        let next = self.next_boundary()?;
        self.value.replace_range(self.cursor..next, "");
        Some(self.value.clone())
    }

    /// Ctrl+U
    pub fn clear(&mut self) -> Option<String> {
        self.cursor = 0;
        if self.value.is_empty() {
            return None;
        }
        self.value.clear();
        Some(String::new())
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    pub const fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.value.len();
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.value[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_appends_and_reports_value() {
        let mut input = TextInput::new();
        assert_eq!(input.insert_char('h'), Some("h".to_string()));
        assert_eq!(input.insert_char('i'), Some("hi".to_string()));
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn value_is_stored_untrimmed() {
        let mut input = TextInput::new();
        input.insert_str("  cat ");
        assert_eq!(input.value(), "  cat ");
    }

    #[test]
    fn editing_in_the_middle() {
        let mut input = TextInput::new();
        input.insert_str("cat");
        input.move_left();
        assert_eq!(input.insert_char('r'), Some("cart".to_string()));
        input.move_home();
        assert_eq!(input.delete(), Some("art".to_string()));
        input.move_end();
        assert_eq!(input.backspace(), Some("ar".to_string()));
    }

    #[test]
    fn cursor_moves_do_not_change_value() {
        let mut input = TextInput::new();
        input.insert_str("ab");
        input.move_left();
        input.move_left();
        input.move_left();
        assert_eq!(input.cursor(), 0);
        assert_eq!(input.backspace(), None);
        input.move_end();
        assert_eq!(input.delete(), None);
    }

    #[test]
    fn multibyte_chars_keep_boundaries() {
        let mut input = TextInput::new();
        input.insert_str("café");
        assert_eq!(input.backspace(), Some("caf".to_string()));
        input.insert_char('é');
        input.move_left();
        assert_eq!(input.cursor(), 3);
        input.move_right();
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn clear_and_set() {
        let mut input = TextInput::new();
        assert_eq!(input.clear(), None);
        input.insert_str("dune");
        assert_eq!(input.clear(), Some(String::new()));
        assert!(input.is_empty());

        assert_eq!(input.set("dune"), Some("dune".to_string()));
        assert_eq!(input.set("dune"), None);
        assert_eq!(input.cursor(), 4);
    }
}

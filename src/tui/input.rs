use crossterm::event::{KeyCode, KeyEvent};

/// Single-line text field. The cursor counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    content: String,
    cursor_position: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            content: String::new(),
            cursor_position: 0,
        }
    }

    /// Apply an editing key. Returns `false` for keys the field ignores.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                self.delete_char();
                true
            }
            KeyCode::Delete => {
                self.delete_char_forward();
                true
            }
            KeyCode::Left => {
                self.move_cursor_left();
                true
            }
            KeyCode::Right => {
                self.move_cursor_right();
                true
            }
            KeyCode::Home => {
                self.move_to_start();
                true
            }
            KeyCode::End => {
                self.move_to_end();
                true
            }
            _ => false,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// Replace the content and put the cursor at the end.
    pub fn set(&mut self, content: &str) {
        self.content = content.to_string();
        self.move_to_end();
    }

    /// Take the content, leaving the field empty.
    pub fn take(&mut self) -> String {
        self.cursor_position = 0;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor_position = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.content.len())
    }

    fn insert_char(&mut self, c: char) {
        let offset = self.byte_offset(self.cursor_position);
        self.content.insert(offset, c);
        self.cursor_position += 1;
    }

    fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let offset = self.byte_offset(self.cursor_position);
            self.content.remove(offset);
        }
    }

    fn delete_char_forward(&mut self) {
        if self.cursor_position < self.char_count() {
            let offset = self.byte_offset(self.cursor_position);
            self.content.remove(offset);
        }
    }

    fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    fn move_to_start(&mut self) {
        self.cursor_position = 0;
    }

    fn move_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InputBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_editing_in_the_middle() {
        let mut input = InputBuffer::new();
        input.set("AT+GMR");
        input.handle_key(key(KeyCode::Home));
        input.handle_key(key(KeyCode::Right));
        input.handle_key(key(KeyCode::Right));
        input.handle_key(key(KeyCode::Backspace));
        input.handle_key(key(KeyCode::Char('#')));

        assert_eq!(input.content(), "A#+GMR");
        assert_eq!(input.cursor_position(), 2);
    }

    #[test]
    fn test_multibyte_characters() {
        let mut input = InputBuffer::new();
        for c in "héllo".chars() {
            input.handle_key(key(KeyCode::Char(c)));
        }
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Left));
        input.handle_key(key(KeyCode::Backspace));

        assert_eq!(input.content(), "hllo");
        input.handle_key(key(KeyCode::Delete));
        assert_eq!(input.content(), "hlo");
    }

    #[test]
    fn test_take_empties_the_field() {
        let mut input = InputBuffer::new();
        input.set("save.log");
        assert_eq!(input.take(), "save.log");
        assert!(input.is_empty());
        assert_eq!(input.cursor_position(), 0);
        assert!(!input.handle_key(key(KeyCode::Enter)));
    }
}

//! Single-line input bar.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Placeholder text shown when the input is empty.
const INPUT_PLACEHOLDER: &str = "Type a message and press Enter...";

/// State for the input bar, managing content, cursor, and history.
#[derive(Debug, Clone, Default)]
pub struct TextInputState {
    /// The text content.
    pub content: String,
    /// Cursor position (character index).
    pub cursor: usize,
    /// Input history for up/down navigation.
    history: Vec<String>,
    /// Current history index (-1 = current input).
    history_index: isize,
    /// Saved current input when navigating history.
    saved_input: String,
}

impl TextInputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Check if the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, ch: char) {
        let byte_idx = self.byte_index(self.cursor);
        self.content.insert(byte_idx, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) {
        let byte_idx = self.byte_index(self.cursor);
        self.content.insert_str(byte_idx, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.byte_index(self.cursor);
            self.content.remove(byte_idx);
        }
    }

    /// Delete the character at the cursor (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let byte_idx = self.byte_index(self.cursor);
            self.content.remove(byte_idx);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Take the content for submission, recording it in history.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = -1;
        self.saved_input.clear();
        content
    }

    /// Navigate to previous history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        // Save current input if at the bottom
        if self.history_index == -1 {
            self.saved_input = self.content.clone();
        }

        let new_index = self.history_index + 1;
        #[allow(clippy::cast_sign_loss)]
        if (new_index as usize) < self.history.len() {
            self.history_index = new_index;
            #[allow(clippy::cast_sign_loss)]
            {
                self.content = self.history[self.history.len() - 1 - new_index as usize].clone();
            }
            self.cursor = self.char_count();
        }
    }

    /// Navigate to next history entry.
    pub fn history_next(&mut self) {
        if self.history_index <= 0 {
            // Restore saved input
            if self.history_index == 0 {
                self.content = std::mem::take(&mut self.saved_input);
                self.cursor = self.char_count();
            }
            self.history_index = -1;
            return;
        }

        self.history_index -= 1;
        #[allow(clippy::cast_sign_loss)]
        {
            self.content =
                self.history[self.history.len() - 1 - self.history_index as usize].clone();
        }
        self.cursor = self.char_count();
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Byte offset of a character index, for String mutation.
    fn byte_index(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map_or(self.content.len(), |(i, _)| i)
    }
}

/// Input bar widget.
pub struct InputBar<'a> {
    state: &'a TextInputState,
    focused: bool,
}

impl<'a> InputBar<'a> {
    /// Create an input bar over the given state.
    pub fn new(state: &'a TextInputState) -> Self {
        Self {
            state,
            focused: true,
        }
    }

    /// Set whether the bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 1 {
            return;
        }

        let prompt = Span::styled("> ", Style::default().fg(Color::Cyan));

        if self.state.is_empty() {
            let mut spans = vec![prompt];
            if self.focused {
                spans.push(Span::styled("_", Style::default().fg(Color::White)));
            }
            spans.push(Span::styled(
                INPUT_PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            Paragraph::new(Line::from(spans)).render(inner, buf);
            return;
        }

        let mut spans = vec![prompt];
        let mut cursor_drawn = false;
        for (char_idx, ch) in self.state.content.chars().enumerate() {
            if self.focused && char_idx == self.state.cursor && !cursor_drawn {
                spans.push(Span::styled("|", Style::default().fg(Color::White)));
                cursor_drawn = true;
            }
            spans.push(Span::raw(ch.to_string()));
        }
        if self.focused && !cursor_drawn {
            spans.push(Span::styled("_", Style::default().fg(Color::White)));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_basic_editing() {
        let mut state = TextInputState::new();
        assert!(state.is_empty());

        state.insert('H');
        state.insert('i');
        assert_eq!(state.content(), "Hi");
        assert_eq!(state.cursor, 2);

        state.backspace();
        assert_eq!(state.content(), "H");
    }

    #[test]
    fn test_cursor_movement_and_insert() {
        let mut state = TextInputState::new();
        state.insert_str("Hello");

        state.move_left();
        state.move_left();
        assert_eq!(state.cursor, 3);

        state.insert('X');
        assert_eq!(state.content(), "HelXlo");

        state.move_home();
        assert_eq!(state.cursor, 0);

        state.move_end();
        assert_eq!(state.cursor, 6);

        state.delete();
        assert_eq!(state.content(), "HelXlo");
        state.move_home();
        state.delete();
        assert_eq!(state.content(), "elXlo");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut state = TextInputState::new();
        state.insert_str("héllo");
        state.move_left();
        state.move_left();
        state.move_left();
        state.backspace();
        assert_eq!(state.content(), "hllo");
    }

    #[test]
    fn test_submit_clears_and_records_history() {
        let mut state = TextInputState::new();

        state.insert_str("first");
        assert_eq!(state.submit(), "first");
        assert!(state.is_empty());

        state.insert_str("second");
        state.submit();

        state.history_prev();
        assert_eq!(state.content(), "second");

        state.history_prev();
        assert_eq!(state.content(), "first");

        state.history_next();
        assert_eq!(state.content(), "second");
    }

    #[test]
    fn test_whitespace_submit_not_recorded() {
        let mut state = TextInputState::new();
        state.insert_str("   ");
        assert_eq!(state.submit(), "   ");
        state.history_prev();
        assert!(state.is_empty());
    }

    #[test]
    fn test_input_bar_renders_placeholder() {
        let state = TextInputState::new();
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                frame.render_widget(InputBar::new(&state), frame.area());
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(content.contains("Type a message"));
    }
}

//! Search input component
//!
//! Holds the uncommitted query text. Nothing leaves this component until
//! [`SearchInput::submit`] is called on Enter.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::ui::Theme;

/// Search box state. `cursor` counts chars, not bytes.
#[derive(Debug, Default, Clone)]
pub struct SearchInput {
    text: String,
    cursor: usize,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with pre-filled text, cursor at the end
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.text.remove(idx);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let idx = self.byte_index(self.cursor);
            self.text.remove(idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Emit the trimmed query. The text stays in the box.
    pub fn submit(&self) -> String {
        self.text.trim().to_string()
    }

    /// Render the search box; `focused` shows the cursor
    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let content = if focused {
            let idx = self.byte_index(self.cursor);
            let (before, after) = self.text.split_at(idx);
            Line::from(vec![
                Span::styled("⌕ ", Theme::title()),
                Span::styled(before.to_string(), Theme::input()),
                Span::styled("│", Theme::title()),
                Span::styled(after.to_string(), Theme::input()),
            ])
        } else if self.text.is_empty() {
            Line::from(Span::styled("⌕ Press / to search movies...", Theme::dimmed()))
        } else {
            Line::from(vec![
                Span::styled("⌕ ", Theme::dimmed()),
                Span::styled(self.text.clone(), Theme::input()),
            ])
        };

        let border = if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let widget = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border)
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
        frame.render_widget(widget, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing() {
        let mut input = SearchInput::new();
        for c in "hello".chars() {
            input.insert(c);
        }
        assert_eq!(input.text(), "hello");
        assert_eq!(input.cursor(), 5);

        input.cursor_left();
        input.cursor_left();
        input.insert('X');
        assert_eq!(input.text(), "helXlo");
        assert_eq!(input.cursor(), 4);

        input.backspace();
        assert_eq!(input.text(), "hello");

        input.cursor_home();
        input.delete();
        assert_eq!(input.text(), "ello");

        input.cursor_end();
        assert_eq!(input.cursor(), 4);
        input.cursor_right();
        assert_eq!(input.cursor(), 4);
    }

    #[test]
    fn test_multibyte_cursor() {
        let mut input = SearchInput::with_text("amélie");
        assert_eq!(input.cursor(), 6);
        input.cursor_left();
        input.cursor_left();
        input.cursor_left();
        input.backspace();
        assert_eq!(input.text(), "amlie");
        input.insert('é');
        assert_eq!(input.text(), "amélie");
    }

    #[test]
    fn test_submit_trims_and_keeps_text() {
        let input = SearchInput::with_text("  the batman  ");
        assert_eq!(input.submit(), "the batman");
        assert_eq!(input.text(), "  the batman  ");
    }

    #[test]
    fn test_submit_whitespace_passes_through_empty() {
        let input = SearchInput::with_text("   ");
        assert_eq!(input.submit(), "");
    }

    #[test]
    fn test_clear() {
        let mut input = SearchInput::with_text("test");
        input.clear();
        assert_eq!(input.text(), "");
        assert_eq!(input.cursor(), 0);
        // Editing an empty box is harmless
        input.backspace();
        input.delete();
        input.cursor_left();
        assert_eq!(input.cursor(), 0);
    }
}

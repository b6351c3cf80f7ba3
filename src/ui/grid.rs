//! Result grid
//!
//! Lays movie summaries out as cards, left to right then top to bottom.
//! The grid itself is a pure function of the movies, the cursor and the
//! area; cursor movement lives in [`GridCursor`].

use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::models::Movie;
use crate::ui::Theme;

/// Card width in cells, borders included
pub const CARD_WIDTH: u16 = 26;

/// Card height in cells, borders included
pub const CARD_HEIGHT: u16 = 4;

/// Poster glyphs: filled when the movie has a poster, hollow placeholder otherwise
const POSTER_GLYPH: &str = "▣";
const PLACEHOLDER_GLYPH: &str = "▢";

/// Number of card columns that fit in `width`
pub fn columns(width: u16) -> usize {
    (width / CARD_WIDTH).max(1) as usize
}

fn visible_rows(height: u16) -> usize {
    (height / CARD_HEIGHT).max(1) as usize
}

/// Compute the on-screen rect of every visible card, scrolled so the
/// cursor row is visible.
pub fn layout(area: Rect, len: usize, cursor: usize) -> Vec<(usize, Rect)> {
    if len == 0 || area.width == 0 || area.height == 0 {
        return Vec::new();
    }

    let cols = columns(area.width);
    let rows = visible_rows(area.height);
    let cursor_row = cursor.min(len - 1) / cols;
    let first_row = cursor_row.saturating_sub(rows - 1);
    let card_width = CARD_WIDTH.min(area.width);
    let card_height = CARD_HEIGHT.min(area.height);

    (first_row * cols..len)
        .take(rows * cols)
        .map(|i| {
            let row = (i / cols - first_row) as u16;
            let col = (i % cols) as u16;
            let rect = Rect {
                x: area.x + col * card_width,
                y: area.y + row * card_height,
                width: card_width,
                height: card_height,
            };
            (i, rect)
        })
        .collect()
}

/// Map a click position to the card under it
pub fn hit_test(area: Rect, len: usize, cursor: usize, x: u16, y: u16) -> Option<usize> {
    let pos = Position::new(x, y);
    layout(area, len, cursor)
        .into_iter()
        .find(|(_, rect)| rect.contains(pos))
        .map(|(i, _)| i)
}

/// Stateless grid widget
pub struct ResultGrid<'a> {
    pub movies: &'a [Movie],
    pub cursor: usize,
}

impl<'a> ResultGrid<'a> {
    pub fn new(movies: &'a [Movie], cursor: usize) -> Self {
        Self { movies, cursor }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        for (i, rect) in layout(area, self.movies.len(), self.cursor) {
            self.render_card(frame, rect, &self.movies[i], i == self.cursor);
        }
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, movie: &Movie, selected: bool) {
        let inner_width = area.width.saturating_sub(4) as usize;
        let glyph = if movie.has_poster() {
            POSTER_GLYPH
        } else {
            PLACEHOLDER_GLYPH
        };

        let title_line = Line::from(vec![
            Span::styled(format!("{} ", glyph), Theme::secondary()),
            Span::styled(
                truncate(&movie.title, inner_width),
                if selected {
                    Theme::title()
                } else {
                    Theme::text()
                },
            ),
        ]);

        let year = movie
            .year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "----".to_string());
        let meta_line = Line::from(vec![
            Span::styled(format!("  {}  ", year), Theme::dimmed()),
            Span::styled(
                format!("★ {:.1}", movie.vote_average),
                Theme::rating(movie.vote_average),
            ),
        ]);

        let border = if selected {
            Theme::border_focused()
        } else {
            Theme::border()
        };

        let card = Paragraph::new(vec![title_line, meta_line]).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(border),
        );
        frame.render_widget(card, area);
    }
}

/// Truncate to `max` chars, marking the cut with an ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

// =============================================================================
// Grid Cursor
// =============================================================================

/// Cursor over the grid cards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridCursor {
    pub index: usize,
    pub len: usize,
}

impl GridCursor {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn left(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.index + 1 < self.len {
            self.index += 1;
        }
    }

    pub fn up(&mut self, cols: usize) {
        if self.index >= cols {
            self.index -= cols;
        }
    }

    pub fn down(&mut self, cols: usize) {
        if self.index + cols < self.len {
            self.index += cols;
        }
    }

    pub fn first(&mut self) {
        self.index = 0;
    }

    pub fn last(&mut self) {
        self.index = self.len.saturating_sub(1);
    }

    /// Update length (e.g. when a new page arrives), clamping the index
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.index = 0;
        } else if self.index >= len {
            self.index = len - 1;
        }
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

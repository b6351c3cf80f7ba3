//! Detail overlay
//!
//! Full detail for the selected movie, drawn over the grid. Three triggers
//! close it: the `[✕]` control, a click on the dimmed backdrop, and Esc.
//! Whichever fires first wins; later triggers for the same opening are
//! ignored.
//!
//! While open the overlay holds a [`ScrollGuard`], which keeps the grid
//! from scrolling underneath it. Dropping the overlay releases the guard.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::OnceLock;

use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tracing::debug;

use crate::models::Movie;
use crate::ui::Theme;

const CLOSE_LABEL: &str = "[✕]";

// =============================================================================
// Mount Point
// =============================================================================

/// The single layer every overlay is drawn on
#[derive(Debug)]
pub struct OverlayRoot {
    width_percent: u16,
    height_percent: u16,
    min_width: u16,
    min_height: u16,
}

impl OverlayRoot {
    /// Centered content rect inside the full frame `area`
    pub fn content_area(&self, area: Rect) -> Rect {
        let width = percent_of(area.width, self.width_percent)
            .max(self.min_width)
            .min(area.width);
        let height = percent_of(area.height, self.height_percent)
            .max(self.min_height)
            .min(area.height);
        Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        }
    }

    /// Rect of the close control on the content border
    pub fn close_area(&self, area: Rect) -> Rect {
        let content = self.content_area(area);
        let width = CLOSE_LABEL.chars().count() as u16;
        Rect {
            x: content.right().saturating_sub(width + 2).max(content.x),
            y: content.y,
            width: width.min(content.width),
            height: 1.min(content.height),
        }
    }
}

fn percent_of(value: u16, percent: u16) -> u16 {
    (u32::from(value) * u32::from(percent) / 100) as u16
}

static OVERLAY_ROOT: OnceLock<OverlayRoot> = OnceLock::new();

/// Shared overlay mount point, created on first use
pub fn overlay_root() -> &'static OverlayRoot {
    OVERLAY_ROOT.get_or_init(|| {
        debug!("overlay root created");
        OverlayRoot {
            width_percent: 70,
            height_percent: 70,
            min_width: 40,
            min_height: 12,
        }
    })
}

// =============================================================================
// Background Scroll Lock
// =============================================================================

/// Whether the grid behind overlays may scroll
#[derive(Debug, Clone, Default)]
pub struct BackgroundScroll {
    locks: Rc<Cell<usize>>,
}

impl BackgroundScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locks.get() > 0
    }

    /// Suppress scrolling until the returned guard drops
    pub fn lock(&self) -> ScrollGuard {
        self.locks.set(self.locks.get() + 1);
        ScrollGuard {
            locks: Rc::clone(&self.locks),
        }
    }
}

/// Releases its scroll lock on drop
#[derive(Debug)]
pub struct ScrollGuard {
    locks: Rc<Cell<usize>>,
}

impl Drop for ScrollGuard {
    fn drop(&mut self) {
        self.locks.set(self.locks.get().saturating_sub(1));
    }
}

// =============================================================================
// Overlay
// =============================================================================

/// How the user asked to close the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    /// The `[✕]` control
    Button,
    /// A click outside the content area
    Backdrop,
    /// Esc
    Cancel,
}

#[derive(Debug)]
struct Opening {
    movie_id: u64,
    _scroll: ScrollGuard,
}

/// Overlay open/closed state. Holds only the id of the movie it was opened
/// for; the movie itself is passed in at render time.
#[derive(Debug, Default)]
pub struct DetailOverlay {
    opening: Option<Opening>,
}

impl DetailOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.opening.is_some()
    }

    pub fn movie_id(&self) -> Option<u64> {
        self.opening.as_ref().map(|o| o.movie_id)
    }

    /// Open for a movie, replacing any previous opening
    pub fn open(&mut self, movie_id: u64, scroll: &BackgroundScroll) {
        // Release the old guard before taking a new one
        self.opening = None;
        self.opening = Some(Opening {
            movie_id,
            _scroll: scroll.lock(),
        });
    }

    /// Close the overlay. Returns `true` only for the first trigger of an
    /// opening, so the caller's close handler runs exactly once.
    pub fn close(&mut self, trigger: CloseTrigger) -> bool {
        match self.opening.take() {
            Some(opening) => {
                debug!(movie_id = opening.movie_id, ?trigger, "overlay closed");
                true
            }
            None => false,
        }
    }

    /// Which close trigger, if any, a click at (x, y) fires
    pub fn hit_test(&self, area: Rect, x: u16, y: u16) -> Option<CloseTrigger> {
        if !self.is_open() {
            return None;
        }
        let root = overlay_root();
        let pos = Position::new(x, y);
        if root.close_area(area).contains(pos) {
            Some(CloseTrigger::Button)
        } else if !root.content_area(area).contains(pos) {
            Some(CloseTrigger::Backdrop)
        } else {
            None
        }
    }

    /// Draw the overlay for `movie`. Draws nothing when closed or when no
    /// movie is given.
    pub fn render(&self, frame: &mut Frame, area: Rect, movie: Option<&Movie>) {
        let Some(movie) = movie.filter(|_| self.is_open()) else {
            return;
        };

        let root = overlay_root();
        let content = root.content_area(area);

        // Dim the backdrop
        frame.render_widget(
            Block::default().style(Style::default().bg(Theme::BACKGROUND).fg(Theme::DIM)),
            area,
        );
        frame.render_widget(Clear, content);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::border_focused())
            .title(Span::styled(format!(" {} ", movie.title), Theme::title()))
            .style(Theme::panel());
        let inner = block.inner(content);
        frame.render_widget(block, content);

        frame.render_widget(
            Paragraph::new(Span::styled(CLOSE_LABEL, Theme::keybind())),
            root.close_area(area),
        );

        frame.render_widget(
            Paragraph::new(detail_lines(movie)).wrap(Wrap { trim: true }),
            inner,
        );
    }
}

fn detail_lines(movie: &Movie) -> Vec<Line<'static>> {
    let release = if movie.release_date.is_empty() {
        "Unknown".to_string()
    } else {
        movie.release_date.clone()
    };
    let overview = if movie.overview.is_empty() {
        "No overview available.".to_string()
    } else {
        movie.overview.clone()
    };

    vec![
        Line::from(Span::styled(movie.backdrop_url(), Theme::dimmed())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Release Date: ", Theme::secondary()),
            Span::styled(release, Theme::text()),
        ]),
        Line::from(vec![
            Span::styled("Rating: ", Theme::secondary()),
            Span::styled(
                format!("{:.1}/10", movie.vote_average),
                Theme::rating(movie.vote_average),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(overview, Theme::text())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_movie, BACKDROP_PLACEHOLDER};

    fn frame_area() -> Rect {
        Rect::new(0, 0, 100, 40)
    }

    #[test]
    fn test_overlay_root_is_shared() {
        assert!(std::ptr::eq(overlay_root(), overlay_root()));
    }

    #[test]
    fn test_content_area_is_centered() {
        let content = overlay_root().content_area(frame_area());
        assert_eq!(content.width, 70);
        assert_eq!(content.height, 28);
        assert_eq!(content.x, 15);
        assert_eq!(content.y, 6);
    }

    #[test]
    fn test_content_area_fits_small_frames() {
        let small = Rect::new(0, 0, 30, 8);
        let content = overlay_root().content_area(small);
        assert_eq!(content, small);
    }

    #[test]
    fn test_close_fires_once_per_opening() {
        let scroll = BackgroundScroll::new();
        let mut overlay = DetailOverlay::new();
        assert!(!overlay.close(CloseTrigger::Cancel));

        overlay.open(7, &scroll);
        assert_eq!(overlay.movie_id(), Some(7));
        assert!(overlay.close(CloseTrigger::Button));
        assert!(!overlay.close(CloseTrigger::Backdrop));
        assert!(!overlay.close(CloseTrigger::Cancel));

        overlay.open(8, &scroll);
        assert!(overlay.close(CloseTrigger::Backdrop));
    }

    #[test]
    fn test_scroll_locked_while_open() {
        let scroll = BackgroundScroll::new();
        let mut overlay = DetailOverlay::new();
        assert!(!scroll.is_locked());

        overlay.open(1, &scroll);
        assert!(scroll.is_locked());
        // Reopening does not stack locks
        overlay.open(2, &scroll);
        overlay.close(CloseTrigger::Cancel);
        assert!(!scroll.is_locked());
    }

    #[test]
    fn test_scroll_restored_when_dropped_open() {
        let scroll = BackgroundScroll::new();
        {
            let mut overlay = DetailOverlay::new();
            overlay.open(1, &scroll);
            assert!(scroll.is_locked());
        }
        assert!(!scroll.is_locked());
    }

    #[test]
    fn test_hit_test() {
        let scroll = BackgroundScroll::new();
        let mut overlay = DetailOverlay::new();
        let area = frame_area();
        assert_eq!(overlay.hit_test(area, 0, 0), None);

        overlay.open(1, &scroll);
        let close = overlay_root().close_area(area);
        let content = overlay_root().content_area(area);
        assert_eq!(
            overlay.hit_test(area, close.x, close.y),
            Some(CloseTrigger::Button)
        );
        assert_eq!(overlay.hit_test(area, 0, 0), Some(CloseTrigger::Backdrop));
        assert_eq!(overlay.hit_test(area, content.x + 2, content.y + 3), None);
    }

    #[test]
    fn test_detail_lines_fall_back() {
        let mut movie = sample_movie(1, "Blank");
        movie.release_date.clear();
        movie.overview.clear();
        let text: Vec<String> = detail_lines(&movie)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text[0].ends_with(BACKDROP_PLACEHOLDER));
        assert_eq!(text[2], "Release Date: Unknown");
        assert_eq!(text[3], "Rating: 7.5/10");
        assert_eq!(text[5], "No overview available.");
    }
}

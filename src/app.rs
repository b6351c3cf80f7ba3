//! App state and core application logic
//!
//! Routes keyboard and mouse input to the search box, grid, pagination bar
//! and detail overlay, feeds fetch outcomes into the orchestrator, and
//! renders the whole screen. Input handlers never perform I/O: they return
//! the [`FetchRequest`] the event loop should spawn.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Position,
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tracing::debug;

use crate::query::{Completion, FetchOutcome, FetchRequest, FetchStatus, QueryOrchestrator};
use crate::ui::grid::{self, GridCursor, ResultGrid};
use crate::ui::overlay::{BackgroundScroll, CloseTrigger, DetailOverlay};
use crate::ui::pagination;
use crate::ui::search::SearchInput;
use crate::ui::toast::Toasts;
use crate::ui::Theme;

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Grid navigation
    #[default]
    Normal,
    /// Search box focused
    Editing,
}

/// Screen regions from the last render, used for mouse hit-testing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenAreas {
    pub frame: Rect,
    pub search: Rect,
    pub results: Rect,
    pub grid: Rect,
    pub pagination: Rect,
}

// =============================================================================
// Main Application State
// =============================================================================

#[derive(Debug)]
pub struct App {
    /// Whether the app is running
    pub running: bool,
    pub input_mode: InputMode,
    pub search: SearchInput,
    pub orchestrator: QueryOrchestrator,
    pub cursor: GridCursor,
    pub overlay: DetailOverlay,
    pub toasts: Toasts,
    scroll: BackgroundScroll,
    areas: ScreenAreas,
}

impl Default for App {
    fn default() -> Self {
        Self {
            running: true,
            input_mode: InputMode::Normal,
            search: SearchInput::new(),
            orchestrator: QueryOrchestrator::new(),
            cursor: GridCursor::default(),
            overlay: DetailOverlay::new(),
            toasts: Toasts::new(),
            scroll: BackgroundScroll::new(),
            areas: ScreenAreas::default(),
        }
    }
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn areas(&self) -> ScreenAreas {
        self.areas
    }

    /// Whether the grid may currently scroll
    pub fn can_scroll(&self) -> bool {
        !self.scroll.is_locked()
    }

    fn columns(&self) -> usize {
        grid::columns(self.areas.grid.width)
    }

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------

    /// Submit the search box contents to the orchestrator
    pub fn submit_search(&mut self) -> Option<FetchRequest> {
        let query = self.search.submit();
        let before = self.orchestrator.latest_seq();
        let request = self.orchestrator.submit_query(&query);
        if self.orchestrator.latest_seq() != before {
            self.cursor.set_len(self.orchestrator.displayed().len());
            self.cursor.reset();
        }
        request
    }

    /// Select the movie under the cursor and open the overlay for it
    pub fn open_selected(&mut self) {
        let Some(id) = self
            .orchestrator
            .displayed()
            .get(self.cursor.index)
            .map(|m| m.id)
        else {
            return;
        };
        if self.orchestrator.select_movie(id).is_some() {
            debug!(movie_id = id, "overlay opened");
            self.overlay.open(id, &self.scroll);
        }
    }

    /// Close the overlay through `trigger`. The selection is cleared only
    /// for the trigger that actually closed it.
    pub fn close_overlay(&mut self, trigger: CloseTrigger) -> bool {
        let closed = self.overlay.close(trigger);
        if closed {
            self.orchestrator.clear_selection();
        }
        closed
    }

    /// Commit an outcome from the effect runner
    pub fn on_outcome(&mut self, outcome: FetchOutcome, now: Instant) -> Completion {
        let new_page = outcome.result.is_ok();
        let completion = self.orchestrator.apply(outcome);
        if let Completion::Committed(notice) = &completion {
            // A failure leaves the retained page, and the cursor, in place
            if new_page {
                self.cursor.set_len(self.orchestrator.displayed().len());
                self.cursor.reset();
            }
            if let Some(notice) = notice {
                self.toasts.notify(notice, now);
            }
        }
        completion
    }

    /// Periodic housekeeping; returns whether a redraw is needed
    pub fn tick(&mut self, now: Instant) -> bool {
        self.toasts.prune(now)
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle a key press, returning a fetch to start if one was issued
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FetchRequest> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        // The overlay traps input until closed
        if self.overlay.is_open() {
            match key.code {
                KeyCode::Esc => {
                    self.close_overlay(CloseTrigger::Cancel);
                }
                KeyCode::Char('x') => {
                    self.close_overlay(CloseTrigger::Button);
                }
                _ => {}
            }
            return None;
        }

        match self.input_mode {
            InputMode::Editing => self.handle_editing_key(key),
            InputMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_editing_key(&mut self, key: KeyEvent) -> Option<FetchRequest> {
        match key.code {
            KeyCode::Esc => self.input_mode = InputMode::Normal,
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                return self.submit_search();
            }
            KeyCode::Char(c) => self.search.insert(c),
            KeyCode::Backspace => self.search.backspace(),
            KeyCode::Delete => self.search.delete(),
            KeyCode::Left => self.search.cursor_left(),
            KeyCode::Right => self.search.cursor_right(),
            KeyCode::Home => self.search.cursor_home(),
            KeyCode::End => self.search.cursor_end(),
            _ => {}
        }
        None
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<FetchRequest> {
        let cols = self.columns();
        match key.code {
            KeyCode::Char('q') => self.quit(),
            KeyCode::Char('/') | KeyCode::Char('i') => self.input_mode = InputMode::Editing,
            KeyCode::Esc => self.toasts.dismiss_all(),

            KeyCode::Left | KeyCode::Char('h') => self.cursor.left(),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.right(),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.up(cols),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.down(cols),
            KeyCode::Char('g') => self.cursor.first(),
            KeyCode::Char('G') => self.cursor.last(),
            KeyCode::Enter => self.open_selected(),

            KeyCode::Char('n') | KeyCode::Char(']') | KeyCode::PageDown => {
                return self.orchestrator.next_page();
            }
            KeyCode::Char('p') | KeyCode::Char('[') | KeyCode::PageUp => {
                return self.orchestrator.prev_page();
            }
            // Re-request the current page after a failure
            KeyCode::Char('r') => {
                let page = self.orchestrator.state().page;
                return self.orchestrator.change_page(page);
            }
            _ => {}
        }
        None
    }

    // -------------------------------------------------------------------------
    // Mouse Event Handling
    // -------------------------------------------------------------------------

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<FetchRequest> {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(x, y),
            MouseEventKind::ScrollDown if self.can_scroll() => {
                self.cursor.down(self.columns());
                None
            }
            MouseEventKind::ScrollUp if self.can_scroll() => {
                self.cursor.up(self.columns());
                None
            }
            _ => None,
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) -> Option<FetchRequest> {
        if self.overlay.is_open() {
            if let Some(trigger) = self.overlay.hit_test(self.areas.frame, x, y) {
                self.close_overlay(trigger);
            }
            return None;
        }

        let pos = Position::new(x, y);
        if self.areas.search.contains(pos) {
            self.input_mode = InputMode::Editing;
            return None;
        }
        self.input_mode = InputMode::Normal;

        if self.areas.pagination.contains(pos) {
            let target = self
                .orchestrator
                .view()
                .pagination
                .and_then(|p| pagination::hit_test(self.areas.pagination, p, x, y));
            return target.and_then(|page| self.orchestrator.change_page(page));
        }

        let len = self.orchestrator.displayed().len();
        if let Some(index) = grid::hit_test(self.areas.grid, len, self.cursor.index, x, y) {
            self.cursor.index = index;
            self.open_selected();
        }
        None
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    /// Draw the full screen and remember where everything went
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search
                Constraint::Min(1),    // Results
                Constraint::Length(1), // Pagination
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let results_block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border());
        self.areas = ScreenAreas {
            frame: area,
            search: chunks[0],
            results: chunks[1],
            grid: results_block.inner(chunks[1]),
            pagination: chunks[2],
        };

        self.search
            .render(frame, chunks[0], self.input_mode == InputMode::Editing);
        self.render_results(frame, chunks[1], results_block);
        if let Some(p) = self.orchestrator.view().pagination {
            pagination::render(frame, chunks[2], p);
        }
        self.render_status_bar(frame, chunks[3]);

        self.overlay.render(frame, area, self.orchestrator.selected());
        self.toasts.render(frame, area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect, block: Block) {
        let view = self.orchestrator.view();
        let state = self.orchestrator.state();

        let mut title = vec![Span::styled(" RESULTS ", Theme::title())];
        if let Some(page) = &state.retained {
            title.push(Span::styled(
                format!("({} of {}) ", page.len(), page.total_results),
                Theme::dimmed(),
            ));
        }
        if view.loading {
            title.push(Span::styled("⟳ Loading... ", Theme::loading()));
        }

        let block = block.title(Line::from(title));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(message) = view.error {
            let panel = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("✗ Something went wrong", Theme::error())),
                Line::from(""),
                Line::from(Span::styled(message.to_string(), Theme::text())),
                Line::from(""),
                Line::from(Span::styled(
                    "Press r or resubmit the search to try again",
                    Theme::dimmed(),
                )),
            ])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
            frame.render_widget(panel, inner);
            return;
        }

        if let Some(movies) = view.movies {
            ResultGrid::new(movies, self.cursor.index).render(frame, inner);
            return;
        }

        let placeholder = match state.status {
            FetchStatus::Idle => Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled("Find a movie", Theme::title())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("  /  ", Theme::keybind()),
                    Span::styled("Search", Theme::dimmed()),
                ]),
                Line::from(vec![
                    Span::styled("  ↵  ", Theme::keybind()),
                    Span::styled("Open details", Theme::dimmed()),
                ]),
                Line::from(vec![
                    Span::styled("  q  ", Theme::keybind()),
                    Span::styled("Quit", Theme::dimmed()),
                ]),
            ]),
            FetchStatus::Loading => {
                Paragraph::new(Span::styled("⟳ Searching...", Theme::loading()))
            }
            _ => Paragraph::new(Span::styled("No results", Theme::dimmed())),
        };
        frame.render_widget(placeholder.alignment(Alignment::Center), inner);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mode = match self.input_mode {
            InputMode::Normal => Span::styled(
                " NORMAL ",
                Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
            ),
            InputMode::Editing => Span::styled(
                " INSERT ",
                Style::default().fg(Theme::BACKGROUND).bg(Theme::SECONDARY),
            ),
        };

        let state = self.orchestrator.state();
        let position = match &state.retained {
            Some(page) if page.total_pages > 0 => {
                format!(" page {}/{} ", state.page, page.total_pages)
            }
            _ => String::from(" "),
        };

        let help = if self.overlay.is_open() {
            " ESC/x:close "
        } else {
            match self.input_mode {
                InputMode::Editing => " ↵:search  ESC:cancel ",
                InputMode::Normal => " q:quit  /:search  ↵:details  n/p:page ",
            }
        };

        let line = Line::from(vec![
            mode,
            Span::styled(position, Theme::dimmed()),
            Span::raw("│"),
            Span::styled(help, Theme::dimmed()),
        ]);
        frame.render_widget(Paragraph::new(line).style(Theme::status_bar()), area);
    }
}

//! Toast notifications
//!
//! Transient, non-blocking messages stacked in the bottom-right corner.
//! Each toast expires on its own; the event loop's tick prunes them.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::query::Notice;
use crate::ui::Theme;

/// How long a toast stays up
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Oldest toasts are dropped past this many
pub const MAX_TOASTS: usize = 3;

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    expires_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Queue of live toasts, newest last
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    items: VecDeque<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        if self.items.len() == MAX_TOASTS {
            self.items.pop_front();
        }
        self.items.push_back(Toast {
            kind,
            message: message.into(),
            expires_at: now + TOAST_TTL,
        });
    }

    /// Show a notice. Identical notices are not merged.
    pub fn notify(&mut self, notice: &Notice, now: Instant) {
        let kind = if notice.is_error() {
            ToastKind::Error
        } else {
            ToastKind::Info
        };
        self.push(kind, notice.message(), now);
    }

    /// Drop expired toasts, returning whether anything changed
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|t| !t.is_expired(now));
        self.items.len() != before
    }

    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.items.iter()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = TOAST_WIDTH.min(area.width);
        let mut bottom = area.bottom();

        for toast in self.items.iter().rev() {
            if bottom < area.y + TOAST_HEIGHT {
                break;
            }
            let rect = Rect {
                x: area.right() - width,
                y: bottom - TOAST_HEIGHT,
                width,
                height: TOAST_HEIGHT,
            };
            bottom -= TOAST_HEIGHT;

            let (style, icon) = match toast.kind {
                ToastKind::Error => (Theme::error(), "✗"),
                ToastKind::Info => (Theme::secondary(), "ℹ"),
            };
            frame.render_widget(Clear, rect);
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(format!("{} ", icon), style),
                    Span::styled(toast.message.clone(), Theme::text()),
                ]))
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(style)
                        .style(Theme::panel()),
                ),
                rect,
            );
        }
    }
}

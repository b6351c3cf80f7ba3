//! Marquee theme for cinefind
//!
//! Color palette and style helpers: dark auditorium background, amber
//! marquee highlights, crimson for errors.

use ratatui::style::{Color, Modifier, Style};

/// Color palette and shared styles
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #0d0f1a (auditorium navy)
    pub const BACKGROUND: Color = Color::Rgb(0x0d, 0x0f, 0x1a);

    /// Panel background for cards and overlays: #161a2b
    pub const PANEL: Color = Color::Rgb(0x16, 0x1a, 0x2b);

    /// Primary: #ffb000 (marquee amber)
    pub const PRIMARY: Color = Color::Rgb(0xff, 0xb0, 0x00);

    /// Secondary: #7fd1ff (projector blue)
    pub const SECONDARY: Color = Color::Rgb(0x7f, 0xd1, 0xff);

    /// Text: #ebe6dc (screen white)
    pub const TEXT: Color = Color::Rgb(0xeb, 0xe6, 0xdc);

    /// Dim: #6b6f80
    pub const DIM: Color = Color::Rgb(0x6b, 0x6f, 0x80);

    /// Success: #5fd38d
    pub const SUCCESS: Color = Color::Rgb(0x5f, 0xd3, 0x8d);

    /// Warning: #f0c05a
    pub const WARNING: Color = Color::Rgb(0xf0, 0xc0, 0x5a);

    /// Error: #e5484d (curtain crimson)
    pub const ERROR: Color = Color::Rgb(0xe5, 0x48, 0x4d);

    /// Border: #3a3f58
    pub const BORDER: Color = Color::Rgb(0x3a, 0x3f, 0x58);

    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::ERROR).add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::WARNING)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::BORDER_FOCUSED)
    }

    pub fn panel() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::PANEL)
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn keybind() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn loading() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::DIM).bg(Self::PANEL)
    }

    /// Rating color: green from 7.5, amber from 6.0, dim from 4.0, red below
    pub fn rating(vote: f32) -> Style {
        if vote >= 7.5 {
            Self::success()
        } else if vote >= 6.0 {
            Self::warning()
        } else if vote >= 4.0 {
            Self::dimmed()
        } else {
            Self::error()
        }
    }

    /// Active page link in the pagination bar
    pub fn page_active() -> Style {
        Style::default()
            .fg(Self::BACKGROUND)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }
}

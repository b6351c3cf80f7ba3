//! Terminal UI components
//!
//! Built with ratatui. Components are presentational: they render what
//! they are given and report hits; state lives in [`crate::app`].

pub mod theme;
pub mod search;
pub mod grid;
pub mod pagination;
pub mod overlay;
pub mod toast;

pub use theme::Theme;

//! cinefind - terminal movie search
//!
//! # Modules
//!
//! - `models` - Movie and result page types, image URL resolution
//! - `config` - Config file and credential resolution
//! - `api` - TMDB catalog client
//! - `query` - Query orchestrator (search state machine)
//! - `effects` - Async fetch runner
//! - `ui` - TUI components
//! - `app` - Input routing and screen rendering
//! - `cli`, `commands` - Scriptable command mode
//! - `logging` - Tracing setup

pub mod models;
pub mod config;
pub mod api;
pub mod query;
pub mod effects;
pub mod ui;
pub mod app;
pub mod cli;
pub mod commands;
pub mod logging;

// Re-export commonly used types
pub use models::{Movie, ResultPage};
pub use config::{Config, ConfigError};
pub use api::{CatalogError, TmdbClient};
pub use query::{Completion, FetchOutcome, FetchRequest, FetchStatus, Notice, QueryOrchestrator};
pub use app::{App, InputMode};

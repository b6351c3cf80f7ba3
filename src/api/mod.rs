//! API clients for external services
//!
//! - TMDB: paginated movie search

pub mod tmdb;

pub use tmdb::{CatalogError, TmdbClient};

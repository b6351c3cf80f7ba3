//! TMDB (The Movie Database) API client
//!
//! Paginated movie search. One request per call, no retries, no caching.
//! API docs: https://developer.themoviedb.org/reference/search-movie

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{Config, ConfigError};
use crate::models::{Movie, ResultPage};

/// Default TMDB API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Per-request timeout unless overridden with `with_timeout`
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Catalog request failures
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure: unreachable host, DNS, timeout, broken body
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote service answered with a non-success status
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl CatalogError {
    pub fn is_network(&self) -> bool {
        matches!(self, CatalogError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Network(e) if e.is_timeout() => {
                "Request timed out. Check your connection and try again.".to_string()
            }
            CatalogError::Network(_) => {
                "Could not reach TMDB. Check your connection and try again.".to_string()
            }
            CatalogError::Api { message, .. } => message.clone(),
            CatalogError::InvalidResponse(_) => "Failed to fetch movies".to_string(),
        }
    }
}

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given bearer token
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: http_client(DEFAULT_TIMEOUT),
        }
    }

    /// Replace the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    /// Build a client from config, failing when no credential is available
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let token = config.credential()?;
        Ok(match config.api_base_url.as_deref() {
            Some(url) => Self::with_base_url(token, url),
            None => Self::new(token),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an authenticated GET request and decode the JSON body
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "GET");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &body);
            warn!(status = status.as_u16(), %message, "TMDB rejected request");
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| CatalogError::InvalidResponse(format!("JSON parse error: {}", e)))
    }

    /// Search movies by title. `page` is 1-indexed.
    pub async fn search(&self, query: &str, page: u32) -> Result<ResultPage, CatalogError> {
        let endpoint = search_endpoint(query, page);
        let response: SearchResponse = self.get(&endpoint).await?;
        let page = response.into_page();
        debug!(
            query,
            page = page.page,
            results = page.movies.len(),
            total_pages = page.total_pages,
            "search resolved"
        );
        Ok(page)
    }
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Endpoint path and query string for `/search/movie`
pub fn search_endpoint(query: &str, page: u32) -> String {
    format!(
        "/search/movie?query={}&include_adult=false&language=en-US&page={}",
        urlencoding::encode(query),
        page.max(1)
    )
}

/// Prefer TMDB's `status_message`, fall back to the HTTP reason phrase
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            format!(
                "Request failed with status code {}{}",
                status.as_u16(),
                status
                    .canonical_reason()
                    .map(|r| format!(" {}", r))
                    .unwrap_or_default()
            )
        })
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<MovieRaw>,
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl SearchResponse {
    fn into_page(self) -> ResultPage {
        ResultPage {
            movies: self.results.into_iter().map(MovieRaw::into_movie).collect(),
            page: self.page.max(1),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
}

impl MovieRaw {
    fn into_movie(self) -> Movie {
        Movie {
            id: self.id,
            title: self.title.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            release_date: self.release_date.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0).clamp(0.0, 10.0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
        }
    }
}

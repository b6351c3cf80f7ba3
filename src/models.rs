//! Data structures shared across cinefind
//!
//! - **Movie**: one catalog entry as delivered by a search page
//! - **ResultPage**: one page of search results plus pagination metadata
//! - **Image references**: poster/backdrop URL resolution with placeholders

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Image References
// =============================================================================

/// Base URL of the TMDB image CDN
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Size variant used for grid posters
pub const POSTER_SIZE: &str = "w500";

/// Size variant used for overlay backdrops
pub const BACKDROP_SIZE: &str = "original";

/// Local asset shown when a movie has no poster
pub const POSTER_PLACEHOLDER: &str = "/placeholder-movie.jpg";

/// Local asset shown when a movie has no backdrop
pub const BACKDROP_PLACEHOLDER: &str = "/placeholder-backdrop.jpg";

/// Resolve an optional relative image path against the CDN, falling back
/// to a placeholder asset when the path is missing or blank.
pub fn image_url(path: Option<&str>, size: &str, placeholder: &str) -> String {
    match path.map(str::trim) {
        Some(p) if !p.is_empty() => {
            let sep = if p.starts_with('/') { "" } else { "/" };
            format!("{}/{}{}{}", IMAGE_BASE_URL, size, sep, p)
        }
        _ => placeholder.to_string(),
    }
}

// =============================================================================
// Movie
// =============================================================================

/// A movie from a TMDB search page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub release_date: String,
    pub vote_average: f32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

impl Movie {
    /// Poster URL, or the poster placeholder
    pub fn poster_url(&self) -> String {
        image_url(self.poster_path.as_deref(), POSTER_SIZE, POSTER_PLACEHOLDER)
    }

    /// Backdrop URL, or the backdrop placeholder
    pub fn backdrop_url(&self) -> String {
        image_url(
            self.backdrop_path.as_deref(),
            BACKDROP_SIZE,
            BACKDROP_PLACEHOLDER,
        )
    }

    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.trim().is_empty())
    }

    /// Release year parsed from "YYYY-MM-DD"
    pub fn year(&self) -> Option<u16> {
        extract_year(&self.release_date)
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} ★ {:.1}", self.title, year_str, self.vote_average)
    }
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

// =============================================================================
// Result Page
// =============================================================================

/// One page of search results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub movies: Vec<Movie>,
    /// 1-indexed page number
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
}

impl ResultPage {
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn find(&self, id: u64) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Whether `page` is a valid target for this result set
    pub fn contains_page(&self, page: u32) -> bool {
        page >= 1 && page <= self.total_pages
    }
}

/// Serializable view of a movie with resolved image URLs (CLI output)
#[derive(Debug, Clone, Serialize)]
pub struct MovieOutput<'a> {
    #[serde(flatten)]
    pub movie: &'a Movie,
    pub poster_url: String,
    pub backdrop_url: String,
}

impl<'a> From<&'a Movie> for MovieOutput<'a> {
    fn from(movie: &'a Movie) -> Self {
        Self {
            movie,
            poster_url: movie.poster_url(),
            backdrop_url: movie.backdrop_url(),
        }
    }
}

/// Serializable view of a result page (CLI output)
#[derive(Debug, Clone, Serialize)]
pub struct ResultPageOutput<'a> {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
    pub movies: Vec<MovieOutput<'a>>,
}

impl<'a> From<&'a ResultPage> for ResultPageOutput<'a> {
    fn from(page: &'a ResultPage) -> Self {
        Self {
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
            movies: page.movies.iter().map(MovieOutput::from).collect(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: format!("Overview of {}", title),
        release_date: "2022-03-01".to_string(),
        vote_average: 7.5,
        poster_path: Some(format!("/poster{}.jpg", id)),
        backdrop_path: None,
    }
}

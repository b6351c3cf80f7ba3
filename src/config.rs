//! Configuration management for cinefind
//!
//! Config is stored at ~/.config/cinefind/config.toml unless `--config`
//! points elsewhere. The TMDB bearer token comes from the `TMDB_TOKEN`
//! environment variable, falling back to `tmdb_token` in the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable holding the TMDB read access token
pub const TOKEN_ENV: &str = "TMDB_TOKEN";

/// Startup configuration errors. All of them are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("TMDB_TOKEN environment variable is not set")]
    MissingCredential,

    #[error("Failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// TMDB read access token (bearer)
    pub tmdb_token: Option<String>,
    /// Override for the TMDB API base URL
    pub api_base_url: Option<String>,
    /// Tracing filter, e.g. "info" or "cinefind=debug"
    pub log_level: Option<String>,
}

impl Config {
    /// Default config file path (~/.config/cinefind/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinefind").join("config.toml"))
    }

    /// Load config from an explicit path, or from the default location.
    ///
    /// A missing default file yields the default config. An explicit path
    /// must exist and parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the TMDB token from the environment, then the config file
    pub fn credential(&self) -> Result<String, ConfigError> {
        resolve_credential(std::env::var(TOKEN_ENV).ok(), self.tmdb_token.as_deref())
    }

    /// Tracing filter directive, defaulting to "info"
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }
}

/// Pick the first non-blank credential: environment wins over file.
pub fn resolve_credential(
    env_value: Option<String>,
    file_value: Option<&str>,
) -> Result<String, ConfigError> {
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            file_value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
        .ok_or(ConfigError::MissingCredential)
}

//! Tracing initialization and subscriber setup.
//!
//! In TUI mode the terminal belongs to the UI, so events go to a log file
//! under the user data dir. CLI mode logs to stderr.
//!
//! # Level Resolution
//!
//! 1. `RUST_LOG` if set
//! 2. `log_level` from the config file
//! 3. Default: `"info"`
//!
//! Initialization is best-effort and idempotent: failures to open the log
//! file disable logging, and only the first call installs a subscriber.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Where log events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// `<data_dir>/cinefind/cinefind.log`
    File,
    Stderr,
}

/// Default log file location
pub fn log_file_path() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("cinefind").join("cinefind.log"))
}

/// Build the filter: `RUST_LOG` wins over the configured level
pub fn env_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()))
}

pub fn init_tracing(config: &Config, target: LogTarget) {
    let filter = env_filter(config);

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
                .try_init();
        }
        LogTarget::File => {
            let Some(path) = log_file_path() else {
                return;
            };
            if let Some(parent) = path.parent() {
                if fs::create_dir_all(parent).is_err() {
                    return;
                }
            }
            let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
                return;
            };
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init();
        }
    }
}

//! Paper-Chaser: a Google Drive link crawler
//!
//! This crate enumerates Drive files (Docs, Sheets, Slides, folders and plain files)
//! that are reachable by link from a set of seed URLs, recording metadata for every
//! file it can open and mining each file's structure for links to further files.

pub mod config;
pub mod crawler;
pub mod drive;
pub mod links;
pub mod output;
pub mod state;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Paper-Chaser operations
///
/// Every variant here ends the process. Failures that only affect a single
/// Drive file are [`drive::FetchError`]s and are absorbed by the crawl loop.
#[derive(Debug, Error)]
pub enum ChaserError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read seed file {}: {source}", path.display())]
    SeedFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No valid Drive ID(s) could be parsed from the seed input")]
    NoSeeds,

    #[error("Access token is invalid or expired")]
    AuthExpired,

    #[error("Failed to fetch {id}: {source}")]
    Fetch {
        id: String,
        source: drive::FetchError,
    },

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Results sink error: {0}")]
    Sink(#[from] output::SinkError),

    #[error("Crawl state error: {0}")]
    State(#[from] state::StateError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Paper-Chaser operations
pub type Result<T> = std::result::Result<T, ChaserError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, Crawler, ShutdownSignal};
pub use drive::{DriveFetcher, DriveObject, ObjectFetcher};
pub use links::{extract_links, resolve_ids, walk};
pub use state::CrawlState;

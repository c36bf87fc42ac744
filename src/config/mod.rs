//! Configuration module for Paper-Chaser
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use paper_chaser::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("paper-chaser.toml")).unwrap();
//! println!("Results go to: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AuthConfig, Config, CrawlerConfig, EndpointConfig, HttpConfig, InsertionOrder, OutputConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

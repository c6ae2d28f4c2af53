//! corpress: build text corpora from a WordPress site's REST API
//!
//! This crate discovers the REST endpoint for a site's posts or pages, pages
//! through it politely while saving each JSON page to disk, and turns the
//! saved records into a plain-text or CSV corpus.

pub mod api;
pub mod config;
pub mod corpus;
pub mod fetch;
pub mod pipeline;

use thiserror::Error;

/// Main error type for corpress operations
///
/// Stage failures that the pipeline handles itself (a site without an API, a
/// throttled download, a malformed JSON page) never surface here; they are
/// recorded in the [`RunReport`](pipeline::RunReport) instead.
#[derive(Debug, Error)]
pub enum CorpressError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Endpoint resolution failed: {0}")]
    Resolve(#[from] api::ResolveError),

    #[error("Corpus build error: {0}")]
    Build(#[from] corpus::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
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

    #[error("Invalid header in config: {0}")]
    InvalidHeader(String),
}

/// Result type alias for corpress operations
pub type Result<T> = std::result::Result<T, CorpressError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use api::{ContentType, Endpoint, Site};
pub use config::Config;
pub use corpus::CorpusFormat;
pub use pipeline::{Pipeline, RunReport};

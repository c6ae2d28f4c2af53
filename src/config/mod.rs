//! Configuration module for corpress
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and turning a configuration into the options each pipeline stage
//! takes.
//!
//! # Example
//!
//! ```no_run
//! use corpress::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("corpress.toml")).unwrap();
//! println!("Harvesting {} from {}", config.site.content_type, config.site.url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, ParamValue, RequestConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;

use crate::api::{ContentType, Site};
use crate::corpus::{CorpusFormat, CorpusOptions};
use crate::fetch::{FetchOptions, HttpSettings, DEFAULT_USER_AGENT};
use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

impl Config {
    /// Creates a configuration for `url` with default settings and no output
    /// paths
    pub fn new(url: impl Into<String>, content_type: ContentType, format: CorpusFormat) -> Self {
        Self {
            site: SiteConfig {
                url: url.into(),
                content_type,
                headers: BTreeMap::new(),
            },
            request: RequestConfig::default(),
            output: OutputConfig {
                format,
                json_path: None,
                corpus_path: None,
                table_path: None,
                include_title: true,
                show_report: true,
            },
        }
    }

    /// Converts the configured headers into a request header map
    pub fn header_map(&self) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &self.site.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfigError::InvalidHeader(format!("'{}': {}", name, e)))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|e| ConfigError::InvalidHeader(format!("value of '{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    /// Returns the target site with its headers
    pub fn site(&self) -> Result<Site, ConfigError> {
        Ok(Site::new(self.site.url.clone()).with_headers(self.header_map()?))
    }

    /// Returns the extra query parameters as string pairs
    pub fn query_params(&self) -> Vec<(String, String)> {
        self.request
            .params
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect()
    }

    /// Returns the HTTP client settings
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            user_agent: self
                .request
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: Duration::from_secs(self.request.timeout_seconds),
            ..HttpSettings::default()
        }
    }

    /// Returns the download options, or an error if no JSON path is set
    pub fn fetch_options(&self) -> Result<FetchOptions, ConfigError> {
        let json_dir = self.json_dir()?;
        Ok(FetchOptions::new(self.site.content_type, json_dir)
            .with_headers(self.header_map()?)
            .with_params(self.query_params())
            .with_delay(Duration::from_secs(self.request.delay_seconds))
            .with_max_pages(self.request.max_pages))
    }

    /// Returns the corpus build options, or an error if no JSON path is set
    ///
    /// Format-specific path requirements are checked by the builder itself.
    pub fn corpus_options(&self) -> Result<CorpusOptions, ConfigError> {
        Ok(CorpusOptions {
            format: self.output.format,
            json_dir: self.json_dir()?,
            corpus_dir: self.output.corpus_path.clone(),
            table_path: self.output.table_path.clone(),
            include_title: self.output.include_title,
        })
    }

    fn json_dir(&self) -> Result<PathBuf, ConfigError> {
        self.output
            .json_path
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .ok_or_else(|| ConfigError::Validation("No path provided to save JSON data".to_string()))
    }
}

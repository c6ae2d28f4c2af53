use crate::api::ContentType;
use crate::corpus::CorpusFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Main configuration structure for corpress
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub request: RequestConfig,
    pub output: OutputConfig,
}

/// The site to harvest
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Site URL, or the collection endpoint itself
    pub url: String,

    /// Which collection to harvest
    #[serde(rename = "content-type", default = "default_content_type")]
    pub content_type: ContentType,

    /// Headers sent with every request (e.g. authentication tokens)
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Request pacing and shaping
#[derive(Debug, Clone, Deserialize)]
pub struct RequestConfig {
    /// Seconds to wait after every request (minimum 1)
    #[serde(rename = "delay-seconds", default = "default_delay_seconds")]
    pub delay_seconds: u64,

    /// Maximum number of pages to download
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-seconds", default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(rename = "user-agent", default)]
    pub user_agent: Option<String>,

    /// Extra query parameters for the collection endpoint (e.g. `per_page`)
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            delay_seconds: default_delay_seconds(),
            max_pages: None,
            timeout_seconds: default_timeout_seconds(),
            user_agent: None,
            params: BTreeMap::new(),
        }
    }
}

/// A query parameter value as written in TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Boolean(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Corpus layout
    #[serde(default = "default_format")]
    pub format: CorpusFormat,

    /// Directory for the downloaded JSON pages
    #[serde(rename = "json-path", default)]
    pub json_path: Option<PathBuf>,

    /// Directory for per-record text files (text format)
    #[serde(rename = "corpus-path", default)]
    pub corpus_path: Option<PathBuf>,

    /// CSV file: metadata (text format) or the corpus itself (table format)
    #[serde(rename = "table-path", default)]
    pub table_path: Option<PathBuf>,

    /// Head each text file with the record title
    #[serde(rename = "include-title", default = "default_true")]
    pub include_title: bool,

    /// Print the run report when the pipeline finishes
    #[serde(rename = "show-report", default = "default_true")]
    pub show_report: bool,
}

fn default_content_type() -> ContentType {
    ContentType::Posts
}

fn default_delay_seconds() -> u64 {
    5
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_format() -> CorpusFormat {
    CorpusFormat::Text
}

fn default_true() -> bool {
    true
}

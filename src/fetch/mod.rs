//! Paginated download of REST API collections
//!
//! This module contains:
//! - HTTP client construction
//! - The page-by-page download loop with rate limiting and retry policy
//! - The on-disk naming scheme for saved pages
//!
//! # On-disk contract
//!
//! Each page is saved verbatim as `{type}-{page}.json` in the JSON directory,
//! with the page number zero-padded to the digit count of the total page
//! count (`posts-01.json` … `posts-12.json`). The corpus builder reads any
//! `*.json` file from that directory, so it can run without the network.

mod client;
mod paginator;

pub use client::{build_http_client, HttpSettings, DEFAULT_USER_AGENT};
pub use paginator::{
    clamp_delay, page_file_name, FetchError, FetchOptions, FetchSummary, PageFetcher,
    MAX_CONSECUTIVE_TRANSIENT_ERRORS, MIN_DELAY,
};

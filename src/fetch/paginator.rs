//! Page-by-page collection download
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Non-2xx status | Abort immediately, no retry |
//! | Timeout | Retry same page after the delay |
//! | Connection failure | Retry same page after the delay |
//! | More than 3 consecutive timeouts/connection failures | Abort |
//! | Any other transport error | Abort |
//!
//! A successful page resets the consecutive error count.

use crate::api::{ContentType, Endpoint, TOTAL_PAGES_HEADER};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Consecutive transient errors tolerated on one page before giving up
pub const MAX_CONSECUTIVE_TRANSIENT_ERRORS: u32 = 3;

/// Shortest allowed pause between requests
pub const MIN_DELAY: Duration = Duration::from_secs(1);

/// Errors that end a download
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to prepare JSON directory {path}: {source}")]
    Directory { path: PathBuf, source: io::Error },

    #[error("Page {page} of {url} returned status code {status}")]
    Status { url: String, page: u32, status: u16 },

    #[error("Missing or invalid X-WP-TotalPages header from {url}")]
    MissingTotalPages { url: String },

    #[error("Giving up on page {page} of {url} after {errors} consecutive network errors")]
    TooManyTransientErrors { url: String, page: u32, errors: u32 },

    #[error("Request for page {page} of {url} failed: {source}")]
    Request {
        url: String,
        page: u32,
        source: reqwest::Error,
    },

    #[error("Failed to save page {page} to {path}: {source}")]
    Write {
        page: u32,
        path: PathBuf,
        source: io::Error,
    },
}

/// What to download and where to put it
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub content_type: ContentType,
    /// Headers sent with every page request
    pub headers: HeaderMap,
    /// Extra query parameters; `page` is always set by the fetcher
    pub params: Vec<(String, String)>,
    /// Directory the JSON pages are written to
    pub json_dir: PathBuf,
    /// Pause after every request; clamped to at least one second
    pub delay: Duration,
    /// Stop after this many pages even if the API reports more
    pub max_pages: Option<u32>,
}

impl FetchOptions {
    pub fn new(content_type: ContentType, json_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_type,
            headers: HeaderMap::new(),
            params: Vec::new(),
            json_dir: json_dir.into(),
            delay: Duration::from_secs(5),
            max_pages: None,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_params(mut self, params: Vec<(String, String)>) -> Self {
        self.params = params;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }
}

/// Outcome of a completed download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    /// Number of pages written to disk
    pub pages_saved: u32,
    /// Page count reported by the API
    pub total_pages: u32,
}

/// One answered page request
struct PageResponse {
    url: String,
    status: StatusCode,
    total_pages: Option<u32>,
    body: Vec<u8>,
}

/// Downloads every page of a collection endpoint
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Downloads and saves all pages of `endpoint`
    ///
    /// Pages are requested one at a time starting from 1. The total page
    /// count is read from the first successful response and fixes the file
    /// name padding for the whole run. Saved files are left on disk even
    /// when a later page fails.
    ///
    /// # Returns
    ///
    /// * `Ok(FetchSummary)` - Every page up to the total (or the cap) was saved
    /// * `Err(FetchError)` - The download was abandoned
    pub async fn fetch(
        &self,
        endpoint: &Endpoint,
        options: &FetchOptions,
    ) -> Result<FetchSummary, FetchError> {
        let delay = clamp_delay(options.delay);
        prepare_json_dir(&options.json_dir)?;

        if let Some(max_pages) = options.max_pages {
            tracing::info!("Max pages to retrieve from API is set: {}", max_pages);
        }

        let mut page: u32 = 1;
        let mut pagination: Option<(u32, usize)> = None;
        let mut consecutive_errors: u32 = 0;
        let mut pages_saved: u32 = 0;

        loop {
            let mut done = false;

            match self.request_page(endpoint, options, page).await {
                Ok(response) if !response.status.is_success() => {
                    log_status_failure(page, &response.url, response.status);
                    return Err(FetchError::Status {
                        url: response.url,
                        page,
                        status: response.status.as_u16(),
                    });
                }
                Ok(response) => {
                    let (total_pages, width) = match pagination {
                        Some(known) => known,
                        None => {
                            let total = response.total_pages.ok_or_else(|| {
                                tracing::error!(
                                    "{} did not report {}",
                                    response.url,
                                    TOTAL_PAGES_HEADER
                                );
                                FetchError::MissingTotalPages {
                                    url: response.url.clone(),
                                }
                            })?;
                            tracing::info!("Total pages to retrieve is {}", total);
                            let known = (total, digit_count(total));
                            pagination = Some(known);
                            known
                        }
                    };

                    let path = options
                        .json_dir
                        .join(page_file_name(options.content_type, page, width));
                    std::fs::write(&path, &response.body).map_err(|source| {
                        tracing::error!("Failed to save {}: {}", path.display(), source);
                        FetchError::Write {
                            page,
                            path: path.clone(),
                            source,
                        }
                    })?;
                    tracing::debug!("Saved {}", path.display());
                    pages_saved += 1;

                    consecutive_errors = 0;
                    page += 1;
                    done = page > total_pages
                        || options.max_pages.is_some_and(|max_pages| page > max_pages);
                }
                Err(error) if is_transient(&error) => {
                    consecutive_errors += 1;
                    tracing::warn!(
                        "Error downloading page {} ({}) from {}",
                        page,
                        error,
                        endpoint.url
                    );
                    if consecutive_errors > MAX_CONSECUTIVE_TRANSIENT_ERRORS {
                        tracing::error!(
                            "Giving up after {} consecutive network errors on page {}",
                            consecutive_errors,
                            page
                        );
                        return Err(FetchError::TooManyTransientErrors {
                            url: endpoint.url.clone(),
                            page,
                            errors: consecutive_errors,
                        });
                    }
                }
                Err(error) => {
                    tracing::error!(
                        "Error downloading page {} ({}) from {}",
                        page,
                        error,
                        endpoint.url
                    );
                    return Err(FetchError::Request {
                        url: endpoint.url.clone(),
                        page,
                        source: error,
                    });
                }
            }

            tokio::time::sleep(delay).await;

            if done {
                break;
            }
        }

        let total_pages = pagination.map(|(total, _)| total).unwrap_or_default();
        tracing::info!(
            "Saved {} of {} pages to {}",
            pages_saved,
            total_pages,
            options.json_dir.display()
        );

        Ok(FetchSummary {
            pages_saved,
            total_pages,
        })
    }

    /// Requests a single page, reading the body only for successful responses
    async fn request_page(
        &self,
        endpoint: &Endpoint,
        options: &FetchOptions,
        page: u32,
    ) -> Result<PageResponse, reqwest::Error> {
        let query = page_query(&options.params, page);

        let response = self
            .client
            .get(&endpoint.url)
            .headers(options.headers.clone())
            .query(&query)
            .send()
            .await?;

        let url = response.url().to_string();
        tracing::info!("Downloading {}", url);

        let status = response.status();
        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u32>().ok());

        let body = if status.is_success() {
            response.bytes().await?.to_vec()
        } else {
            Vec::new()
        };

        Ok(PageResponse {
            url,
            status,
            total_pages,
            body,
        })
    }
}

/// Clamps a request delay to [`MIN_DELAY`], warning when it had to
pub fn clamp_delay(delay: Duration) -> Duration {
    if delay < MIN_DELAY {
        tracing::warn!(
            "Setting minimum time between requests to {}s as {:?} is too short",
            MIN_DELAY.as_secs(),
            delay
        );
        MIN_DELAY
    } else {
        delay
    }
}

/// Returns the file name for a saved page, e.g. `posts-07.json` for width 2
pub fn page_file_name(content_type: ContentType, page: u32, width: usize) -> String {
    format!("{}-{:0width$}.json", content_type.as_str(), page, width = width)
}

fn digit_count(total_pages: u32) -> usize {
    total_pages.to_string().len()
}

/// Builds the query for one page; any caller-supplied `page` is replaced
fn page_query(params: &[(String, String)], page: u32) -> Vec<(String, String)> {
    let mut query: Vec<(String, String)> = params
        .iter()
        .filter(|(key, _)| key != "page")
        .cloned()
        .collect();
    query.push(("page".to_string(), page.to_string()));
    query
}

/// Timeouts and connection failures are worth retrying; everything else is not
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

fn prepare_json_dir(path: &Path) -> Result<(), FetchError> {
    if path.is_dir() {
        tracing::info!("Using JSON save path: {}", path.display());
        return Ok(());
    }

    std::fs::create_dir_all(path).map_err(|source| {
        tracing::error!("Failed to create JSON save path {}: {}", path.display(), source);
        FetchError::Directory {
            path: path.to_path_buf(),
            source,
        }
    })?;
    tracing::info!("Created JSON save path: {}", path.display());
    Ok(())
}

fn log_status_failure(page: u32, url: &str, status: StatusCode) {
    tracing::error!("Error downloading page {} from {}", page, url);
    tracing::error!("Status code: {}", status.as_u16());
    if page == 1 {
        tracing::error!("It appears that this website does not provide access to the REST API");
    } else {
        tracing::error!(
            "The server may be refusing repeated access to its REST API (common with 400 and 403)"
        );
    }
}

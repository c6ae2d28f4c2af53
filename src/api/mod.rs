//! WordPress REST API addressing
//!
//! This module holds the types that describe what is being harvested:
//! - The target site and its request headers
//! - The content type (posts or pages) and its API route
//! - The resolved endpoint and how it was discovered
//!
//! Endpoint discovery itself lives in [`resolver`], with the pure
//! response-classification logic in [`discovery`].

pub mod discovery;
mod resolver;

pub use discovery::{classify_probe, ProbeOutcome};
pub use resolver::{resolve_endpoint, ResolveError};

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Link relation WordPress uses to advertise its REST API root
pub const API_LINK_REL: &str = "https://api.w.org/";

/// Path segment under which WordPress serves its REST API by default
pub const WELL_KNOWN_API_ROOT: &str = "wp-json/";

/// Response header carrying the total number of pages for a collection
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// The kinds of content that can be harvested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ContentType {
    /// Blog posts (`wp/v2/posts`)
    Posts,
    /// Static pages (`wp/v2/pages`)
    Pages,
}

impl ContentType {
    /// Returns the lowercase name used in file names and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Posts => "posts",
            Self::Pages => "pages",
        }
    }

    /// Returns the REST route for this content type, relative to the API root
    pub fn route(&self) -> &'static str {
        match self {
            Self::Posts => "wp/v2/posts",
            Self::Pages => "wp/v2/pages",
        }
    }

    /// Returns the key used for this content type in the API root's routes table
    pub fn route_key(&self) -> String {
        format!("/{}", self.route())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "posts" => Ok(Self::Posts),
            "pages" => Ok(Self::Pages),
            other => Err(format!(
                "content type must be 'posts' or 'pages', got '{}'",
                other
            )),
        }
    }
}

impl TryFrom<String> for ContentType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        value.as_str().to_string()
    }
}

/// A target site: its base URL and the headers sent with every request
#[derive(Debug, Clone)]
pub struct Site {
    url: String,
    headers: HeaderMap,
}

impl Site {
    /// Creates a site with no extra request headers
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Replaces the request headers sent to this site
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// How an endpoint URL was arrived at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointSource {
    /// The site URL already pointed at the content route
    ProvidedUrl,
    /// Read from the `routes` table of the API root document
    RouteTable,
    /// Built from the API root advertised in the site's HTML
    DiscoveryLink,
    /// Guessed from the conventional `wp-json/` location; not verified
    WellKnownGuess,
}

impl fmt::Display for EndpointSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::ProvidedUrl => "provided-url",
            Self::RouteTable => "route-table",
            Self::DiscoveryLink => "discovery-link",
            Self::WellKnownGuess => "well-known-guess",
        };
        f.write_str(label)
    }
}

/// A resolved collection endpoint for one content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub source: EndpointSource,
}

impl Endpoint {
    pub fn new(url: impl Into<String>, source: EndpointSource) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Appends a relative route to a base URL, adding a `/` separator only when
/// the base does not already end with one
///
/// # Examples
///
/// ```
/// use corpress::api::join_route;
///
/// assert_eq!(join_route("https://x/wp-json/", "wp/v2/posts"), "https://x/wp-json/wp/v2/posts");
/// assert_eq!(join_route("https://x/wp-json", "wp/v2/posts"), "https://x/wp-json/wp/v2/posts");
/// ```
pub fn join_route(base: &str, route: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, route)
    } else {
        format!("{}/{}", base, route)
    }
}

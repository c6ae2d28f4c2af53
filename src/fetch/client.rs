use reqwest::Client;
use std::time::Duration;

/// Default user agent: crate name and version
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Settings for the shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// User agent sent with every request
    pub user_agent: String,
    /// Whole-request timeout; exceeding it counts as a transient error
    pub timeout: Duration,
    /// Connection establishment timeout
    pub connect_timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Builds an HTTP client with the given settings
///
/// Redirects are followed with reqwest's default policy since WordPress
/// commonly redirects between `http`/`https` and `www` hosts.
///
/// # Example
///
/// ```no_run
/// use corpress::fetch::{build_http_client, HttpSettings};
///
/// let client = build_http_client(&HttpSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &HttpSettings) -> Result<Client, reqwest::Error> {
    // connect_timeout must not exceed the overall timeout
    let connect_timeout = settings.connect_timeout.min(settings.timeout);

    Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .connect_timeout(connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

//! Endpoint resolution
//!
//! Strategies are tried in order, first success wins:
//!
//! | Strategy | Needs probe | Result |
//! |----------|-------------|--------|
//! | Site URL ends with the route | no | site URL as-is |
//! | Probe body is the API root JSON | yes | `routes[..]._links.self` |
//! | Probe body is HTML with an API `<link>` | yes | link href + route |
//! | Anything else | yes | `{site}/wp-json/{route}` (guess) |
//!
//! The probe is a single GET with no retries. A transport error or non-2xx
//! status fails resolution outright.

use crate::api::discovery::{classify_probe, endpoint_from_probe, provided_url, ProbeOutcome};
use crate::api::{ContentType, Endpoint, Site};
use reqwest::Client;
use thiserror::Error;

/// Reasons an endpoint could not be resolved
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{url} returned status code {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Request { url: String, source: reqwest::Error },
}

/// Resolves the collection endpoint for `content_type` on `site`
///
/// # Arguments
///
/// * `client` - The HTTP client used for the probe request
/// * `site` - The target site; its headers are sent with the probe
/// * `content_type` - Which collection to locate
///
/// # Returns
///
/// * `Ok(Endpoint)` - The endpoint and the strategy that found it
/// * `Err(ResolveError)` - The probe request failed
pub async fn resolve_endpoint(
    client: &Client,
    site: &Site,
    content_type: ContentType,
) -> Result<Endpoint, ResolveError> {
    if let Some(endpoint) = provided_url(site, content_type) {
        tracing::info!(
            "URL {} appears to be the REST API {} route",
            endpoint.url,
            content_type
        );
        return Ok(endpoint);
    }

    let body = probe(client, site).await?;
    let outcome = classify_probe(&body, content_type);

    match &outcome {
        ProbeOutcome::RouteTable(_) => tracing::info!("URL is a REST API root document"),
        ProbeOutcome::DiscoveryLink(root) => {
            tracing::info!("Found REST API discovery link: {}", root)
        }
        ProbeOutcome::Unresolvable => tracing::info!("No REST API discovery link in markup"),
    }

    let endpoint = endpoint_from_probe(site, content_type, outcome);
    tracing::info!(
        "Resolved {} route {} ({})",
        content_type,
        endpoint.url,
        endpoint.source
    );

    Ok(endpoint)
}

/// Fetches the site URL and returns its body
async fn probe(client: &Client, site: &Site) -> Result<String, ResolveError> {
    let url = site.url();
    tracing::debug!("Probing {}", url);

    let response = client
        .get(url)
        .headers(site.headers().clone())
        .send()
        .await
        .map_err(|source| {
            tracing::error!("Request to {} failed: {}", url, source);
            ResolveError::Request {
                url: url.to_string(),
                source,
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::error!("{} returned status code {}", url, status.as_u16());
        return Err(ResolveError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|source| {
        tracing::error!("Failed to read response body from {}: {}", url, source);
        ResolveError::Request {
            url: url.to_string(),
            source,
        }
    })
}

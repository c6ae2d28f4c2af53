//! Endpoint discovery strategies
//!
//! Everything here is a pure function of the site, the content type and
//! (where needed) the body returned when probing the site URL. The resolver
//! performs the network request and then dispatches on [`ProbeOutcome`].

use crate::api::{
    join_route, ContentType, Endpoint, EndpointSource, Site, API_LINK_REL, WELL_KNOWN_API_ROOT,
};
use scraper::{Html, Selector};
use serde_json::Value;

/// What a probe of the site URL revealed about the REST API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The body was the API root document; holds the route's self link
    RouteTable(String),
    /// The body was HTML advertising the API root; holds that root URL
    DiscoveryLink(String),
    /// Neither form was recognised
    Unresolvable,
}

/// Accepts the site URL unchanged when it already points at the content route
///
/// This is the only strategy that needs no probe request.
pub fn provided_url(site: &Site, content_type: ContentType) -> Option<Endpoint> {
    site.url()
        .ends_with(content_type.route())
        .then(|| Endpoint::new(site.url(), EndpointSource::ProvidedUrl))
}

/// Classifies a probe response body
///
/// The body is first read as the JSON API root document. If that fails, or
/// the document has no entry for the content type's route, it is read as
/// HTML and searched for the API discovery `<link>`.
pub fn classify_probe(body: &str, content_type: ContentType) -> ProbeOutcome {
    if let Some(href) = route_table_href(body, content_type) {
        return ProbeOutcome::RouteTable(href);
    }

    match discovery_link_href(body) {
        Some(root) => ProbeOutcome::DiscoveryLink(root),
        None => ProbeOutcome::Unresolvable,
    }
}

/// Turns a classified probe into an endpoint
///
/// An unresolvable probe still yields an endpoint: the conventional
/// `wp-json/` location under the site URL.
pub fn endpoint_from_probe(
    site: &Site,
    content_type: ContentType,
    outcome: ProbeOutcome,
) -> Endpoint {
    match outcome {
        ProbeOutcome::RouteTable(href) => Endpoint::new(href, EndpointSource::RouteTable),
        ProbeOutcome::DiscoveryLink(root) => Endpoint::new(
            join_route(&root, content_type.route()),
            EndpointSource::DiscoveryLink,
        ),
        ProbeOutcome::Unresolvable => well_known_guess(site, content_type),
    }
}

/// Builds the conventional endpoint location for a site
pub fn well_known_guess(site: &Site, content_type: ContentType) -> Endpoint {
    let root = join_route(site.url(), WELL_KNOWN_API_ROOT);
    Endpoint::new(
        format!("{}{}", root, content_type.route()),
        EndpointSource::WellKnownGuess,
    )
}

/// Extracts `routes["/wp/v2/<type>"]._links.self` from an API root document
///
/// Newer WordPress versions publish `self` as a list of link objects, older
/// ones as a bare string; both are accepted.
fn route_table_href(body: &str, content_type: ContentType) -> Option<String> {
    let document: Value = serde_json::from_str(body).ok()?;
    let self_link = document
        .get("routes")?
        .get(content_type.route_key())?
        .get("_links")?
        .get("self")?;

    let href = match self_link {
        Value::Array(links) => links.first()?.get("href")?.as_str()?,
        Value::String(href) => href.as_str(),
        _ => return None,
    };

    Some(href.to_string()).filter(|href| !href.is_empty())
}

/// Finds the href of `<link rel="https://api.w.org/">` in an HTML document
fn discovery_link_href(body: &str) -> Option<String> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(&format!("link[rel~=\"{}\"][href]", API_LINK_REL)).ok()?;

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .find(|href| !href.is_empty())
}

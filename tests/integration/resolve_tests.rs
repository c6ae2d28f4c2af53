//! Integration tests for endpoint resolution
//!
//! These tests use wiremock to stand in for a WordPress site and check each
//! discovery strategy end-to-end.

use corpress::api::{resolve_endpoint, EndpointSource, ResolveError};
use corpress::fetch::{build_http_client, HttpSettings};
use corpress::{ContentType, Site};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> Client {
    build_http_client(&HttpSettings::default()).expect("Failed to build client")
}

#[tokio::test]
async fn test_provided_endpoint_skips_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let url = format!("{}/wp-json/wp/v2/posts", mock_server.uri());
    let endpoint = resolve_endpoint(&client(), &Site::new(url.clone()), ContentType::Posts)
        .await
        .expect("Resolution failed");

    assert_eq!(endpoint.url, url);
    assert_eq!(endpoint.source, EndpointSource::ProvidedUrl);
}

#[tokio::test]
async fn test_route_table_in_api_root() {
    let mock_server = MockServer::start().await;
    let pages_href = "https://cms.example.org/wp-json/wp/v2/pages";

    Mock::given(method("GET"))
        .and(path("/wp-json/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string(format!(
                    r#"{{"name":"Example","routes":{{
                        "/wp/v2/posts":{{"_links":{{"self":[{{"href":"https://cms.example.org/wp-json/wp/v2/posts"}}]}}}},
                        "/wp/v2/pages":{{"_links":{{"self":[{{"href":"{}"}}]}}}}
                    }}}}"#,
                    pages_href
                )),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let site = Site::new(format!("{}/wp-json/", mock_server.uri()));
    let endpoint = resolve_endpoint(&client(), &site, ContentType::Pages)
        .await
        .expect("Resolution failed");

    assert_eq!(endpoint.url, pages_href);
    assert_eq!(endpoint.source, EndpointSource::RouteTable);
}

#[tokio::test]
async fn test_discovery_link_in_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(
                    r#"<html><head><title>Blog</title>
                    <link rel="https://api.w.org/" href="https://x/wp-json/" />
                    </head><body><a href="/about">About</a></body></html>"#,
                ),
        )
        .mount(&mock_server)
        .await;

    let site = Site::new(format!("{}/", mock_server.uri()));
    let endpoint = resolve_endpoint(&client(), &site, ContentType::Posts)
        .await
        .expect("Resolution failed");

    assert_eq!(endpoint.url, "https://x/wp-json/wp/v2/posts");
    assert_eq!(endpoint.source, EndpointSource::DiscoveryLink);
}

#[tokio::test]
async fn test_falls_back_to_well_known_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head><title>Static</title></head><body></body></html>"),
        )
        .mount(&mock_server)
        .await;

    let site = Site::new(mock_server.uri());
    let endpoint = resolve_endpoint(&client(), &site, ContentType::Pages)
        .await
        .expect("Resolution failed");

    assert_eq!(
        endpoint.url,
        format!("{}/wp-json/wp/v2/pages", mock_server.uri())
    );
    assert_eq!(endpoint.source, EndpointSource::WellKnownGuess);
}

#[tokio::test]
async fn test_error_status_fails_resolution() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = resolve_endpoint(
        &client(),
        &Site::new(mock_server.uri()),
        ContentType::Posts,
    )
    .await;

    assert!(matches!(
        result,
        Err(ResolveError::Status { status: 503, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_site_fails_resolution() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let result = resolve_endpoint(&client(), &Site::new(uri), ContentType::Posts).await;
    assert!(matches!(result, Err(ResolveError::Request { .. })));
}

#[tokio::test]
async fn test_site_headers_sent_with_probe() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("authorization", "Bearer abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
    let site = Site::new(mock_server.uri()).with_headers(headers);

    let endpoint = resolve_endpoint(&client(), &site, ContentType::Posts)
        .await
        .expect("Resolution failed");
    assert_eq!(endpoint.source, EndpointSource::WellKnownGuess);
}

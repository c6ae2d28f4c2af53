//! End-to-end tests for the resolve → fetch → build pipeline
//!
//! A wiremock server plays the WordPress site; the report returned by each
//! run shows how far the pipeline got.

use corpress::config::Config;
use corpress::{ContentType, CorpressError, CorpusFormat, Pipeline};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(site_url: String, format: CorpusFormat, dir: &TempDir) -> Config {
    let mut config = Config::new(site_url, ContentType::Posts, format);
    config.output.json_path = Some(dir.path().join("json"));
    config.output.corpus_path = Some(dir.path().join("txt"));
    config.output.table_path = Some(dir.path().join("corpus.csv"));
    config.output.show_report = false;
    config.request.delay_seconds = 1;
    config
}

fn records() -> String {
    json!([
        {
            "id": 7,
            "date": "2024-03-10T09:30:00",
            "type": "post",
            "link": "https://example.com/first",
            "title": { "rendered": "First Post" },
            "content": { "rendered": "<p>Hello there.</p>" }
        },
        {
            "id": 8,
            "date": "2024-03-11T09:30:00",
            "type": "post",
            "link": "https://example.com/second",
            "title": { "rendered": "Second Post" },
            "content": { "rendered": "<p>Line one</p>\n<p>Line two</p>" }
        }
    ])
    .to_string()
}

/// Mounts a homepage advertising the API root
async fn mount_homepage(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(format!(
                    r#"<html><head><link rel="https://api.w.org/" href="{}/wp-json/"></head><body></body></html>"#,
                    mock_server.uri()
                )),
        )
        .expect(1)
        .mount(mock_server)
        .await;
}

/// Mounts the homepage and a one-page posts collection
async fn mount_site(mock_server: &MockServer, posts_body: String) {
    mount_homepage(mock_server).await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-WP-TotalPages", "1")
                .insert_header("content-type", "application/json")
                .set_body_string(posts_body),
        )
        .expect(1)
        .mount(mock_server)
        .await;
}

fn write_json_page(dir: &TempDir, body: &str) {
    let json_dir = dir.path().join("json");
    std::fs::create_dir_all(&json_dir).unwrap();
    std::fs::write(json_dir.join("posts-1.json"), body).unwrap();
}

fn text_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_run_text_corpus() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, records()).await;

    let dir = TempDir::new().unwrap();
    let config = config(format!("{}/", mock_server.uri()), CorpusFormat::Text, &dir);
    let report = Pipeline::new(config).unwrap().run().await.expect("Run failed");

    assert!(report.get_api_url);
    assert!(report.get_json);
    assert!(report.create_corpus);
    assert!(report.succeeded());
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.total_pages, 1);
    assert_eq!(report.pages_processed, 1);
    assert_eq!(report.entries_written, 2);
    assert_eq!(report.corpus_texts_count, 2);
    assert_eq!(
        report.endpoint_url,
        Some(format!("{}/wp-json/wp/v2/posts", mock_server.uri()))
    );
    assert!(report.finished_at.is_some());

    assert_eq!(
        text_files(&dir.path().join("txt")),
        vec![
            "2024-03-10-post-7-first-post.txt",
            "2024-03-11-post-8-second-post.txt",
        ]
    );
    assert!(dir.path().join("json").join("posts-1.json").exists());
    assert!(dir.path().join("corpus.csv").exists());
}

#[tokio::test]
async fn test_full_run_table_corpus() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, records()).await;

    let dir = TempDir::new().unwrap();
    let config = config(format!("{}/", mock_server.uri()), CorpusFormat::Table, &dir);
    let report = Pipeline::new(config).unwrap().run().await.expect("Run failed");

    assert!(report.succeeded());
    assert_eq!(report.corpus_texts_count, 2);
    assert!(!dir.path().join("txt").exists());

    let mut reader = csv::Reader::from_path(dir.path().join("corpus.csv")).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|row| row.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][6], "Line one\nLine two");
}

#[tokio::test]
async fn test_resolution_failure_stops_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config(mock_server.uri(), CorpusFormat::Text, &dir);
    let report = Pipeline::new(config).unwrap().run().await.expect("Run failed");

    assert!(!report.get_api_url);
    assert!(!report.get_json);
    assert!(!report.create_corpus);
    assert_eq!(report.endpoint_url, None);
    assert!(!dir.path().join("json").exists());
}

#[tokio::test]
async fn test_download_failure_stops_run() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config(
        format!("{}/wp-json/wp/v2/posts", mock_server.uri()),
        CorpusFormat::Text,
        &dir,
    );
    let report = Pipeline::new(config).unwrap().run().await.expect("Run failed");

    assert!(report.get_api_url);
    assert!(!report.get_json);
    assert!(!report.create_corpus);
    assert_eq!(report.pages_fetched, 0);
}

#[tokio::test]
async fn test_malformed_page_stops_build() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, r#"[{"id": 1, "title": "#.to_string()).await;

    let dir = TempDir::new().unwrap();
    let config = config(format!("{}/", mock_server.uri()), CorpusFormat::Text, &dir);
    let report = Pipeline::new(config).unwrap().run().await.expect("Run failed");

    assert!(report.get_api_url);
    assert!(report.get_json);
    assert!(!report.create_corpus);
    assert_eq!(report.corpus_texts_count, 0);
}

#[tokio::test]
async fn test_resolve_only() {
    let mock_server = MockServer::start().await;
    mount_homepage(&mock_server).await;
    Mock::given(method("GET"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = config(format!("{}/", mock_server.uri()), CorpusFormat::Text, &dir);

    let endpoint = Pipeline::new(config).unwrap().resolve().await.unwrap();
    assert_eq!(
        endpoint.url,
        format!("{}/wp-json/wp/v2/posts", mock_server.uri())
    );
    assert!(!dir.path().join("json").exists());
}

#[test]
fn test_build_only_from_saved_pages() {
    let dir = TempDir::new().unwrap();
    write_json_page(&dir, &records());

    let config = config("https://example.com".to_string(), CorpusFormat::Table, &dir);
    let report = Pipeline::new(config).unwrap().build_only().expect("Build failed");

    assert!(!report.get_api_url);
    assert!(!report.get_json);
    assert!(report.create_corpus);
    assert_eq!(report.corpus_texts_count, 2);
}

#[test]
fn test_build_only_without_pages() {
    let dir = TempDir::new().unwrap();

    let config = config("https://example.com".to_string(), CorpusFormat::Text, &dir);
    let report = Pipeline::new(config).unwrap().build_only().expect("Build failed");

    assert!(!report.create_corpus);
    assert!(report.finished_at.is_some());
}

#[test]
fn test_build_only_unwritable_corpus_dir_is_an_error() {
    let dir = TempDir::new().unwrap();
    write_json_page(&dir, &records());

    let mut config = config("https://example.com".to_string(), CorpusFormat::Text, &dir);
    let blocker = dir.path().join("not-a-directory");
    std::fs::write(&blocker, "occupied").unwrap();
    config.output.corpus_path = Some(blocker);

    let result = Pipeline::new(config).unwrap().build_only();
    assert!(matches!(result, Err(CorpressError::Build(_))));
}

//! Run report
//!
//! The report starts out describing the configuration with every stage
//! marked as not done. Each completed stage produces a [`StageResult`] that
//! is merged into the report; a stage that fails simply contributes nothing,
//! so the report always shows how far the run got.

use crate::api::{ContentType, Endpoint, EndpointSource};
use crate::config::Config;
use crate::corpus::{BuildSummary, CorpusFormat};
use crate::fetch::FetchSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// The result of one completed pipeline stage
#[derive(Debug, Clone)]
pub enum StageResult {
    EndpointResolved(Endpoint),
    PagesFetched(FetchSummary),
    CorpusCreated(BuildSummary),
    /// Number of texts in the finished corpus
    CorpusCounted(usize),
}

/// Summary of a pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub url: String,
    pub content_type: ContentType,
    pub endpoint_url: Option<String>,
    pub endpoint_source: Option<EndpointSource>,
    /// Names of the headers sent; values are never reported
    pub headers: Vec<String>,
    pub params: BTreeMap<String, String>,
    /// Stage 1 completed
    pub get_api_url: bool,
    /// Stage 2 completed
    pub get_json: bool,
    /// Stage 3 completed
    pub create_corpus: bool,
    pub corpus_format: CorpusFormat,
    pub json_save_path: Option<PathBuf>,
    pub corpus_save_path: Option<PathBuf>,
    pub table_save_path: Option<PathBuf>,
    pub pages_fetched: u32,
    /// Page count reported by the API
    pub total_pages: u32,
    /// JSON files read by the build stage
    pub pages_processed: usize,
    /// Records converted by the build stage
    pub entries_written: usize,
    pub corpus_texts_count: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    /// Creates a report for a run that has not completed any stage
    pub fn new(config: &Config) -> Self {
        Self {
            url: config.site.url.clone(),
            content_type: config.site.content_type,
            endpoint_url: None,
            endpoint_source: None,
            headers: config.site.headers.keys().cloned().collect(),
            params: config.query_params().into_iter().collect(),
            get_api_url: false,
            get_json: false,
            create_corpus: false,
            corpus_format: config.output.format,
            json_save_path: config.output.json_path.clone(),
            corpus_save_path: config.output.corpus_path.clone(),
            table_save_path: config.output.table_path.clone(),
            pages_fetched: 0,
            total_pages: 0,
            pages_processed: 0,
            entries_written: 0,
            corpus_texts_count: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Returns the report with a stage's result folded in
    pub fn merge(self, result: StageResult) -> Self {
        match result {
            StageResult::EndpointResolved(endpoint) => Self {
                get_api_url: true,
                endpoint_url: Some(endpoint.url),
                endpoint_source: Some(endpoint.source),
                ..self
            },
            StageResult::PagesFetched(summary) => Self {
                get_json: true,
                pages_fetched: summary.pages_saved,
                total_pages: summary.total_pages,
                ..self
            },
            StageResult::CorpusCreated(summary) => Self {
                create_corpus: true,
                pages_processed: summary.pages_processed,
                entries_written: summary.entries_written,
                ..self
            },
            StageResult::CorpusCounted(count) => Self {
                corpus_texts_count: count,
                ..self
            },
        }
    }

    /// Returns the report stamped with its finish time
    pub fn finish(self) -> Self {
        Self {
            finished_at: Some(Utc::now()),
            ..self
        }
    }

    /// Returns true if the corpus was created
    pub fn succeeded(&self) -> bool {
        self.create_corpus
    }

    /// Returns the report as key/value rows, in pipeline order
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("url", self.url.clone()),
            ("content_type", self.content_type.to_string()),
            ("endpoint_url", display_option(self.endpoint_url.as_deref())),
            (
                "endpoint_source",
                display_option(self.endpoint_source.map(|s| s.to_string()).as_deref()),
            ),
            ("headers", self.headers.join(", ")),
            (
                "params",
                self.params
                    .iter()
                    .map(|(key, value)| format!("{}={}", key, value))
                    .collect::<Vec<_>>()
                    .join("&"),
            ),
            ("get_api_url", self.get_api_url.to_string()),
            ("get_json", self.get_json.to_string()),
            ("create_corpus", self.create_corpus.to_string()),
            ("corpus_format", self.corpus_format.to_string()),
            ("json_save_path", display_path(self.json_save_path.as_ref())),
            ("corpus_save_path", display_path(self.corpus_save_path.as_ref())),
            ("table_save_path", display_path(self.table_save_path.as_ref())),
            ("pages_fetched", self.pages_fetched.to_string()),
            ("total_pages", self.total_pages.to_string()),
            ("pages_processed", self.pages_processed.to_string()),
            ("entries_written", self.entries_written.to_string()),
            ("corpus_texts_count", self.corpus_texts_count.to_string()),
        ]
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

        writeln!(f, "=== corpress Run Report ===")?;
        writeln!(f)?;
        writeln!(f, "  {:<width$}  Value", "Key", width = width)?;
        for (key, value) in entries {
            writeln!(f, "  {:<width$}  {}", key, value, width = width)?;
        }
        if let Some(finished_at) = self.finished_at {
            let elapsed = finished_at - self.started_at;
            writeln!(f)?;
            writeln!(f, "Finished in {}s", elapsed.num_seconds())?;
        }
        Ok(())
    }
}

fn display_option(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string())
}

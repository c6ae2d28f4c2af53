//! Pipeline coordinator
//!
//! Stage failures caused by the site or the data (no API, a blocked
//! download, a malformed page) end the run early and are visible in the
//! returned report. Only environment failures while building the corpus,
//! such as an unwritable output directory, are returned as errors.

use crate::api::{resolve_endpoint, Endpoint};
use crate::config::Config;
use crate::corpus::{build_corpus, count_corpus_files, count_table_rows, BuildSummary, CorpusFormat};
use crate::fetch::{build_http_client, FetchSummary, PageFetcher};
use crate::pipeline::report::{RunReport, StageResult};
use crate::{ConfigError, CorpressError};
use reqwest::Client;

/// Runs the resolve → fetch → build pipeline for one configuration
pub struct Pipeline {
    config: Config,
    client: Client,
}

impl Pipeline {
    /// Creates a pipeline with an HTTP client built from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(CorpressError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, CorpressError> {
        let client = build_http_client(&config.http_settings())?;
        Ok(Self::with_client(config, client))
    }

    /// Creates a pipeline that uses the given HTTP client
    pub fn with_client(config: Config, client: Client) -> Self {
        Self { config, client }
    }

    /// Runs all three stages and returns the report
    ///
    /// The report is printed first when `show_report` is enabled.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - The run ended, successfully or not; see
    ///   [`RunReport::succeeded`]
    /// * `Err(CorpressError)` - An unexpected error while building the corpus
    pub async fn run(&self) -> Result<RunReport, CorpressError> {
        let report = self.execute().await?.finish();
        self.show(&report);
        Ok(report)
    }

    /// Resolves the endpoint only
    pub async fn resolve(&self) -> Result<Endpoint, CorpressError> {
        let site = self.config.site()?;
        Ok(resolve_endpoint(&self.client, &site, self.config.site.content_type).await?)
    }

    /// Builds the corpus from pages already on disk, without network access
    pub fn build_only(&self) -> Result<RunReport, CorpressError> {
        let report = RunReport::new(&self.config);
        let report = match self.build_stage()? {
            Some(summary) => report.merge(StageResult::CorpusCreated(summary)),
            None => return Ok(self.finish_early(report)),
        };

        let count = self.count_corpus()?;
        let report = report.merge(StageResult::CorpusCounted(count)).finish();
        self.show(&report);
        Ok(report)
    }

    async fn execute(&self) -> Result<RunReport, CorpressError> {
        let report = RunReport::new(&self.config);

        let endpoint = match self.resolve_stage().await {
            Some(endpoint) => endpoint,
            None => {
                tracing::error!("No endpoint URL detected. Exiting.");
                return Ok(report);
            }
        };
        let report = report.merge(StageResult::EndpointResolved(endpoint.clone()));

        let report = match self.fetch_stage(&endpoint).await {
            Some(summary) => report.merge(StageResult::PagesFetched(summary)),
            None => {
                tracing::error!("Error downloading data. Exiting.");
                return Ok(report);
            }
        };

        let report = match self.build_stage()? {
            Some(summary) => report.merge(StageResult::CorpusCreated(summary)),
            None => return Ok(report),
        };

        let count = self.count_corpus()?;
        tracing::info!("Corpus contains {} texts", count);
        Ok(report.merge(StageResult::CorpusCounted(count)))
    }

    async fn resolve_stage(&self) -> Option<Endpoint> {
        let site = self
            .config
            .site()
            .map_err(|e| tracing::error!("{}", e))
            .ok()?;

        resolve_endpoint(&self.client, &site, self.config.site.content_type)
            .await
            .ok()
    }

    async fn fetch_stage(&self, endpoint: &Endpoint) -> Option<FetchSummary> {
        let options = self
            .config
            .fetch_options()
            .map_err(|e| tracing::error!("{}", e))
            .ok()?;

        match PageFetcher::new(self.client.clone())
            .fetch(endpoint, &options)
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::error!("{}", e);
                None
            }
        }
    }

    /// Runs the build stage
    ///
    /// Input problems end the stage (`Ok(None)`); anything else is logged and
    /// returned as an error.
    fn build_stage(&self) -> Result<Option<BuildSummary>, CorpressError> {
        let options = match self.config.corpus_options() {
            Ok(options) => options,
            Err(e) => {
                tracing::error!("Error creating corpus: {}", e);
                return Ok(None);
            }
        };

        match build_corpus(&options) {
            Ok(summary) => Ok(Some(summary)),
            Err(e) if e.is_input_error() => {
                tracing::error!("Error creating corpus: {}", e);
                Ok(None)
            }
            Err(e) => {
                tracing::error!("Exception - {} - exiting by raising error", e);
                Err(e.into())
            }
        }
    }

    /// Counts the texts in the finished corpus
    fn count_corpus(&self) -> Result<usize, CorpressError> {
        let output = &self.config.output;
        let count = match output.format {
            CorpusFormat::Text => {
                let dir = output.corpus_path.as_deref().ok_or_else(|| {
                    ConfigError::Validation("corpus_path is required for the text format".into())
                })?;
                count_corpus_files(dir)?
            }
            CorpusFormat::Table => {
                let path = output.table_path.as_deref().ok_or_else(|| {
                    ConfigError::Validation("table_path is required for the table format".into())
                })?;
                count_table_rows(path)?
            }
        };
        Ok(count)
    }

    fn finish_early(&self, report: RunReport) -> RunReport {
        let report = report.finish();
        self.show(&report);
        report
    }

    fn show(&self, report: &RunReport) {
        if self.config.output.show_report {
            println!("{}", report);
        }
    }
}

use crate::config::types::{Config, OutputConfig, RequestConfig, SiteConfig};
use crate::corpus::CorpusFormat;
use crate::ConfigError;
use std::path::Path;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    config.header_map()?;
    validate_request_config(&config.request)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the site URL
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site url '{}': {}", config.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Site url '{}' must use http or https",
            config.url
        )));
    }

    Ok(())
}

/// Validates request pacing
///
/// A delay below one second is not an error; the fetcher raises it.
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    if config.timeout_seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_seconds must be >= 1, got {}",
            config.timeout_seconds
        )));
    }

    if config.params.contains_key("page") {
        tracing::warn!("The 'page' query parameter is set by corpress and will be ignored");
    }

    Ok(())
}

/// Validates that the paths the chosen format needs are present
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if !is_present(config.json_path.as_deref()) {
        return Err(ConfigError::Validation(
            "json_path cannot be empty".to_string(),
        ));
    }

    match config.format {
        CorpusFormat::Text if !is_present(config.corpus_path.as_deref()) => {
            Err(ConfigError::Validation(
                "corpus_path is required for the text format".to_string(),
            ))
        }
        CorpusFormat::Table if !is_present(config.table_path.as_deref()) => {
            Err(ConfigError::Validation(
                "table_path is required for the table format".to_string(),
            ))
        }
        _ => Ok(()),
    }
}

fn is_present(path: Option<&Path>) -> bool {
    path.is_some_and(|path| !path.as_os_str().is_empty())
}

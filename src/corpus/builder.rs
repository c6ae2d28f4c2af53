//! Corpus builder
//!
//! Reads every `*.json` page in the JSON directory and writes the corpus in
//! one of two layouts:
//!
//! | Format | Per-record files | CSV table |
//! |--------|------------------|-----------|
//! | Text | `{date}-{type}-{id}-{slug}.txt` | optional, metadata with `filename` column |
//! | Table | none | required, corpus with `text` column |
//!
//! Pages are processed in file name order. Each page is decoded and converted
//! in full before any of its entries are written, so a bad page leaves no
//! output of its own behind.

use crate::corpus::{CorpusEntry, CorpusFormat, Record};
use serde_json::error::Category;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that stop a corpus build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error decoding JSON file {file}: {source}")]
    Decode {
        file: String,
        source: serde_json::Error,
    },

    #[error("Unexpected JSON content in {file}: {message}")]
    Structure { file: String, message: String },

    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("CSV error on {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

impl BuildError {
    /// Returns true for failures caused by bad input rather than the environment
    ///
    /// These end the build stage but not the caller; everything else is
    /// propagated.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Decode { .. } | Self::Structure { .. }
        )
    }
}

/// Where to read pages from and what to produce
#[derive(Debug, Clone)]
pub struct CorpusOptions {
    pub format: CorpusFormat,
    /// Directory holding the saved JSON pages
    pub json_dir: PathBuf,
    /// Directory for per-record text files (text format only, required there)
    pub corpus_dir: Option<PathBuf>,
    /// CSV output: metadata in text format, the corpus itself in table format
    pub table_path: Option<PathBuf>,
    /// Head each text file with the title and a blank line
    pub include_title: bool,
}

impl CorpusOptions {
    pub fn new(format: CorpusFormat, json_dir: impl Into<PathBuf>) -> Self {
        Self {
            format,
            json_dir: json_dir.into(),
            corpus_dir: None,
            table_path: None,
            include_title: true,
        }
    }

    pub fn with_corpus_dir(mut self, corpus_dir: impl Into<PathBuf>) -> Self {
        self.corpus_dir = Some(corpus_dir.into());
        self
    }

    pub fn with_table_path(mut self, table_path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(table_path.into());
        self
    }

    pub fn with_include_title(mut self, include_title: bool) -> Self {
        self.include_title = include_title;
        self
    }
}

/// Outcome of a completed build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages_processed: usize,
    pub entries_written: usize,
}

/// Writes corpus rows to a CSV table
struct TableWriter {
    path: PathBuf,
    format: CorpusFormat,
    writer: csv::Writer<File>,
}

impl TableWriter {
    fn create(path: &Path, format: CorpusFormat) -> Result<Self, BuildError> {
        ensure_parent_dir(path)?;
        tracing::info!(
            "Creating CSV file for {}: {}",
            format.table_role(),
            path.display()
        );

        let writer = csv::Writer::from_path(path).map_err(|source| BuildError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let mut table = Self {
            path: path.to_path_buf(),
            format,
            writer,
        };
        table.write(&format.columns())?;
        Ok(table)
    }

    fn write_entry(&mut self, entry: &CorpusEntry) -> Result<(), BuildError> {
        let id = entry.id.to_string();
        let last = match self.format {
            CorpusFormat::Text => entry.filename.as_str(),
            CorpusFormat::Table => entry.text.as_str(),
        };
        self.write(&[
            entry.date.as_str(),
            entry.datetime.as_str(),
            entry.kind.as_str(),
            id.as_str(),
            entry.title.as_str(),
            entry.link.as_str(),
            last,
        ])
    }

    fn write(&mut self, row: &[&str]) -> Result<(), BuildError> {
        self.writer.write_record(row).map_err(|source| BuildError::Csv {
            path: self.path.clone(),
            source,
        })
    }

    fn finish(mut self) -> Result<(), BuildError> {
        self.writer.flush().map_err(|source| BuildError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Builds a corpus from the saved JSON pages
///
/// # Arguments
///
/// * `options` - Source directory, output format and destinations
///
/// # Returns
///
/// * `Ok(BuildSummary)` - All pages were converted
/// * `Err(BuildError)` - The build stopped; see [`BuildError::is_input_error`]
///
/// # Example
///
/// ```no_run
/// use corpress::corpus::{build_corpus, CorpusOptions};
/// use corpress::CorpusFormat;
///
/// let options = CorpusOptions::new(CorpusFormat::Text, "data/json")
///     .with_corpus_dir("data/txt")
///     .with_table_path("data/metadata.csv");
/// let summary = build_corpus(&options).unwrap();
/// println!("{} texts written", summary.entries_written);
/// ```
pub fn build_corpus(options: &CorpusOptions) -> Result<BuildSummary, BuildError> {
    tracing::info!("Creating corpus in {} format", options.format);

    if !options.json_dir.is_dir() {
        tracing::error!(
            "Path to JSON data does not exist: {}",
            options.json_dir.display()
        );
        return Err(BuildError::Config(format!(
            "JSON directory {} does not exist",
            options.json_dir.display()
        )));
    }

    let corpus_dir = match options.format {
        CorpusFormat::Text => {
            let dir = options.corpus_dir.as_deref().ok_or_else(|| {
                tracing::error!("No corpus save path provided");
                BuildError::Config("text corpus requires a corpus directory".to_string())
            })?;
            prepare_corpus_dir(dir)?;
            Some(dir)
        }
        CorpusFormat::Table => {
            if options.table_path.is_none() {
                tracing::error!("No path provided to save CSV corpus");
                return Err(BuildError::Config(
                    "table corpus requires a table path".to_string(),
                ));
            }
            None
        }
    };

    let mut table = options
        .table_path
        .as_deref()
        .map(|path| TableWriter::create(path, options.format))
        .transpose()?;

    let pages = list_json_pages(&options.json_dir)?;
    let mut entries_written = 0;

    for page in &pages {
        let entries = read_page(page)?;

        for entry in &entries {
            if let Some(table) = table.as_mut() {
                table.write_entry(entry)?;
            }

            if let Some(dir) = corpus_dir {
                let path = dir.join(&entry.filename);
                std::fs::write(&path, entry.file_contents(options.include_title)).map_err(
                    |source| {
                        tracing::error!("Failed to write {}: {}", path.display(), source);
                        BuildError::Io {
                            path: path.clone(),
                            source,
                        }
                    },
                )?;
            }
        }

        entries_written += entries.len();
    }

    if let Some(table) = table {
        table.finish()?;
    }

    tracing::info!(
        "Processed {} JSON files into {} corpus entries",
        pages.len(),
        entries_written
    );

    Ok(BuildSummary {
        pages_processed: pages.len(),
        entries_written,
    })
}

/// Decodes one saved page and converts all of its records
fn read_page(path: &Path) -> Result<Vec<CorpusEntry>, BuildError> {
    let file = display_name(path);
    tracing::info!("Processing JSON: {}", file);

    let bytes = std::fs::read(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<Record> = serde_json::from_slice(&bytes).map_err(|source| {
        match source.classify() {
            Category::Data => {
                tracing::error!("Unexpected JSON file content: {} ({})", file, source);
                BuildError::Structure {
                    file: file.clone(),
                    message: source.to_string(),
                }
            }
            Category::Syntax | Category::Eof => {
                tracing::error!("Error decoding JSON file: {} ({})", file, source);
                BuildError::Decode {
                    file: file.clone(),
                    source,
                }
            }
            Category::Io => BuildError::Io {
                path: path.to_path_buf(),
                source: source.into(),
            },
        }
    })?;

    records
        .iter()
        .map(CorpusEntry::from_record)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|invalid| {
            tracing::error!("Unexpected JSON file content: {} ({})", file, invalid);
            BuildError::Structure {
                file: file.clone(),
                message: invalid.to_string(),
            }
        })
}

/// Lists the `*.json` files in a directory, sorted by file name
fn list_json_pages(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let io_error = |source: io::Error| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut pages = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            pages.push(path);
        }
    }

    pages.sort();
    Ok(pages)
}

fn prepare_corpus_dir(dir: &Path) -> Result<(), BuildError> {
    if dir.is_dir() {
        tracing::info!("Using corpus save path: {}", dir.display());
        return Ok(());
    }

    std::fs::create_dir_all(dir).map_err(|source| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::info!("Created corpus save path: {}", dir.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<(), BuildError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            std::fs::create_dir_all(parent).map_err(|source| BuildError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            tracing::info!("Created path to save CSV file: {}", parent.display());
            Ok(())
        }
        _ => Ok(()),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Counts the entries in a text corpus directory
pub fn count_corpus_files(dir: &Path) -> io::Result<usize> {
    let mut count = 0;
    for entry in std::fs::read_dir(dir)? {
        if entry?.path().is_file() {
            count += 1;
        }
    }
    Ok(count)
}

/// Counts the data rows of a CSV table, excluding the header
pub fn count_table_rows(path: &Path) -> Result<usize, csv::Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut count = 0;
    for record in reader.records() {
        record?;
        count += 1;
    }
    Ok(count)
}

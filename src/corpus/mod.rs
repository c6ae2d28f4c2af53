//! Corpus construction from saved JSON pages
//!
//! This module handles:
//! - Decoding saved pages into records
//! - Turning records into plain-text corpus entries
//! - Writing per-record text files and/or a CSV table
//! - Counting the finished corpus

mod builder;
mod record;
pub mod text;

pub use builder::{
    build_corpus, count_corpus_files, count_table_rows, BuildError, BuildSummary, CorpusOptions,
};
pub use record::{CorpusEntry, InvalidRecord, Record, Rendered};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length of the title slug used in corpus file names
pub const MAX_SLUG_LENGTH: usize = 100;

/// Shape of the corpus output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CorpusFormat {
    /// One `.txt` file per record, plus an optional metadata table
    Text,
    /// A single CSV table with the text of every record inline
    Table,
}

impl CorpusFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Table => "table",
        }
    }

    /// Returns the CSV header columns for this format
    pub fn columns(&self) -> [&'static str; 7] {
        let last = match self {
            Self::Text => "filename",
            Self::Table => "text",
        };
        ["date", "datetime", "type", "id", "title", "link", last]
    }

    /// Describes what the CSV table holds in this format
    pub fn table_role(&self) -> &'static str {
        match self {
            Self::Text => "metadata",
            Self::Table => "corpus",
        }
    }
}

impl fmt::Display for CorpusFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorpusFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "table" | "csv" => Ok(Self::Table),
            other => Err(format!(
                "corpus format must be 'text' or 'table', got '{}'",
                other
            )),
        }
    }
}

impl TryFrom<String> for CorpusFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CorpusFormat> for String {
    fn from(value: CorpusFormat) -> Self {
        value.as_str().to_string()
    }
}

//! Records as served by the API and their corpus form

use crate::corpus::text::{slugify_title, strip_markup, unescape_title};
use crate::corpus::MAX_SLUG_LENGTH;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

/// A rendered field (`{"rendered": "..."}`) of an API record
#[derive(Debug, Clone, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

/// One post or page as returned by the REST API
///
/// Only the fields the corpus needs are decoded; the rest of the record is
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    /// Publication timestamp, e.g. `2024-01-05T10:00:00`
    pub date: String,
    pub title: Rendered,
    pub link: String,
    pub content: Rendered,
}

/// A record that cannot become a corpus entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecord {
    pub id: u64,
    pub reason: String,
}

impl fmt::Display for InvalidRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.id, self.reason)
    }
}

/// The plain-text form of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusEntry {
    /// Publication date, `YYYY-MM-DD`
    pub date: String,
    /// Publication timestamp as served
    pub datetime: String,
    pub kind: String,
    pub id: u64,
    /// Title with character references decoded
    pub title: String,
    pub link: String,
    /// Content with markup removed
    pub text: String,
    /// `{date}-{type}-{id}-{slug}.txt`
    pub filename: String,
}

impl CorpusEntry {
    /// Converts a record, checking that its date starts with a calendar date
    /// and that its type can appear in a file name
    pub fn from_record(record: &Record) -> Result<Self, InvalidRecord> {
        if !is_file_name_safe(&record.kind) {
            return Err(InvalidRecord {
                id: record.id,
                reason: format!("type '{}' cannot be used in a file name", record.kind),
            });
        }

        let date = record
            .date
            .get(..10)
            .filter(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok())
            .ok_or_else(|| InvalidRecord {
                id: record.id,
                reason: format!("date '{}' does not start with YYYY-MM-DD", record.date),
            })?;

        let title = unescape_title(&record.title.rendered);
        let filename = format!(
            "{}-{}-{}-{}.txt",
            date,
            record.kind,
            record.id,
            slugify_title(&title, MAX_SLUG_LENGTH)
        );

        Ok(Self {
            date: date.to_string(),
            datetime: record.date.clone(),
            kind: record.kind.clone(),
            id: record.id,
            title,
            link: record.link.clone(),
            text: strip_markup(&record.content.rendered),
            filename,
        })
    }

    /// Returns the text file contents, optionally headed by the title
    pub fn file_contents(&self, include_title: bool) -> String {
        if include_title {
            format!("{}\n\n{}", self.title, self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Types end up in file names; only ASCII letters, digits, `-` and `_` pass
fn is_file_name_safe(kind: &str) -> bool {
    !kind.is_empty()
        && kind
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

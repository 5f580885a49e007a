use serde::Serialize;
use thiserror::Error;

pub mod aggregate;
pub mod extract;
pub mod schema;
pub mod text;
pub mod url;

pub use aggregate::{AggPapers, extract_and_aggregate};
pub use extract::extract_papers;
pub use schema::LayoutSchema;
pub use text::separate_first_line;
pub use url::resolve_scholar_url;

/// One cited paper as observed in alert emails.
///
/// `title` is the aggregation key: two observations with equal titles are the
/// same logical paper and get merged. `freq` is summed and `refs` concatenated;
/// first-seen wins for everything else.
#[derive(Debug, Clone, Serialize)]
pub struct Paper {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(rename = "abstract")]
    pub abstract_: Abstract,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refs: Vec<PaperRef>,
    /// Times this title was observed across all processed messages.
    pub freq: usize,
}

/// An abstract snippet split into a short first line (for collapsed UIs) and
/// the remainder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Abstract {
    pub first_line: String,
    pub rest: String,
}

/// Provenance of one observation: the message it came from and the normalized
/// source label of that message's subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaperRef {
    pub message_id: String,
    pub source_label: String,
}

/// Counters for one extraction run.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Stats {
    /// Total input messages, successful or not.
    pub messages: usize,
    /// Titles extracted across all messages, before deduplication.
    pub titles: usize,
    /// Messages that failed extraction entirely.
    pub errors: usize,
}

/// What the extractor should pull out beyond title/URL/abstract.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractOptions {
    pub include_authors: bool,
    pub track_refs: bool,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("message {0} has no usable html body")]
    NoBody(String),
    #[error("malformed HTML body of {0:?}")]
    MalformedBody(String),
    #[error("{titles} titles != {urls} urls in {subject:?}")]
    StructuralMismatch {
        titles: usize,
        urls: usize,
        subject: String,
    },
}

#[derive(Error, Debug)]
pub enum UrlError {
    #[error("url {0:?} does not have the scholar redirect prefix")]
    MissingPrefix(String),
    #[error("percent-decoding failed: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

use std::io::Write;

use scholar_digest_core::{AggPapers, Stats};

mod html;
mod json;
mod markdown;

pub use html::render_html;
pub use json::{render_json, render_jsonl};
pub use markdown::render_markdown;

/// Output formats for the digest report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Html,
    Json,
    Jsonl,
}

impl ReportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Jsonl => "jsonl",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "html" => Ok(ReportFormat::Html),
            "json" => Ok(ReportFormat::Json),
            "jsonl" => Ok(ReportFormat::Jsonl),
            other => Err(format!(
                "unknown format {other:?} (expected markdown, html, json or jsonl)"
            )),
        }
    }
}

/// Renders the digest in the given format: the unread papers with run stats,
/// plus an optional archive section of already-read papers.
pub fn render(
    out: &mut dyn Write,
    format: ReportFormat,
    stats: &Stats,
    unread: &AggPapers,
    read: Option<&AggPapers>,
) -> std::io::Result<()> {
    match format {
        ReportFormat::Markdown => render_markdown(out, stats, unread, read),
        ReportFormat::Html => render_html(out, stats, unread, read),
        ReportFormat::Json => render_json(out, stats, unread, read),
        ReportFormat::Jsonl => render_jsonl(out, unread, read),
    }
}

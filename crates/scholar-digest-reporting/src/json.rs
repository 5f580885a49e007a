use std::io::Write;

use scholar_digest_core::{AggPapers, Stats};

/// Writes the whole report as one JSON object: run stats plus the unread and
/// read paper lists in sorted order. The `read` key is present only when an
/// archive was aggregated; `author` and `refs` are omitted from paper objects
/// when empty.
pub fn render_json(
    out: &mut dyn Write,
    stats: &Stats,
    unread: &AggPapers,
    read: Option<&AggPapers>,
) -> std::io::Result<()> {
    let mut report = serde_json::json!({
        "stats": stats,
        "unread": unread.sorted(),
    });
    if let Some(read) = read {
        report["read"] = serde_json::json!(read.sorted());
    }
    serde_json::to_writer(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

/// Writes one paper object per line, unread papers first, then read ones.
pub fn render_jsonl(
    out: &mut dyn Write,
    unread: &AggPapers,
    read: Option<&AggPapers>,
) -> std::io::Result<()> {
    for paper in unread.sorted() {
        serde_json::to_writer(&mut *out, paper)?;
        writeln!(out)?;
    }
    if let Some(read) = read {
        for paper in read.sorted() {
            serde_json::to_writer(&mut *out, paper)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

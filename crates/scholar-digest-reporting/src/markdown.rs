use std::io::Write;

use scholar_digest_core::{AggPapers, Paper, Stats};

/// Writes the digest header, the unread-papers list, and the optional
/// archive section as Markdown. The collapsible abstract blocks use inline
/// `<details>` markup, the same way the alert emails themselves do.
pub fn render_markdown(
    out: &mut dyn Write,
    stats: &Stats,
    unread: &AggPapers,
    read: Option<&AggPapers>,
) -> std::io::Result<()> {
    writeln!(out, "# Google Scholar Alert Digest")?;
    writeln!(out)?;
    writeln!(out, "**Date**: {}", chrono::Utc::now().to_rfc3339())?;
    writeln!(out, "**Unread emails**: {}", stats.messages)?;
    writeln!(out, "**Paper titles**: {}", stats.titles)?;
    writeln!(out, "**Uniq paper titles**: {}", unread.len())?;
    writeln!(out)?;
    writeln!(out, "## New papers")?;
    writeln!(out)?;
    for paper in unread.sorted() {
        write_paper(out, paper, true)?;
    }

    if let Some(read) = read {
        writeln!(out)?;
        writeln!(out, "## Old papers")?;
        writeln!(out)?;
        writeln!(out, "<details>")?;
        writeln!(out, "  <summary>Archive</summary>")?;
        writeln!(out)?;
        for paper in read.sorted() {
            write_paper(out, paper, false)?;
        }
        writeln!(out, "</details>")?;
    }
    Ok(())
}

fn write_paper(out: &mut dyn Write, paper: &Paper, annotate: bool) -> std::io::Result<()> {
    write!(out, " - [{}]({})", paper.title, paper.url)?;
    if !paper.author.is_empty() {
        write!(out, ", <i>{}</i>", paper.author)?;
    }
    if annotate {
        write!(out, " {}", freq_annotation(paper))?;
    }
    writeln!(out)?;
    if !paper.abstract_.first_line.is_empty() {
        writeln!(out, "   <details>")?;
        writeln!(
            out,
            "     <summary>{}</summary><div>{}</div>",
            paper.abstract_.first_line, paper.abstract_.rest
        )?;
        writeln!(out, "   </details>")?;
    }
    Ok(())
}

/// The parenthesized annotation after a title: the bare observation count
/// when refs are not tracked, Gmail deep links to the observing messages
/// otherwise.
fn freq_annotation(paper: &Paper) -> String {
    if paper.refs.is_empty() {
        return format!("({})", paper.freq);
    }
    let links: Vec<String> = paper
        .refs
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "<a href='https://mail.google.com/mail/#inbox/{}'>{}</a>",
                r.message_id,
                i + 1
            )
        })
        .collect();
    if links.len() > 1 {
        format!("({}: {})", paper.freq, links.join(", "))
    } else {
        format!("({})", links.join(", "))
    }
}

use std::io::Write;

use scholar_digest_core::{AggPapers, Paper, Stats};

const STYLE: &str = "\
ul { list-style-type: none; margin: 0; padding: 0 0 0 20px; }
#archive > ul { list-style-type: circle; }
li { margin: 0.4em 0; }
details > div { max-width: 60%; margin-left: 1em; padding: 0.2em 0 0.5em 0; }";

fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

/// Writes the digest as a standalone HTML document: same structure as the
/// Markdown report, with links opening in a new tab.
pub fn render_html(
    out: &mut dyn Write,
    stats: &Stats,
    unread: &AggPapers,
    read: Option<&AggPapers>,
) -> std::io::Result<()> {
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "  <meta charset=\"UTF-8\">")?;
    writeln!(out, "  <base target=\"_blank\">")?;
    writeln!(out, "  <title>scholar alert digest</title>")?;
    writeln!(out, "  <style>{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<h1>Google Scholar Alert Digest</h1>")?;
    writeln!(
        out,
        "<p><b>Date</b>: {}<br><b>Unread emails</b>: {}<br><b>Paper titles</b>: {}<br><b>Uniq paper titles</b>: {}</p>",
        chrono::Utc::now().to_rfc3339(),
        stats.messages,
        stats.titles,
        unread.len()
    )?;

    writeln!(out, "<h2>New papers</h2>")?;
    writeln!(out, "<ul>")?;
    for paper in unread.sorted() {
        write_paper(out, paper, true)?;
    }
    writeln!(out, "</ul>")?;

    if let Some(read) = read {
        writeln!(out, "<h2>Old papers</h2>")?;
        writeln!(out, "<details id=\"archive\">")?;
        writeln!(out, "  <summary>Archive</summary>")?;
        writeln!(out, "<ul>")?;
        for paper in read.sorted() {
            write_paper(out, paper, false)?;
        }
        writeln!(out, "</ul>")?;
        writeln!(out, "</details>")?;
    }

    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(())
}

fn write_paper(out: &mut dyn Write, paper: &Paper, annotate: bool) -> std::io::Result<()> {
    write!(
        out,
        "<li><a href=\"{}\">{}</a>",
        html_escape(&paper.url),
        html_escape(&paper.title)
    )?;
    if !paper.author.is_empty() {
        write!(out, ", <i>{}</i>", html_escape(&paper.author))?;
    }
    if annotate {
        write!(out, " {}", freq_annotation(paper))?;
    }
    writeln!(out)?;
    if !paper.abstract_.first_line.is_empty() {
        writeln!(out, "  <details>")?;
        writeln!(
            out,
            "    <summary>{}</summary>",
            html_escape(&paper.abstract_.first_line)
        )?;
        writeln!(out, "    <div>{}</div>", html_escape(&paper.abstract_.rest))?;
        writeln!(out, "  </details>")?;
    }
    writeln!(out, "</li>")?;
    Ok(())
}

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
                "<a href=\"https://mail.google.com/mail/#inbox/{}\">{}</a>",
                html_escape(&r.message_id),
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

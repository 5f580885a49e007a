use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

use scholar_digest_mail::{Message, normalize_and_split};

use crate::text::separate_first_line;
use crate::url::resolve_scholar_url;
use crate::{Abstract, ExtractError, ExtractOptions, LayoutSchema, Paper, PaperRef};

/// Max runes in the short first line of an abstract, and the slack around it.
const ABSTRACT_FIRST_LINE: usize = 80;
const ABSTRACT_LOOKAHEAD: usize = 10;

/// The author/venue line separates the author list from the venue with a
/// locale-specific dash glyph.
static DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Dash}").unwrap());

/// Parses one message's HTML body into `Paper` records per the given layout.
///
/// A body or structure problem fails the whole message; a bad redirect URL
/// skips only that one paper. A message yielding zero papers is not an error.
pub fn extract_papers(
    msg: &Message,
    schema: &LayoutSchema,
    opts: ExtractOptions,
) -> Result<Vec<Paper>, ExtractError> {
    let subject = msg.subject().to_string();

    let body = msg
        .html_body()
        .map_err(|_| ExtractError::NoBody(msg.id.clone()))?;
    let body =
        String::from_utf8(body).map_err(|_| ExtractError::MalformedBody(subject.clone()))?;
    let doc = Html::parse_document(&body);

    let anchors: Vec<ElementRef> = doc.select(&schema.title_anchor).collect();
    let hrefs: Vec<&str> = anchors
        .iter()
        .filter_map(|a| a.value().attr("href"))
        .collect();
    if anchors.len() != hrefs.len() {
        return Err(ExtractError::StructuralMismatch {
            titles: anchors.len(),
            urls: hrefs.len(),
            subject,
        });
    }

    let source = normalize_and_split(&subject)
        .map(|(source, _)| source)
        .unwrap_or_default();

    let mut papers = Vec::new();
    for (anchor, href) in anchors.iter().zip(&hrefs) {
        let title = anchor.text().collect::<String>().trim().to_string();

        let url = match resolve_scholar_url(href) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(title = %title, subject = %subject, error = %e, "skipping paper");
                continue;
            }
        };

        let (author_text, abstract_text) = sibling_blocks(*anchor, schema);
        let author = if opts.include_authors {
            extract_paper_author(&author_text)
        } else {
            String::new()
        };
        let (first_line, rest) = separate_first_line(
            abstract_text.trim(),
            ABSTRACT_FIRST_LINE,
            ABSTRACT_LOOKAHEAD,
        );

        let refs = if opts.track_refs {
            vec![PaperRef {
                message_id: msg.id.clone(),
                source_label: source.clone(),
            }]
        } else {
            Vec::new()
        };

        papers.push(Paper {
            title,
            url,
            author,
            abstract_: Abstract { first_line, rest },
            source: source.clone(),
            refs,
            freq: 1,
        });
    }
    Ok(papers)
}

/// Text of the author/venue and abstract `<div>`s positioned after the title
/// element. A missing block is an empty string, never an error.
fn sibling_blocks(anchor: ElementRef<'_>, schema: &LayoutSchema) -> (String, String) {
    let Some(title_el) = anchor.parent().and_then(ElementRef::wrap) else {
        return (String::new(), String::new());
    };
    let divs: Vec<ElementRef> = title_el
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "div")
        .collect();
    let text_of = |i: usize| {
        divs.get(i)
            .map(|d| d.text().collect::<String>())
            .unwrap_or_default()
    };
    (text_of(schema.author_div), text_of(schema.abstract_div))
}

/// Author names from the author/venue line: everything before the first dash
/// rune, right-trimmed, then naively title-cased. Every word is capitalized;
/// particles and surnames get no special treatment.
fn extract_paper_author(publication: &str) -> String {
    let author = match DASH.find(publication) {
        Some(m) => publication[..m.start()].trim_end(),
        None => publication,
    };
    title_case(author)
}

/// Word-by-word title casing: a letter following a non-letter is uppercased,
/// every other letter is lowercased.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_letter = true;
        } else {
            out.push(c);
            prev_letter = false;
        }
    }
    out
}

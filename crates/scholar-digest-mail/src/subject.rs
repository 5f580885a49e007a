//! Alert subject normalization.
//!
//! Scholar localizes subject lines per account locale, with three observed
//! shapes: `"<source> <dash> <alert type>"` (EN/FR/JA, with locale-specific
//! dash glyphs), Russian fixed-phrase prefixes/suffixes, and dash-less
//! citation notices (EN/JA). All of them normalize to the same canonical
//! English alert types.

use once_cell::sync::Lazy;
use regex::Regex;

/// Locale variants of one alert-type phrase and its canonical English form.
struct SubjFormat {
    ru: &'static str,
    ja: &'static str,
    en: &'static str,
}

const ARTICLES: SubjFormat = SubjFormat {
    ru: "Новые статьи пользователя ",
    ja: "新しい論文",
    en: "new articles",
};
const CITATIONS: SubjFormat = SubjFormat {
    ru: ": новые ссылки",
    ja: "新しい引用",
    en: "new citations",
};
const RELATED: SubjFormat = SubjFormat {
    ru: "Новые статьи, связанные с работами автора ",
    ja: "関連する新しい研究",
    en: "new related research",
};
const SEARCH: SubjFormat = SubjFormat {
    ru: "Новые результаты по запросу ",
    ja: "新しい結果",
    en: "new results",
};

/// The Russian self-referential citation alert carries no source name at all.
const CITATIONS_TO_ME_RU: &str = "Новые ссылки на мои статьи";

/// Citation notices without a dash separator: English
/// "N new citations to articles by NAME" and Japanese
/// "NAME さんの論文からの引用: N 件" / "自分の論文からの引用: N 件".
static CITATION_NOTICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\d+ new citations? to articles by (.+)$|^(?:(.+) さん|(自分))の論文からの引用: \d+ 件$",
    )
    .unwrap()
});

/// First rune with the Unicode Dash property. Scholar uses hyphens, en/em
/// dashes and locale-specific glyphs, so a fixed ASCII hyphen is not enough.
static DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Dash}").unwrap());

/// Normalizes a raw alert subject into `(source, alert type)` with the alert
/// type in canonical English. Returns `None` when the subject matches no
/// known pattern; callers treat that as a soft condition and keep going.
pub fn normalize_and_split(subj: &str) -> Option<(String, String)> {
    split_on_dash(subj)
        .or_else(|| split_on_ru_locale(subj))
        .or_else(|| split_citation_notice(subj))
}

/// Splits on `" <dash> "` where `<dash>` is the first dash rune found in the
/// subject, then maps a localized alert-type phrase to its English form.
fn split_on_dash(subj: &str) -> Option<(String, String)> {
    let dash = DASH.find(subj).map(|m| m.as_str()).unwrap_or("-");
    let sep = format!(" {dash} ");
    let parts: Vec<&str> = subj.split(&sep).collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }

    let alert_type = match parts[1] {
        t if t == ARTICLES.ru || t == ARTICLES.ja => ARTICLES.en,
        t if t == CITATIONS.ru || t == CITATIONS.ja => CITATIONS.en,
        t if t == RELATED.ru || t == RELATED.ja => RELATED.en,
        t if t == SEARCH.ru || t == SEARCH.ja => SEARCH.en,
        t => t,
    };
    Some((parts[0].to_string(), alert_type.to_string()))
}

/// Russian subjects have no dash separator; the alert type is a fixed phrase
/// prefix or suffix and the source is whatever text remains.
fn split_on_ru_locale(s: &str) -> Option<(String, String)> {
    if s.ends_with(CITATIONS.ru) {
        let cut = s.find(CITATIONS.ru).unwrap_or(s.len() - CITATIONS.ru.len());
        return Some((s[..cut].to_string(), CITATIONS.en.to_string()));
    }
    if s == CITATIONS_TO_ME_RU {
        return Some(("me".to_string(), CITATIONS.en.to_string()));
    }
    if let Some(source) = s.strip_prefix(RELATED.ru) {
        return Some((source.to_string(), RELATED.en.to_string()));
    }
    if let Some(source) = s.strip_prefix(SEARCH.ru) {
        return Some((source.to_string(), SEARCH.en.to_string()));
    }
    if let Some(source) = s.strip_prefix(ARTICLES.ru) {
        return Some((source.to_string(), ARTICLES.en.to_string()));
    }
    None
}

fn split_citation_notice(s: &str) -> Option<(String, String)> {
    let caps = CITATION_NOTICE.captures(s)?;
    let name = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some((name.as_str().to_string(), CITATIONS.en.to_string()))
}

use once_cell::sync::Lazy;
use regex::Regex;

use crate::UrlError;

/// Tracking-redirect prefix on every paper link in an alert email. The TLD is
/// one or more Unicode letters: Scholar serves non-Latin country domains too.
static SCHOLAR_URL_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"http(s)?://scholar\.google\.\p{L}+/scholar_url\?url=").unwrap());

/// Recovers the real paper URL from a scholar redirect link by stripping the
/// tracking prefix, dropping everything after the first `&`, and
/// percent-decoding the remainder.
pub fn resolve_scholar_url(scholar_url: &str) -> Result<String, UrlError> {
    let prefix = SCHOLAR_URL_PREFIX
        .find(scholar_url)
        .ok_or_else(|| UrlError::MissingPrefix(scholar_url.to_string()))?;
    let mut long_url = &scholar_url[prefix.end()..];

    // drop tracking query parameters, if any
    if let Some(suffix) = long_url.find('&') {
        long_url = &long_url[..suffix];
    }

    Ok(urlencoding::decode(long_url)?.into_owned())
}

//! URL handling for the harvester
//!
//! Start-URL validation, origin derivation and the origin-prefix scope check
//! used to keep a crawl on the site it started from.

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses and validates the URL a crawl starts from
///
/// The input is trimmed first. Only absolute `http`/`https` URLs with a host
/// are accepted, since anything else has no origin the crawl could stay on.
///
/// # Examples
///
/// ```
/// use jobscript_harvester::url::parse_start_url;
///
/// let url = parse_start_url(" https://example.com ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// assert!(parse_start_url("not a url").is_err());
/// ```
pub fn parse_start_url(input: &str) -> UrlResult<Url> {
    let trimmed = input.trim();

    let url = Url::parse(trimmed).map_err(|e| UrlError::Parse {
        url: trimmed.to_string(),
        message: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost(trimmed.to_string()));
    }

    Ok(url)
}

/// Returns the serialized origin (scheme, host and non-default port) of a URL
///
/// ```
/// use jobscript_harvester::url::origin_of;
/// use url::Url;
///
/// let url = Url::parse("http://127.0.0.1:8080/about?x=1").unwrap();
/// assert_eq!(origin_of(&url), "http://127.0.0.1:8080");
/// ```
pub fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

/// Checks whether an absolute link belongs to the crawl's origin
///
/// This is a plain string-prefix test, not a structured origin comparison:
/// `https://example.com.evil.com` is in scope of `https://example.com`.
pub fn is_in_scope(link: &str, base_origin: &str) -> bool {
    link.starts_with(base_origin)
}

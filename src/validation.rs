//! Input validation for long URLs and short codes.
//!
//! Everything that reaches the store has gone through one of the two
//! constructors here; the store only ever binds these values as query
//! parameters.

use serde::Serialize;
use std::fmt;
use url::{Host, Url};

use crate::error::{ShortenerError, ShortenerResult};

pub const MAX_LONG_URL_LENGTH: usize = 2048;
pub const MAX_SHORT_CODE_LENGTH: usize = 32;

/// Codes that would shadow a route of the service itself.
const RESERVED_CODES: &[&str] = &["api"];

/// A short code matching `^[A-Za-z0-9]{1,32}$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Wrap a code produced by the generator, which only emits the allowed charset.
    pub(crate) fn new_unchecked(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ShortCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An absolute `http`/`https` URL, as it will be stored and redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LongUrl(String);

impl LongUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LongUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a short code against `^[A-Za-z0-9]{1,32}$` and the reserved list.
pub fn validate_short_code(input: &str) -> ShortenerResult<ShortCode> {
    if input.is_empty() || input.len() > MAX_SHORT_CODE_LENGTH {
        return Err(ShortenerError::InvalidShortCode);
    }

    if !input.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ShortenerError::InvalidShortCode);
    }

    if RESERVED_CODES.contains(&input) {
        return Err(ShortenerError::InvalidShortCode);
    }

    Ok(ShortCode(input.to_string()))
}

/// Validate a long URL and turn it into its stored form.
///
/// Inputs without a scheme (`w3.org/docs`) are treated as `http://` URLs.
/// Scheme-relative inputs (`//host`) are rejected as malformed rather than
/// upgraded.
pub fn validate_long_url(input: &str) -> ShortenerResult<LongUrl> {
    let input = input.trim();

    if input.is_empty() {
        return Err(ShortenerError::InvalidLongUrl);
    }

    if input.starts_with("//") || input.chars().any(|c| c.is_control()) {
        return Err(ShortenerError::MalformedInput);
    }

    let candidate = if has_authority_scheme(input) {
        input.to_string()
    } else {
        format!("http://{input}")
    };

    if candidate.len() > MAX_LONG_URL_LENGTH {
        return Err(ShortenerError::InvalidLongUrl);
    }

    let parsed = Url::parse(&candidate).map_err(|_| ShortenerError::InvalidLongUrl)?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ShortenerError::InvalidLongUrl);
    }

    let host_ok = match parsed.host() {
        Some(Host::Domain(domain)) => is_valid_domain(domain),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        None => false,
    };
    if !host_ok {
        return Err(ShortenerError::InvalidLongUrl);
    }

    // Keep the caller's spelling when it can go straight into a Location
    // header, otherwise fall back to the percent-encoded serialization.
    let stored = if candidate.bytes().all(|b| b.is_ascii_graphic()) {
        candidate
    } else {
        parsed.to_string()
    };

    if stored.len() > MAX_LONG_URL_LENGTH {
        return Err(ShortenerError::InvalidLongUrl);
    }

    Ok(LongUrl(stored))
}

/// True when the input starts with `scheme://`. A `://` further along, as in
/// `w3.org/?next=http://x.com`, does not count.
fn has_authority_scheme(input: &str) -> bool {
    let Some((scheme, rest)) = input.split_once(':') else {
        return false;
    };

    let mut chars = scheme.chars();
    let scheme_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    scheme_ok && rest.starts_with("//")
}

/// `localhost`, or a dotted name with a non-numeric top-level label.
fn is_valid_domain(domain: &str) -> bool {
    if domain == "localhost" {
        return true;
    }

    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    });

    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.len() >= 2 && !tld.bytes().all(|b| b.is_ascii_digit()));

    labels_ok && tld_ok
}

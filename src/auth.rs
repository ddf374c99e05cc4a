//! ApiAuth HMAC request signing.
//!
//! Mingle authenticates API calls with an HMAC key pair downloaded from the
//! user's profile. Each request carries a `Date` header and an
//! `Authorization: APIAuth <login>:<signature>` header, where the signature
//! is the base64 HMAC-SHA1 of a canonical string built from the request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, DATE};
use reqwest::Request;
use sha1::Sha1;
use url::Url;

use crate::error::{MingleError, Result};

type HmacSha1 = Hmac<Sha1>;

const CONTENT_MD5: &str = "content-md5";

/// Current time formatted for the `Date` header.
pub fn date() -> String {
    http_date(Utc::now())
}

/// Format a timestamp as an RFC 7231 IMF-fixdate.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the string that gets signed: content type, content MD5, request
/// URI and date, comma separated. Missing headers contribute empty fields.
pub fn canonical_string(url: &Url, headers: &HeaderMap) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };

    let mut uri = url.path().to_string();
    if uri.is_empty() {
        uri.push('/');
    }
    if let Some(query) = url.query() {
        uri.push('?');
        uri.push_str(query);
    }

    [
        header(CONTENT_TYPE.as_str()),
        header(CONTENT_MD5),
        uri,
        header(DATE.as_str()),
    ]
    .join(",")
}

/// Base64 HMAC-SHA1 of `canonical` keyed by `secret`.
pub fn compute_signature(canonical: &str, secret: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| MingleError::Signing(e.to_string()))?;
    mac.update(canonical.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Sign `request` in place with the given HMAC key pair.
///
/// # Errors
///
/// Returns [`MingleError::Signing`] if the request has no `Date` header or
/// the login cannot be placed in a header.
pub fn sign(request: &mut Request, login: &str, secret: &str) -> Result<()> {
    if !request.headers().contains_key(DATE) {
        return Err(MingleError::Signing(
            "request is missing a Date header".to_string(),
        ));
    }

    let canonical = canonical_string(request.url(), request.headers());
    let signature = compute_signature(&canonical, secret)?;

    let value = HeaderValue::from_str(&format!("APIAuth {login}:{signature}"))
        .map_err(|e| MingleError::Signing(e.to_string()))?;
    request.headers_mut().insert(AUTHORIZATION, value);

    tracing::trace!(%canonical, "signed request");
    Ok(())
}

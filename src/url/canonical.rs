//! Canonical URL form and the dedup key derived from it

use crate::{UrlError, UrlResult};
use sha2::{Digest, Sha512};
use url::Url;

/// Parses user-supplied text into the canonical URL form
///
/// Canonicalization relies on the `url` crate's normalization: the scheme and
/// host are lowercased, the default port is dropped, and the path and query
/// are percent-encoded. The fragment is stripped since it never reaches the
/// server. Two spellings of the same URL therefore produce identical
/// canonical strings, which is what the dedup key depends on.
///
/// # Examples
///
/// ```
/// use rove::canonical_url;
///
/// let url = canonical_url("HTTP://Example.COM/a b").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/a%20b");
/// ```
pub fn canonical_url(input: &str) -> UrlResult<Url> {
    let mut url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}

/// Computes the dedup key for a canonical URL: the SHA-512 digest of its
/// string form, hex-encoded
pub fn url_hash(url: &Url) -> String {
    let digest = Sha512::digest(url.as_str().as_bytes());
    hex::encode(digest)
}

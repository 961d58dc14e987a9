//! URL canonicalization, hashing, and link resolution
//!
//! Every URL entering the store goes through [`canonical_url`] first so that
//! textually different but equivalent spellings collide to one dedup key.

mod canonical;
mod resolve;

pub use canonical::{canonical_url, url_hash};
pub use resolve::{is_http_scheme, resolve_href, within_seed};

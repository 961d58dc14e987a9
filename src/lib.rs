//! Rove: a polite, resumable web-crawler kernel
//!
//! Given a set of seed URLs, Rove repeatedly fetches pages, extracts metadata
//! and outbound links constrained to each seed's origin, and persists all
//! progress so that crawling survives restarts and cannot run twice
//! concurrently. A management process shares the same on-disk store; the
//! kernel exposes no network-facing API of its own.

pub mod config;
pub mod kernel;
pub mod store;
pub mod url;

use thiserror::Error;

/// Main error type for Rove operations
#[derive(Debug, Error)]
pub enum RoveError {
    #[error("another kernel instance already owns the liveness slot")]
    KernelAlreadyActive,

    #[error("settings error: {0}")]
    Settings(#[from] config::SettingsError),

    #[error("store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("failed to parse URL: {0}")]
    Parse(String),

    #[error("unsupported URL scheme: {0}")]
    InvalidScheme(String),

    #[error("missing host in URL")]
    MissingHost,
}

/// Result type alias for Rove operations
pub type Result<T> = std::result::Result<T, RoveError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Settings;
pub use store::Store;
pub use crate::url::{canonical_url, url_hash};

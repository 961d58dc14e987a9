//! Persistent store shared by the kernel and the management surface
//!
//! Five concerns, five SQLite files, all living in the data directory:
//! seeds, the frontier/dedup set, parsed pages, broken links, and the kernel
//! liveness slot. Each operation opens a connection, runs a single atomic
//! statement, and closes it again. There are no cross-call transactions:
//! every write is idempotent or last-writer-wins, which lets the kernel, its
//! seed actors, and an external management process share the files without
//! any locking protocol above SQLite's own.

mod schema;
mod sqlite;

pub use sqlite::Store;

use thiserror::Error;

/// Lower bound of a seed's request interval, in seconds
pub const MIN_REQUEST_INTERVAL: f64 = 0.1;

/// Upper bound of a seed's request interval, in seconds
pub const MAX_REQUEST_INTERVAL: f64 = 100.0;

/// Clamps a request interval into the accepted range
pub fn clamp_request_interval(seconds: f64) -> f64 {
    seconds.clamp(MIN_REQUEST_INTERVAL, MAX_REQUEST_INTERVAL)
}

/// Store-specific errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A configured seed, as persisted in the seeds table
#[derive(Debug, Clone, PartialEq)]
pub struct SeedRecord {
    pub url: String,
    pub url_hash: String,
    pub paused: bool,
    pub meta_data_only: bool,
    pub request_interval: f64,
    pub search_depth: i64,
}

/// A page's extracted metadata, as persisted in the parsed pages table
#[derive(Debug, Clone)]
pub struct ParsedPageRecord {
    pub url: String,
    pub title: String,
    pub description: String,
    pub inserted_at: i64,
}

/// A fetch failure, as persisted in the broken links table
#[derive(Debug, Clone)]
pub struct BrokenLinkRecord {
    pub url_hash: String,
    pub url: String,
    pub parent_url: String,
    pub error_string: String,
}

/// Frontier totals: rows still queued and rows already completed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrontierCounts {
    pub unvisited: u64,
    pub visited: u64,
}

/// Command stored in the kernel liveness row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelCommand {
    Rove,
    Terminate,
}

impl KernelCommand {
    pub fn to_db_string(self) -> &'static str {
        match self {
            Self::Rove => "rove",
            Self::Terminate => "terminate",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "rove" => Some(Self::Rove),
            "terminate" => Some(Self::Terminate),
            _ => None,
        }
    }
}

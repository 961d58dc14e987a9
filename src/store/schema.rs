//! Schema definitions for the per-concern database files
//!
//! Each concern gets its own file so that size caps and corruption are
//! isolated: a full or damaged frontier file never takes the seed list or
//! the liveness slot down with it.

/// File name of the seeds table
pub const SEEDS_DB: &str = "rove_seeds.db";

/// File name of the frontier/dedup table
pub const FRONTIER_DB: &str = "rove_frontier.db";

/// File name of the parsed pages table
pub const PARSED_PAGES_DB: &str = "rove_parsed_pages.db";

/// File name of the broken links table
pub const BROKEN_LINKS_DB: &str = "rove_broken_links.db";

/// File name of the kernel liveness table
pub const KERNEL_DB: &str = "rove_kernel.db";

/// Every database file paired with its schema, for idempotent creation
pub fn all_tables() -> [(&'static str, &'static str); 5] {
    [
        (SEEDS_DB, SEEDS_SQL),
        (FRONTIER_DB, FRONTIER_SQL),
        (PARSED_PAGES_DB, PARSED_PAGES_SQL),
        (BROKEN_LINKS_DB, BROKEN_LINKS_SQL),
        (KERNEL_DB, KERNEL_SQL),
    ]
}

pub const SEEDS_SQL: &str = "
CREATE TABLE IF NOT EXISTS seeds (
    url TEXT NOT NULL,
    url_hash TEXT NOT NULL PRIMARY KEY,
    paused INTEGER NOT NULL DEFAULT 0,
    meta_data_only INTEGER NOT NULL DEFAULT 1,
    request_interval REAL NOT NULL DEFAULT 0.50,
    search_depth INTEGER NOT NULL DEFAULT -1
);
";

pub const FRONTIER_SQL: &str = "
CREATE TABLE IF NOT EXISTS frontier (
    url TEXT NOT NULL PRIMARY KEY,
    visited INTEGER NOT NULL DEFAULT 0
);
";

pub const PARSED_PAGES_SQL: &str = "
CREATE TABLE IF NOT EXISTS parsed_pages (
    url TEXT NOT NULL PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    inserted_at INTEGER NOT NULL
);
";

pub const BROKEN_LINKS_SQL: &str = "
CREATE TABLE IF NOT EXISTS broken_links (
    url_hash TEXT NOT NULL PRIMARY KEY,
    url TEXT NOT NULL,
    parent_url TEXT NOT NULL,
    error_string TEXT NOT NULL
);
";

/// The liveness table holds at most one row: the BEFORE INSERT trigger
/// clears it, so registering a kernel displaces any stale row.
pub const KERNEL_SQL: &str = "
CREATE TABLE IF NOT EXISTS kernel_liveness (
    kernel_process_id INTEGER NOT NULL PRIMARY KEY,
    command TEXT NOT NULL CHECK (command IN ('rove', 'terminate'))
);
CREATE TRIGGER IF NOT EXISTS kernel_liveness_single_row
BEFORE INSERT ON kernel_liveness
BEGIN
    DELETE FROM kernel_liveness;
END;
";

//! SQLite implementation of the persistent store
//!
//! A `Store` is little more than the data directory path plus the table size
//! cap. Every operation opens its own connection and releases it before
//! returning, so a `Store` can be cloned freely into concurrent tasks and
//! shared with an external management process over the filesystem.

use crate::store::schema::{
    all_tables, BROKEN_LINKS_DB, FRONTIER_DB, KERNEL_DB, PARSED_PAGES_DB, SEEDS_DB,
};
use crate::store::{
    clamp_request_interval, BrokenLinkRecord, FrontierCounts, KernelCommand, ParsedPageRecord,
    SeedRecord, StoreResult,
};
use crate::url::{canonical_url, url_hash};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Default byte ceiling per table file
const DEFAULT_MAX_TABLE_BYTES: u64 = 2 * 1024 * 1024 * 1024;

/// Handle to the on-disk store
#[derive(Clone)]
pub struct Store {
    root: PathBuf,
    // Shared across clones so a cap change reaches every live actor
    max_table_bytes: Arc<AtomicU64>,
}

impl Store {
    /// Opens the store rooted at the given directory, creating the directory
    /// and all table files as needed
    pub fn open(root: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(root)?;

        let store = Self {
            root: root.to_path_buf(),
            max_table_bytes: Arc::new(AtomicU64::new(DEFAULT_MAX_TABLE_BYTES)),
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Sets the byte ceiling per table file
    pub fn set_max_table_bytes(&self, bytes: u64) {
        self.max_table_bytes.store(bytes, Ordering::Relaxed);
    }

    /// Creates every table and trigger; a no-op when they already exist
    pub fn create_schema(&self) -> StoreResult<()> {
        for (file, sql) in all_tables() {
            let conn = self.connect(file)?;
            conn.execute_batch(sql)?;
        }
        Ok(())
    }

    fn connect(&self, file: &str) -> StoreResult<Connection> {
        Ok(Connection::open(self.root.join(file))?)
    }

    /// Whether a table file has reached its byte ceiling
    fn table_full(&self, file: &str) -> bool {
        let cap = self.max_table_bytes.load(Ordering::Relaxed);
        match std::fs::metadata(self.root.join(file)) {
            Ok(metadata) => metadata.len() >= cap,
            Err(_) => false,
        }
    }

    // ===== Seeds =====

    /// Adds a seed, overwriting any existing row for the same canonical URL
    ///
    /// Invalid input is silently dropped; re-adding resets the seed's
    /// settings to their defaults, matching an explicit re-add by the
    /// operator.
    pub fn add_seed(&self, url: &str) -> StoreResult<()> {
        let url = match canonical_url(url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("dropping invalid seed {:?}: {}", url, e);
                return Ok(());
            }
        };

        let conn = self.connect(SEEDS_DB)?;
        conn.execute(
            "INSERT OR REPLACE INTO seeds (url, url_hash) VALUES (?1, ?2)",
            params![url.as_str(), url_hash(&url)],
        )?;
        Ok(())
    }

    /// Lists every configured seed
    pub fn list_seeds(&self) -> StoreResult<Vec<SeedRecord>> {
        let conn = self.connect(SEEDS_DB)?;
        let mut stmt = conn.prepare(
            "SELECT url, url_hash, paused, meta_data_only, request_interval, search_depth
             FROM seeds ORDER BY url",
        )?;

        let seeds = stmt
            .query_map([], |row| {
                Ok(SeedRecord {
                    url: row.get(0)?,
                    url_hash: row.get(1)?,
                    paused: row.get::<_, i64>(2)? != 0,
                    meta_data_only: row.get::<_, i64>(3)? != 0,
                    request_interval: row.get(4)?,
                    search_depth: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(seeds)
    }

    /// Removes the seeds with the given hashes
    pub fn remove_seeds(&self, hashes: &[String]) -> StoreResult<()> {
        if hashes.is_empty() {
            return Ok(());
        }

        let conn = self.connect(SEEDS_DB)?;
        for hash in hashes {
            conn.execute("DELETE FROM seeds WHERE url_hash = ?1", params![hash])?;
        }
        Ok(())
    }

    pub fn set_paused(&self, url_hash: &str, paused: bool) -> StoreResult<()> {
        let conn = self.connect(SEEDS_DB)?;
        conn.execute(
            "UPDATE seeds SET paused = ?1 WHERE url_hash = ?2",
            params![paused as i64, url_hash],
        )?;
        Ok(())
    }

    pub fn set_request_interval(&self, url_hash: &str, seconds: f64) -> StoreResult<()> {
        let conn = self.connect(SEEDS_DB)?;
        conn.execute(
            "UPDATE seeds SET request_interval = ?1 WHERE url_hash = ?2",
            params![clamp_request_interval(seconds), url_hash],
        )?;
        Ok(())
    }

    pub fn set_search_depth(&self, url_hash: &str, depth: i64) -> StoreResult<()> {
        let conn = self.connect(SEEDS_DB)?;
        conn.execute(
            "UPDATE seeds SET search_depth = ?1 WHERE url_hash = ?2",
            params![depth, url_hash],
        )?;
        Ok(())
    }

    pub fn set_meta_data_only(&self, url_hash: &str, meta_data_only: bool) -> StoreResult<()> {
        let conn = self.connect(SEEDS_DB)?;
        conn.execute(
            "UPDATE seeds SET meta_data_only = ?1 WHERE url_hash = ?2",
            params![meta_data_only as i64, url_hash],
        )?;
        Ok(())
    }

    /// Looks up a seed's description mode; defaults to meta-only when the
    /// seed is unknown
    pub fn is_meta_data_only(&self, url_hash: &str) -> StoreResult<bool> {
        let conn = self.connect(SEEDS_DB)?;
        let flag: Option<i64> = conn
            .query_row(
                "SELECT meta_data_only FROM seeds WHERE url_hash = ?1",
                params![url_hash],
                |row| row.get(0),
            )
            .optional()?;
        Ok(flag.unwrap_or(1) != 0)
    }

    // ===== Frontier =====

    /// Records a URL's visit state
    ///
    /// Marking unvisited is a discovery: an insert that is a no-op when the
    /// row already exists, which is the dedup guarantee. Marking visited
    /// replaces the row. Either write is skipped once the frontier file has
    /// reached its byte ceiling.
    pub fn mark_visited(&self, url: &str, visited: bool) -> StoreResult<()> {
        if self.table_full(FRONTIER_DB) {
            tracing::warn!("frontier table is at capacity, dropping {}", url);
            return Ok(());
        }

        let conn = self.connect(FRONTIER_DB)?;

        if visited {
            conn.execute(
                "INSERT OR REPLACE INTO frontier (url, visited) VALUES (?1, 1)",
                params![url],
            )?;
        } else {
            // Discoveries are the hottest write path; durability of an
            // individual discovery is not worth an fsync since a lost row is
            // simply rediscovered on the next parse.
            conn.execute_batch("PRAGMA synchronous = OFF")?;
            conn.execute(
                "INSERT OR IGNORE INTO frontier (url, visited) VALUES (?1, 0)",
                params![url],
            )?;
        }

        Ok(())
    }

    /// Picks any unvisited URL whose key has the seed URL as a string prefix
    ///
    /// Prefix matching stands in for a real traversal order; it keeps each
    /// seed's actor inside its own slice of the shared frontier table.
    pub fn next_unvisited_child(&self, seed_url: &str) -> StoreResult<Option<String>> {
        let conn = self.connect(FRONTIER_DB)?;
        let url = conn
            .query_row(
                "SELECT url FROM frontier WHERE url LIKE ?1 AND visited = 0 LIMIT 1",
                params![format!("{}%", seed_url)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(url)
    }

    /// Counts queued and completed frontier rows
    pub fn frontier_counts(&self) -> StoreResult<FrontierCounts> {
        let conn = self.connect(FRONTIER_DB)?;
        let mut counts = FrontierCounts::default();

        conn.query_row(
            "SELECT
                 COUNT(*) FILTER (WHERE visited = 0),
                 COUNT(*) FILTER (WHERE visited = 1)
             FROM frontier",
            [],
            |row| {
                counts.unvisited = row.get::<_, i64>(0)? as u64;
                counts.visited = row.get::<_, i64>(1)? as u64;
                Ok(())
            },
        )?;

        Ok(counts)
    }

    /// Whether a frontier row exists for the URL and is marked visited
    pub fn is_visited(&self, url: &str) -> StoreResult<bool> {
        let conn = self.connect(FRONTIER_DB)?;
        let visited: Option<i64> = conn
            .query_row(
                "SELECT visited FROM frontier WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(visited == Some(1))
    }

    // ===== Parsed pages =====

    /// Upserts a page's extracted metadata
    ///
    /// An empty title or description is substituted with the URL itself so
    /// the management surface always has something to display. Skipped once
    /// the table file has reached its byte ceiling.
    pub fn upsert_parsed_page(&self, url: &str, title: &str, description: &str) -> StoreResult<()> {
        if self.table_full(PARSED_PAGES_DB) {
            tracing::warn!("parsed pages table is at capacity, dropping {}", url);
            return Ok(());
        }

        let title = title.trim();
        let description = description.trim();
        let conn = self.connect(PARSED_PAGES_DB)?;
        conn.execute(
            "INSERT OR REPLACE INTO parsed_pages (url, title, description, inserted_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                url,
                if title.is_empty() { url } else { title },
                if description.is_empty() { url } else { description },
                chrono::Utc::now().timestamp(),
            ],
        )?;
        Ok(())
    }

    /// Looks up a parsed page by URL
    pub fn parsed_page(&self, url: &str) -> StoreResult<Option<ParsedPageRecord>> {
        let conn = self.connect(PARSED_PAGES_DB)?;
        let page = conn
            .query_row(
                "SELECT url, title, description, inserted_at FROM parsed_pages WHERE url = ?1",
                params![url],
                |row| {
                    Ok(ParsedPageRecord {
                        url: row.get(0)?,
                        title: row.get(1)?,
                        description: row.get(2)?,
                        inserted_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(page)
    }

    pub fn parsed_page_count(&self) -> StoreResult<u64> {
        let conn = self.connect(PARSED_PAGES_DB)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM parsed_pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Broken links =====

    /// Upserts a fetch failure, keyed by the hash of the child URL
    ///
    /// Invalid URLs are silently dropped rather than persisted.
    pub fn upsert_broken_link(&self, url: &str, parent_url: &str, error: &str) -> StoreResult<()> {
        let child = match canonical_url(url) {
            Ok(child) => child,
            Err(_) => return Ok(()),
        };
        if canonical_url(parent_url).is_err() {
            return Ok(());
        }
        if self.table_full(BROKEN_LINKS_DB) {
            tracing::warn!("broken links table is at capacity, dropping {}", url);
            return Ok(());
        }

        let conn = self.connect(BROKEN_LINKS_DB)?;
        conn.execute(
            "INSERT OR REPLACE INTO broken_links (url_hash, url, parent_url, error_string)
             VALUES (?1, ?2, ?3, ?4)",
            params![url_hash(&child), url, parent_url, error.trim()],
        )?;
        Ok(())
    }

    /// Lists every recorded fetch failure
    pub fn list_broken_links(&self) -> StoreResult<Vec<BrokenLinkRecord>> {
        let conn = self.connect(BROKEN_LINKS_DB)?;
        let mut stmt = conn.prepare(
            "SELECT url_hash, url, parent_url, error_string FROM broken_links ORDER BY url",
        )?;

        let links = stmt
            .query_map([], |row| {
                Ok(BrokenLinkRecord {
                    url_hash: row.get(0)?,
                    url: row.get(1)?,
                    parent_url: row.get(2)?,
                    error_string: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }

    pub fn broken_link_count(&self) -> StoreResult<u64> {
        let conn = self.connect(BROKEN_LINKS_DB)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM broken_links", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ===== Kernel liveness =====

    /// Registers the given process as the active kernel
    ///
    /// Returns false without writing when a pending terminate request exists:
    /// a shutdown in flight blocks new registration. The single-row trigger
    /// displaces any stale row from a previous kernel.
    pub fn register_kernel(&self, pid: i64) -> StoreResult<bool> {
        let conn = self.connect(KERNEL_DB)?;

        let pending: Option<String> = conn
            .query_row("SELECT command FROM kernel_liveness", [], |row| row.get(0))
            .optional()?;
        if pending.as_deref() == Some(KernelCommand::Terminate.to_db_string()) {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO kernel_liveness (kernel_process_id, command) VALUES (?1, ?2)",
            params![pid, KernelCommand::Rove.to_db_string()],
        )?;
        Ok(true)
    }

    /// Whether any kernel currently owns the liveness slot
    pub fn is_kernel_active(&self) -> StoreResult<bool> {
        let conn = self.connect(KERNEL_DB)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM kernel_liveness", [], |row| {
            row.get(0)
        })?;
        Ok(count > 0)
    }

    /// Process id of the registered kernel, if any
    pub fn kernel_process_id(&self) -> StoreResult<Option<i64>> {
        let conn = self.connect(KERNEL_DB)?;
        let pid = conn
            .query_row("SELECT kernel_process_id FROM kernel_liveness", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(pid)
    }

    /// Asks the registered kernel, whichever process that is, to shut down
    pub fn request_termination(&self) -> StoreResult<()> {
        let conn = self.connect(KERNEL_DB)?;
        conn.execute(
            "UPDATE kernel_liveness SET command = ?1",
            params![KernelCommand::Terminate.to_db_string()],
        )?;
        Ok(())
    }

    /// Whether the kernel running as `pid` should begin shutdown
    ///
    /// True when the stored command for the pid is "terminate", and also when
    /// no row exists for the pid at all: a missing row is an implicit
    /// terminate (someone cleared the slot, or another kernel displaced it).
    /// A store that cannot be read counts as a terminate signal too, since a
    /// kernel that cannot see its liveness row must not keep roving.
    pub fn should_terminate(&self, pid: i64) -> bool {
        match self.stored_command(pid) {
            Ok(Some(command)) => command == KernelCommand::Terminate,
            Ok(None) => {
                // Implicit terminate; clear whatever else may be in the slot
                let _ = self.deregister_all();
                true
            }
            Err(e) => {
                tracing::warn!("liveness check failed, treating as terminate: {}", e);
                true
            }
        }
    }

    fn stored_command(&self, pid: i64) -> StoreResult<Option<KernelCommand>> {
        let conn = self.connect(KERNEL_DB)?;
        let command: Option<String> = conn
            .query_row(
                "SELECT command FROM kernel_liveness WHERE kernel_process_id = ?1",
                params![pid],
                |row| row.get(0),
            )
            .optional()?;
        Ok(command.as_deref().and_then(KernelCommand::from_db_string))
    }

    /// Removes the liveness row for the given process
    pub fn deregister_kernel(&self, pid: i64) -> StoreResult<()> {
        let conn = self.connect(KERNEL_DB)?;
        conn.execute(
            "DELETE FROM kernel_liveness WHERE kernel_process_id = ?1",
            params![pid],
        )?;
        Ok(())
    }

    /// Clears the liveness slot entirely
    pub fn deregister_all(&self) -> StoreResult<()> {
        let conn = self.connect(KERNEL_DB)?;
        conn.execute("DELETE FROM kernel_liveness", [])?;
        Ok(())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("root", &self.root).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_schema_creation_is_idempotent() {
        let (_dir, store) = open_store();
        store.create_schema().unwrap();
        store.create_schema().unwrap();
    }

    #[test]
    fn test_add_and_list_seeds() {
        let (_dir, store) = open_store();
        store.add_seed("https://example.com/").unwrap();

        let seeds = store.list_seeds().unwrap();
        assert_eq!(seeds.len(), 1);
        assert_eq!(seeds[0].url, "https://example.com/");
        assert!(!seeds[0].paused);
        assert!(seeds[0].meta_data_only);
        assert_eq!(seeds[0].request_interval, 0.5);
        assert_eq!(seeds[0].search_depth, -1);
    }

    #[test]
    fn test_readding_a_seed_overwrites_not_duplicates() {
        let (_dir, store) = open_store();
        store.add_seed("https://example.com/").unwrap();
        store.add_seed("HTTPS://EXAMPLE.COM/").unwrap();

        assert_eq!(store.list_seeds().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_seed_is_dropped() {
        let (_dir, store) = open_store();
        store.add_seed("not a url").unwrap();
        store.add_seed("ftp://example.com/").unwrap();
        assert!(store.list_seeds().unwrap().is_empty());
    }

    #[test]
    fn test_seed_settings_updates() {
        let (_dir, store) = open_store();
        store.add_seed("https://example.com/").unwrap();
        let hash = store.list_seeds().unwrap()[0].url_hash.clone();

        store.set_paused(&hash, true).unwrap();
        store.set_request_interval(&hash, 2.0).unwrap();
        store.set_search_depth(&hash, 3).unwrap();
        store.set_meta_data_only(&hash, false).unwrap();

        let seed = store.list_seeds().unwrap().remove(0);
        assert!(seed.paused);
        assert_eq!(seed.request_interval, 2.0);
        assert_eq!(seed.search_depth, 3);
        assert!(!seed.meta_data_only);
        assert!(!store.is_meta_data_only(&hash).unwrap());
    }

    #[test]
    fn test_unknown_seed_defaults_to_meta_only() {
        let (_dir, store) = open_store();
        assert!(store.is_meta_data_only("no-such-hash").unwrap());
    }

    #[test]
    fn test_interval_updates_are_clamped() {
        let (_dir, store) = open_store();
        store.add_seed("https://example.com/").unwrap();
        let hash = store.list_seeds().unwrap()[0].url_hash.clone();

        store.set_request_interval(&hash, 0.001).unwrap();
        assert_eq!(store.list_seeds().unwrap()[0].request_interval, 0.1);

        store.set_request_interval(&hash, 1000.0).unwrap();
        assert_eq!(store.list_seeds().unwrap()[0].request_interval, 100.0);
    }

    #[test]
    fn test_remove_seeds() {
        let (_dir, store) = open_store();
        store.add_seed("https://one.example/").unwrap();
        store.add_seed("https://two.example/").unwrap();
        let hash = store.list_seeds().unwrap()[0].url_hash.clone();

        store.remove_seeds(&[hash]).unwrap();
        assert_eq!(store.list_seeds().unwrap().len(), 1);
    }

    #[test]
    fn test_discovery_is_a_dedup_no_op() {
        let (_dir, store) = open_store();

        // The same link discovered from two different pages
        store.mark_visited("https://s/page", false).unwrap();
        store.mark_visited("https://s/page", false).unwrap();

        let counts = store.frontier_counts().unwrap();
        assert_eq!(counts.unvisited, 1);
        assert_eq!(counts.visited, 0);
    }

    #[test]
    fn test_rediscovery_does_not_reset_visited() {
        let (_dir, store) = open_store();
        store.mark_visited("https://s/page", true).unwrap();
        store.mark_visited("https://s/page", false).unwrap();

        assert!(store.is_visited("https://s/page").unwrap());
        let counts = store.frontier_counts().unwrap();
        assert_eq!(counts.visited, 1);
        assert_eq!(counts.unvisited, 0);
    }

    #[test]
    fn test_marking_visited_replaces() {
        let (_dir, store) = open_store();
        store.mark_visited("https://s/page", false).unwrap();
        store.mark_visited("https://s/page", true).unwrap();

        assert!(store.is_visited("https://s/page").unwrap());
    }

    #[test]
    fn test_next_unvisited_child_prefix_match() {
        let (_dir, store) = open_store();
        store.mark_visited("https://s/a", false).unwrap();
        store.mark_visited("https://other/b", false).unwrap();

        let child = store.next_unvisited_child("https://s/").unwrap();
        assert_eq!(child.as_deref(), Some("https://s/a"));
    }

    #[test]
    fn test_next_unvisited_child_ignores_visited() {
        let (_dir, store) = open_store();
        store.mark_visited("https://s/a", true).unwrap();

        assert_eq!(store.next_unvisited_child("https://s/").unwrap(), None);
    }

    #[test]
    fn test_parsed_page_upsert_and_supersede() {
        let (_dir, store) = open_store();
        store
            .upsert_parsed_page("https://s/", "First", "one two")
            .unwrap();
        store
            .upsert_parsed_page("https://s/", "Second", "three")
            .unwrap();

        let page = store.parsed_page("https://s/").unwrap().unwrap();
        assert_eq!(page.title, "Second");
        assert_eq!(page.description, "three");
        assert_eq!(store.parsed_page_count().unwrap(), 1);
    }

    #[test]
    fn test_empty_title_and_description_substituted_with_url() {
        let (_dir, store) = open_store();
        store.upsert_parsed_page("https://s/", "", "  ").unwrap();

        let page = store.parsed_page("https://s/").unwrap().unwrap();
        assert_eq!(page.title, "https://s/");
        assert_eq!(page.description, "https://s/");
    }

    #[test]
    fn test_broken_link_upsert() {
        let (_dir, store) = open_store();
        store
            .upsert_broken_link("https://s/missing", "https://s/", "HTTP 404")
            .unwrap();
        store
            .upsert_broken_link("https://s/missing", "https://s/", "HTTP 410")
            .unwrap();

        let links = store.list_broken_links().unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].error_string, "HTTP 410");
        assert_eq!(links[0].parent_url, "https://s/");
    }

    #[test]
    fn test_broken_link_with_invalid_url_is_dropped() {
        let (_dir, store) = open_store();
        store
            .upsert_broken_link("::garbage::", "https://s/", "error")
            .unwrap();
        assert_eq!(store.broken_link_count().unwrap(), 0);
    }

    #[test]
    fn test_capacity_cap_stops_new_rows() {
        let (_dir, store) = open_store();
        store.mark_visited("https://s/kept", false).unwrap();

        store.set_max_table_bytes(1);
        store.mark_visited("https://s/dropped", false).unwrap();
        store.upsert_parsed_page("https://s/", "t", "d").unwrap();

        assert_eq!(store.frontier_counts().unwrap().unvisited, 1);
        assert_eq!(store.parsed_page_count().unwrap(), 0);
    }

    #[test]
    fn test_register_and_deregister_kernel() {
        let (_dir, store) = open_store();
        assert!(!store.is_kernel_active().unwrap());

        assert!(store.register_kernel(42).unwrap());
        assert!(store.is_kernel_active().unwrap());
        assert_eq!(store.kernel_process_id().unwrap(), Some(42));

        store.deregister_kernel(42).unwrap();
        assert!(!store.is_kernel_active().unwrap());
    }

    #[test]
    fn test_liveness_slot_holds_one_row() {
        let (_dir, store) = open_store();
        store.register_kernel(1).unwrap();
        store.register_kernel(2).unwrap();

        // The trigger cleared the first row; only pid 2 remains
        assert_eq!(store.kernel_process_id().unwrap(), Some(2));
        // And the displaced kernel sees an implicit terminate
        assert!(store.should_terminate(1));
    }

    #[test]
    fn test_pending_terminate_blocks_registration() {
        let (_dir, store) = open_store();
        store.register_kernel(1).unwrap();
        store.request_termination().unwrap();

        assert!(!store.register_kernel(2).unwrap());
        assert_eq!(store.kernel_process_id().unwrap(), Some(1));
    }

    #[test]
    fn test_terminate_command_targets_registered_pid_only() {
        let (_dir, store) = open_store();
        store.register_kernel(7).unwrap();
        assert!(!store.should_terminate(7));

        store.request_termination().unwrap();
        assert!(store.should_terminate(7));
    }

    #[test]
    fn test_missing_row_is_an_implicit_terminate() {
        let (_dir, store) = open_store();
        assert!(store.should_terminate(99));
    }
}

//! The crawl kernel: scheduler, per-seed actors, fetching, and parsing
//!
//! One kernel process owns one scheduler. The scheduler owns the shared HTTP
//! client and a map of seed URL to actor handle; each actor is a tokio task
//! driving fetch, parse, and enqueue for a single seed. All coordination with
//! the outside world goes through the persistent store.

mod fetch;
mod parser;
mod scheduler;
mod seed;

pub use fetch::{build_client, fetch_page, FetchError, FetchSuccess, SharedClient};
pub use parser::{parse_content, ParsedContent};
pub use scheduler::{run_kernel, Kernel, CONTROL_TICK};
pub use seed::{SeedHandle, SeedSettings, FETCH_ABORT_TIMEOUT};

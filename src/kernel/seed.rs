//! Per-seed crawl actor
//!
//! One tokio task per active seed. The task alternates between one fetch
//! attempt and one backoff interval; at most one fetch is ever in flight for
//! a seed because the attempt is awaited inline. Settings changes arrive on
//! a watch channel and take effect at the next scheduling decision; a new
//! request interval re-arms the backoff timer, and nothing ever touches an
//! in-flight fetch.

use crate::kernel::fetch::{fetch_page, SharedClient};
use crate::kernel::parser::parse_content;
use crate::store::{clamp_request_interval, SeedRecord, Store};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

/// How long a single fetch (including its redirect chain) may take before it
/// is aborted and its partial content dropped
pub const FETCH_ABORT_TIMEOUT: Duration = Duration::from_secs(10);

/// The mutable per-seed settings pushed in by the scheduler
#[derive(Debug, Clone, PartialEq)]
pub struct SeedSettings {
    pub paused: bool,
    pub meta_data_only: bool,
    pub request_interval: f64,
    pub search_depth: i64,
}

impl From<&SeedRecord> for SeedSettings {
    fn from(seed: &SeedRecord) -> Self {
        Self {
            paused: seed.paused,
            meta_data_only: seed.meta_data_only,
            request_interval: seed.request_interval,
            search_depth: seed.search_depth,
        }
    }
}

/// Owning handle to a running seed actor
///
/// The handle is the sole owner of the task: retiring it aborts the task and
/// cancels any in-flight fetch.
pub struct SeedHandle {
    settings_tx: watch::Sender<SeedSettings>,
    task: JoinHandle<()>,
}

impl SeedHandle {
    /// Spawns the actor for a seed
    pub fn spawn(seed: Url, settings: SeedSettings, store: Store, client: SharedClient) -> Self {
        let (settings_tx, settings_rx) = watch::channel(settings);
        let task = tokio::spawn(run_actor(seed, store, client, settings_rx));
        Self { settings_tx, task }
    }

    /// Pushes new settings into the actor; a no-op when nothing changed
    pub fn update(&self, settings: SeedSettings) {
        self.settings_tx.send_if_modified(|current| {
            if *current == settings {
                false
            } else {
                *current = settings;
                true
            }
        });
    }

    /// Retires the actor, cancelling any in-flight fetch
    pub fn retire(self) {
        self.task.abort();
    }
}

/// The actor's main loop: attempt, then back off for one request interval
async fn run_actor(
    seed: Url,
    store: Store,
    client: SharedClient,
    mut settings_rx: watch::Receiver<SeedSettings>,
) {
    let seed_root = seed.to_string();

    loop {
        let settings = settings_rx.borrow_and_update().clone();

        if !settings.paused {
            attempt(&seed_root, &store, &client, &settings).await;
        }

        if !backoff(&mut settings_rx).await {
            return;
        }
    }
}

/// One scheduling decision: pick a target and fetch it
async fn attempt(seed_root: &str, store: &Store, client: &SharedClient, settings: &SeedSettings) {
    // Exhausted frontier restarts at the seed root; the periodic re-crawl of
    // the root is the explicit restart policy, not an accident.
    let target = match store.next_unvisited_child(seed_root) {
        Ok(Some(url)) => url,
        Ok(None) => seed_root.to_string(),
        Err(e) => {
            tracing::warn!("frontier lookup failed for {}: {}", seed_root, e);
            seed_root.to_string()
        }
    };

    let url = match Url::parse(&target) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ => return,
    };

    let client = match client.read() {
        Ok(slot) => slot.clone(),
        Err(_) => return,
    };

    match tokio::time::timeout(FETCH_ABORT_TIMEOUT, fetch_page(&client, &url)).await {
        Err(_) => {
            // Abort timer fired: drop partial content, leave the url
            // unvisited so the next tick may retry it
            tracing::debug!("aborting fetch of {}", url);
        }
        Ok(Err(e)) => {
            tracing::debug!("fetch of {} failed: {}", url, e);
            // Completed for scheduling purposes: the url is not retried
            if let Err(e) = store.mark_visited(url.as_str(), true) {
                tracing::warn!("could not mark {} visited: {}", url, e);
            }
            if let Err(e) = store.upsert_broken_link(url.as_str(), seed_root, &e.to_string()) {
                tracing::warn!("could not record broken link {}: {}", url, e);
            }
        }
        Ok(Ok(fetched)) => {
            // Progress is recorded before parsing so a crash mid-parse does
            // not repeat the fetch
            if let Err(e) = store.mark_visited(url.as_str(), true) {
                tracing::warn!("could not mark {} visited: {}", url, e);
            }

            let parsed = parse_content(
                &fetched.body,
                &fetched.final_url,
                seed_root,
                settings.meta_data_only,
            );

            if let Err(e) = store.upsert_parsed_page(url.as_str(), &parsed.title, &parsed.description)
            {
                tracing::warn!("could not store parsed page {}: {}", url, e);
            }

            for link in &parsed.links {
                if let Err(e) = store.mark_visited(link.as_str(), false) {
                    tracing::warn!("could not record discovery {}: {}", link, e);
                }
            }

            tracing::debug!(
                "parsed {} ({} links, title {:?})",
                url,
                parsed.links.len(),
                parsed.title
            );
        }
    }
}

/// Waits out one request interval
///
/// While paused there is no timer at all; the actor sleeps until the next
/// settings change. An interval change re-arms the timer from now; changes
/// to the other settings leave the running timer alone. Returns false when
/// the settings channel is gone, which means the scheduler dropped this
/// actor's handle.
async fn backoff(settings_rx: &mut watch::Receiver<SeedSettings>) -> bool {
    loop {
        while settings_rx.borrow().paused {
            if settings_rx.changed().await.is_err() {
                return false;
            }
        }

        let mut interval = clamp_request_interval(settings_rx.borrow().request_interval);
        let sleep = tokio::time::sleep(Duration::from_secs_f64(interval));
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return true,
                changed = settings_rx.changed() => {
                    if changed.is_err() {
                        return false;
                    }
                    let settings = settings_rx.borrow().clone();
                    if settings.paused {
                        break;
                    }
                    let updated = clamp_request_interval(settings.request_interval);
                    if updated != interval {
                        interval = updated;
                        sleep.as_mut().reset(
                            tokio::time::Instant::now() + Duration::from_secs_f64(interval),
                        );
                    }
                }
            }
        }
    }
}

//! Kernel scheduler: liveness, control ticks, and the roving actor map
//!
//! The scheduler is the single long-running loop of a kernel process. Every
//! control tick it consults the liveness slot, re-reads the settings file,
//! and reconciles its actor map against the seeds table. Seeds never talk to
//! each other and the scheduler never talks to the network; all coupling
//! goes through the store.

use crate::config::{load_settings, settings_path, Settings};
use crate::kernel::fetch::{build_client, SharedClient};
use crate::kernel::seed::{SeedHandle, SeedSettings};
use crate::store::Store;
use crate::{Result, RoveError};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use url::Url;

/// Period of the combined control/roving tick
pub const CONTROL_TICK: Duration = Duration::from_millis(2500);

/// A running kernel: the actor map plus everything shared across actors
pub struct Kernel {
    store: Store,
    client: SharedClient,
    settings: Settings,
    settings_file: PathBuf,
    /// Actor handles keyed by seed URL
    actors: HashMap<String, SeedHandle>,
    pid: i64,
}

/// Runs a kernel for the store rooted at `home` until it is told to stop
///
/// Claims the liveness slot before doing anything else and releases it on
/// the way out. Fails with [`RoveError::KernelAlreadyActive`] when another
/// live kernel holds the slot.
pub async fn run_kernel(home: PathBuf) -> Result<()> {
    let settings = load_settings(&settings_path(&home))?;
    let store = Store::open(&home)?;
    store.set_max_table_bytes(settings.limits.max_table_bytes);

    let pid = std::process::id() as i64;
    if store.is_kernel_active()? {
        return Err(RoveError::KernelAlreadyActive);
    }
    if !store.register_kernel(pid)? {
        return Err(RoveError::KernelAlreadyActive);
    }
    tracing::info!("kernel {} registered, home {}", pid, home.display());

    let client = Arc::new(RwLock::new(build_client(&settings.proxy)?));

    let mut kernel = Kernel {
        store: store.clone(),
        client,
        settings,
        settings_file: settings_path(&home),
        actors: HashMap::new(),
        pid,
    };

    kernel.run().await;

    for (url, handle) in kernel.actors.drain() {
        tracing::debug!("retiring actor for {}", url);
        handle.retire();
    }
    if let Err(e) = store.deregister_kernel(pid) {
        tracing::warn!("could not release the liveness slot: {}", e);
    }
    tracing::info!("kernel {} stopped", pid);

    Ok(())
}

impl Kernel {
    async fn run(&mut self) {
        let mut ticker = tokio::time::interval(CONTROL_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // One shutdown future for the whole loop; a fresh one per iteration
        // could miss a signal delivered between ticks
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.control_tick() {
                        break;
                    }
                    self.roving_tick();
                }
                _ = &mut shutdown => {
                    tracing::info!("shutdown signal received");
                    break;
                }
            }
        }
    }

    /// Checks the liveness slot and refreshes settings; true means stop
    fn control_tick(&mut self) -> bool {
        if self.store.should_terminate(self.pid) {
            tracing::info!("termination requested, shutting down");
            return true;
        }

        let fresh = match load_settings(&self.settings_file) {
            Ok(fresh) => fresh,
            Err(e) => {
                tracing::warn!("settings reload failed, keeping current: {}", e);
                return false;
            }
        };

        if fresh.proxy != self.settings.proxy {
            match build_client(&fresh.proxy) {
                Ok(client) => {
                    if let Ok(mut slot) = self.client.write() {
                        *slot = client;
                        tracing::info!("proxy settings changed, client swapped");
                    }
                }
                Err(e) => tracing::warn!("new proxy settings rejected: {}", e),
            }
        }

        if fresh.limits != self.settings.limits {
            self.store.set_max_table_bytes(fresh.limits.max_table_bytes);
            tracing::info!(
                "table size cap now {} bytes",
                fresh.limits.max_table_bytes
            );
        }

        self.settings = fresh;
        false
    }

    /// Reconciles the actor map against the seeds table
    fn roving_tick(&mut self) {
        let seeds = match self.store.list_seeds() {
            Ok(seeds) => seeds,
            Err(e) => {
                tracing::warn!("could not list seeds, keeping current actors: {}", e);
                return;
            }
        };

        for seed in &seeds {
            if let Some(handle) = self.actors.get(&seed.url) {
                handle.update(SeedSettings::from(seed));
                continue;
            }

            let url = match Url::parse(&seed.url) {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("stored seed {} does not parse: {}", seed.url, e);
                    continue;
                }
            };

            tracing::info!("starting actor for {}", seed.url);
            let handle = SeedHandle::spawn(
                url,
                SeedSettings::from(seed),
                self.store.clone(),
                Arc::clone(&self.client),
            );
            self.actors.insert(seed.url.clone(), handle);
        }

        // Actors whose seed disappeared are retired in scheduler context;
        // removal from the table is the only way a seed ends.
        let gone: Vec<String> = self
            .actors
            .keys()
            .filter(|url| !seeds.iter().any(|seed| &seed.url == *url))
            .cloned()
            .collect();

        for url in gone {
            if let Some(handle) = self.actors.remove(&url) {
                tracing::info!("retiring actor for removed seed {}", url);
                handle.retire();
            }
        }
    }
}

/// Resolves on SIGINT, and on SIGTERM where that exists
///
/// The signal only breaks the scheduler loop; deregistration and actor
/// retirement run in ordinary task context afterwards.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                tracing::warn!("SIGTERM handler unavailable: {}", e);
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = term.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

//! Rove main entry point
//!
//! This is the command-line interface for the Rove crawler kernel. `rove run`
//! starts the kernel; every other subcommand is a management operation that
//! edits the shared store and is picked up by a running kernel on its next
//! control tick.

use clap::{Parser, Subcommand};
use rove::config::{ensure_home_path, HOME_ENV};
use rove::kernel::run_kernel;
use rove::url::{canonical_url, url_hash};
use rove::Store;
use tracing_subscriber::EnvFilter;

/// Rove: a polite, resumable web-crawler kernel
///
/// Rove crawls the seed sites registered in its store, one page at a time
/// per seed, and persists everything it learns so that crawling resumes
/// where it left off. Set ROVE_HOME to relocate the store.
#[derive(Parser, Debug)]
#[command(name = "rove")]
#[command(version)]
#[command(about = "A polite, resumable web-crawler kernel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the crawler kernel (the default when no command is given)
    Run,

    /// Register a seed URL
    Add {
        /// The seed's root URL; crawling never leaves this prefix
        url: String,

        /// Seconds between requests to this seed
        #[arg(long)]
        interval: Option<f64>,

        /// Search depth to record for this seed (-1 for unlimited)
        #[arg(long)]
        depth: Option<i64>,

        /// Describe pages from their full text instead of meta tags
        #[arg(long)]
        full_text: bool,

        /// Register the seed paused
        #[arg(long)]
        paused: bool,
    },

    /// List registered seeds
    List,

    /// Remove a seed (its actor retires on the kernel's next tick)
    Remove {
        url: String,
    },

    /// Pause crawling of a seed
    Pause {
        url: String,
    },

    /// Resume crawling of a paused seed
    Resume {
        url: String,
    },

    /// Ask the running kernel to shut down
    Terminate,

    /// Show store statistics and kernel status
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let home = ensure_home_path()?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            tracing::info!("Store home: {} (override with {})", home.display(), HOME_ENV);
            run_kernel(home).await?;
        }
        Command::Add {
            url,
            interval,
            depth,
            full_text,
            paused,
        } => handle_add(&home, &url, interval, depth, full_text, paused)?,
        Command::List => handle_list(&home)?,
        Command::Remove { url } => handle_remove(&home, &url)?,
        Command::Pause { url } => handle_pause(&home, &url, true)?,
        Command::Resume { url } => handle_pause(&home, &url, false)?,
        Command::Terminate => handle_terminate(&home)?,
        Command::Stats => handle_stats(&home)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("rove=info,warn"),
            1 => EnvFilter::new("rove=debug,info"),
            2 => EnvFilter::new("rove=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `rove add`: registers a seed and applies any per-seed options
fn handle_add(
    home: &std::path::Path,
    url: &str,
    interval: Option<f64>,
    depth: Option<i64>,
    full_text: bool,
    paused: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonical = canonical_url(url)?;
    let hash = url_hash(&canonical);

    let store = Store::open(home)?;
    store.add_seed(canonical.as_str())?;

    if let Some(seconds) = interval {
        store.set_request_interval(&hash, seconds)?;
    }
    if let Some(depth) = depth {
        store.set_search_depth(&hash, depth)?;
    }
    if full_text {
        store.set_meta_data_only(&hash, false)?;
    }
    if paused {
        store.set_paused(&hash, true)?;
    }

    println!("Added seed: {}", canonical);
    Ok(())
}

/// Handles `rove list`
fn handle_list(home: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(home)?;
    let seeds = store.list_seeds()?;

    if seeds.is_empty() {
        println!("No seeds registered");
        return Ok(());
    }

    for seed in seeds {
        let state = if seed.paused { "paused" } else { "active" };
        let mode = if seed.meta_data_only {
            "meta"
        } else {
            "full-text"
        };
        println!(
            "{} [{}] interval {:.2}s, depth {}, {}",
            seed.url, state, seed.request_interval, seed.search_depth, mode
        );
    }
    Ok(())
}

/// Handles `rove remove`
fn handle_remove(home: &std::path::Path, url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let canonical = canonical_url(url)?;
    let store = Store::open(home)?;
    store.remove_seeds(&[url_hash(&canonical)])?;
    println!("Removed seed: {}", canonical);
    Ok(())
}

/// Handles `rove pause` and `rove resume`
fn handle_pause(
    home: &std::path::Path,
    url: &str,
    paused: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let canonical = canonical_url(url)?;
    let store = Store::open(home)?;
    store.set_paused(&url_hash(&canonical), paused)?;
    println!(
        "{} seed: {}",
        if paused { "Paused" } else { "Resumed" },
        canonical
    );
    Ok(())
}

/// Handles `rove terminate`: asks whichever kernel is registered to stop
fn handle_terminate(home: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(home)?;
    if !store.is_kernel_active()? {
        println!("No kernel is registered");
        return Ok(());
    }
    store.request_termination()?;
    println!("Termination requested; the kernel stops on its next control tick");
    Ok(())
}

/// Handles `rove stats`
fn handle_stats(home: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = Store::open(home)?;

    let seeds = store.list_seeds()?;
    let frontier = store.frontier_counts()?;

    println!("Store home: {}", home.display());
    println!("Seeds: {}", seeds.len());
    println!(
        "Frontier: {} unvisited, {} visited",
        frontier.unvisited, frontier.visited
    );
    println!("Parsed pages: {}", store.parsed_page_count()?);
    println!("Broken links: {}", store.broken_link_count()?);

    match store.kernel_process_id()? {
        Some(pid) => println!("Kernel: active (pid {})", pid),
        None => println!("Kernel: not running"),
    }
    Ok(())
}

//! CLI command implementations

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use cinescope_core::config::CinescopeConfig;
use cinescope_core::trending::{
    AppwriteTrendingStore, InMemoryTrendingStore, OptimisticTrendingStore, TrendingEntry,
};
use cinescope_core::{Result, SearchState, TrendingStore, spawn_search_pipeline};
use cinescope_search::{CatalogProvider, DemoCatalog, TmdbCatalog};
use clap::Subcommand;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;

/// Simulated catalog round trip in demo mode, so loading states are visible.
const DEMO_LATENCY: Duration = Duration::from_millis(300);

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog by title and record the search
    Search {
        /// Title to search for
        query: String,
        /// Print the final search state as JSON
        #[arg(long)]
        json: bool,
    },
    /// List popular movies
    Discover {
        /// Print the final search state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the most searched terms
    Trending {
        /// Number of entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Type queries line by line; results follow as you type
    Interactive,
}

/// Flags that select which backends the commands talk to.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceOptions {
    pub demo: bool,
    pub optimistic: bool,
}

struct Services {
    config: CinescopeConfig,
    catalog: Arc<dyn CatalogProvider>,
    store: Arc<dyn TrendingStore>,
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands, options: ServiceOptions) -> Result<()> {
    let services = build_services(options)?;

    match command {
        Commands::Search { query, json } => run_search(&services, query, json).await,
        Commands::Discover { json } => run_search(&services, String::new(), json).await,
        Commands::Trending { limit } => show_trending(&services, limit).await,
        Commands::Interactive => run_interactive(&services).await,
    }
}

/// Builds the catalog and trending store from environment configuration.
///
/// # Errors
/// - `CinescopeError::Configuration` - Credentials missing outside demo mode
/// - `CinescopeError::Fetch` - Catalog base URL is invalid
/// - `CinescopeError::Store` - Store endpoint or headers are invalid
fn build_services(options: ServiceOptions) -> Result<Services> {
    let config = CinescopeConfig::from_env();

    let (catalog, store): (Arc<dyn CatalogProvider>, Arc<dyn TrendingStore>) = if options.demo {
        tracing::info!("Using demo catalog and in-memory trending store");
        (
            Arc::new(DemoCatalog::new().with_latency(DEMO_LATENCY)),
            wrap_store(InMemoryTrendingStore::new(), options.optimistic),
        )
    } else {
        config.validate()?;
        (
            Arc::new(TmdbCatalog::new(&config.catalog)?),
            wrap_store(AppwriteTrendingStore::new(&config.trending)?, options.optimistic),
        )
    };

    Ok(Services {
        config,
        catalog,
        store,
    })
}

fn wrap_store<S: TrendingStore + 'static>(store: S, optimistic: bool) -> Arc<dyn TrendingStore> {
    if optimistic {
        Arc::new(OptimisticTrendingStore::new(store))
    } else {
        Arc::new(store)
    }
}

/// Runs one query through the pipeline without debouncing.
///
/// # Errors
/// - `CinescopeError::PipelineShutdown` - Pipeline stopped before the fetch settled
/// - `CinescopeError::Io` - Writing to stdout failed
async fn run_search(services: &Services, query: String, json: bool) -> Result<()> {
    let handle = spawn_search_pipeline(
        Arc::clone(&services.catalog),
        Arc::clone(&services.store),
        &services.config.search,
    );

    let state = handle.search(query).await?;
    // Waits for the trending write.
    handle.shutdown().await?;

    let mut stdout = std::io::stdout().lock();
    if json {
        let body = serde_json::to_string_pretty(&state).map_err(std::io::Error::from)?;
        writeln!(stdout, "{body}")?;
    } else {
        render::write_results(&mut stdout, &state)?;
    }

    Ok(())
}

/// Prints the trending list.
///
/// # Errors
/// - `CinescopeError::Store` - Trending store query failed
/// - `CinescopeError::Io` - Writing to stdout failed
async fn show_trending(services: &Services, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(services.config.trending.limit);
    let entries = services.store.fetch_trending(limit).await?;

    let mut stdout = std::io::stdout().lock();
    if entries.is_empty() {
        writeln!(stdout, "No trending searches yet.")?;
    } else {
        render::write_trending(&mut stdout, &entries)?;
    }

    Ok(())
}

/// Interactive session: each stdin line replaces the query, results
/// re-render on every state change.
///
/// # Errors
/// - `CinescopeError::PipelineShutdown` - Pipeline stopped unexpectedly
/// - `CinescopeError::Io` - Reading stdin or writing stdout failed
async fn run_interactive(services: &Services) -> Result<()> {
    let handle = spawn_search_pipeline(
        Arc::clone(&services.catalog),
        Arc::clone(&services.store),
        &services.config.search,
    );
    let mut states = handle.subscribe();
    let limit = services.config.trending.limit;

    let mut trending = load_trending(services.store.as_ref(), limit).await;
    let mut last_settled = 0;

    // Popular titles until the first query arrives.
    handle.submit_query("").await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    draw(&handle.state(), &trending)?;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => handle.type_query(line).await?,
                None => break,
            },
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }

                let state = states.borrow_and_update().clone();
                if !state.is_loading && state.generation > last_settled {
                    last_settled = state.generation;
                    trending = load_trending(services.store.as_ref(), limit).await;
                }
                draw(&state, &trending)?;
            }
        }
    }

    handle.shutdown().await
}

/// Trending list for display. Failures are logged and shown as an empty list.
async fn load_trending(store: &dyn TrendingStore, limit: usize) -> Vec<TrendingEntry> {
    match store.fetch_trending(limit).await {
        Ok(entries) => entries,
        Err(error) => {
            tracing::warn!(%error, "Failed to load trending searches");
            Vec::new()
        }
    }
}

fn draw(state: &SearchState, trending: &[TrendingEntry]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "{CLEAR_SCREEN}")?;
    render::render_with_boundary(&mut stdout, |buffer| {
        render::write_screen(buffer, state, trending)
    })?;
    Ok(())
}

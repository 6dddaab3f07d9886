//! Marquee CLI
//!
//! Drives the suggestion engine from a terminal:
//! - `suggest`: type a query against the TMDB catalog, navigate, commit
//! - `slug`: print the slug for a title and id
//! - `config`: show where the config lives and what is in effect

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marquee_core::catalog::TmdbCatalog;
use marquee_core::config::{Config, Directories};
use marquee_core::slug::generate_slug;
use marquee_core::{
    ControllerUpdate, Key, NavigationTarget, ResultItem, SuggestionEngine, SuggestionSnapshot,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Upper bound on waiting for the debounce and the catalog
const SETTLE_TIMEOUT: Duration = Duration::from_secs(15);

/// Marquee search-suggestion CLI
#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Live search suggestions for movies, TV shows and people")]
#[command(version)]
#[command(after_help = "\
Examples:
  marquee suggest \"the matrix\"              Show suggestions
  marquee suggest jane --down 2 --enter     Commit the second suggestion
  marquee suggest \"the matrix\" --enter      Open the full results page
  marquee slug \"Jane Doe\" 42                Print jane-doe-42
  marquee config                            Show the effective config

The catalog API key is read from the variable named by catalog.apiKeyEnv
(TMDB_API_KEY by default).
")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to ~/.config/marquee/config.json)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type a query and print the suggestions once they settle
    Suggest {
        /// Query text, as typed
        query: String,

        /// Press ArrowDown this many times
        #[arg(long, default_value_t = 0)]
        down: usize,

        /// Press ArrowUp this many times
        #[arg(long, default_value_t = 0)]
        up: usize,

        /// Press Enter after navigating
        #[arg(long)]
        enter: bool,

        /// Print the final state as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the URL slug for a title
    Slug {
        title: String,
        id: u64,
    },

    /// Show the config file path and the effective config
    Config,
}

fn setup_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,marquee=debug,marquee_core=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => {
            Directories::new()
                .context("Failed to locate config directory")?
                .config_file
        }
    };

    match cli.command {
        Commands::Suggest {
            query,
            down,
            up,
            enter,
            json,
        } => {
            let config = load_config(&config_path)?;
            let keys = std::iter::repeat_n(Key::ArrowDown, down)
                .chain(std::iter::repeat_n(Key::ArrowUp, up))
                .chain(enter.then_some(Key::Enter));
            suggest(&config, &query, keys, json).await
        }
        Commands::Slug { title, id } => {
            println!("{}", generate_slug(&title, id));
            Ok(())
        }
        Commands::Config => {
            let config = load_config(&config_path)?;
            let state = if config_path.exists() {
                ""
            } else {
                " (not found, using defaults)"
            };
            println!("Config file: {}{state}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn load_config(path: &std::path::Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("Failed to load config from {}", path.display()))
}

async fn suggest(
    config: &Config,
    query: &str,
    keys: impl Iterator<Item = Key>,
    json: bool,
) -> Result<()> {
    let catalog = TmdbCatalog::from_config(&config.catalog).context("Catalog is not configured")?;
    let router = |target: &NavigationTarget| info!(path = %target, "Navigating");
    let (handle, mut updates, task) =
        SuggestionEngine::spawn(config, Arc::new(catalog), Arc::new(router))?;

    handle.set_query(query)?;
    let settled = tokio::time::timeout(SETTLE_TIMEOUT, wait_until_settled(&mut updates, query))
        .await
        .context("Timed out waiting for suggestions")??;

    let mut pressed = false;
    for key in keys {
        handle.key(key)?;
        pressed = true;
    }
    let snapshot = if pressed {
        handle.snapshot().await?
    } else {
        settled
    };

    let mut navigated = None;
    let mut closed = false;
    while let Ok(update) = updates.try_recv() {
        match update {
            ControllerUpdate::Navigated { target } => navigated = Some(target),
            ControllerUpdate::Closed => closed = true,
            ControllerUpdate::Snapshot(_) => {}
        }
    }

    handle.shutdown();
    task.await.context("Suggestion engine panicked")?;

    if json {
        let output = serde_json::json!({
            "snapshot": snapshot,
            "navigated": navigated,
            "closed": closed,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if let Some(target) = navigated {
        println!("{target}");
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

/// Wait for the first snapshot showing `query` with nothing in flight
async fn wait_until_settled(
    updates: &mut UnboundedReceiver<ControllerUpdate>,
    query: &str,
) -> Result<SuggestionSnapshot> {
    let query = query.trim();
    while let Some(update) = updates.recv().await {
        if let ControllerUpdate::Snapshot(snapshot) = update
            && snapshot.query == query
            && !snapshot.is_loading
        {
            return Ok(snapshot);
        }
    }
    anyhow::bail!("Suggestion engine stopped before suggestions settled")
}

fn print_snapshot(snapshot: &SuggestionSnapshot) {
    if !snapshot.panel_visible {
        println!("(no suggestions)");
        return;
    }

    for (i, item) in snapshot.suggestions.iter().enumerate() {
        let marker = if usize::try_from(snapshot.selected_index).is_ok_and(|s| s == i) {
            '>'
        } else {
            ' '
        };
        println!("{marker} {}", describe(item));
    }

    let marker = if snapshot.is_view_all_selected() {
        '>'
    } else {
        ' '
    };
    println!("{marker} View all results for \"{}\"", snapshot.query);
}

fn describe(item: &ResultItem) -> String {
    match item {
        ResultItem::Media(media) => match media.release_year {
            Some(year) => format!(
                "{} ({year}) [{}]",
                media.title,
                media.media_kind.label()
            ),
            None => format!("{} [{}]", media.title, media.media_kind.label()),
        },
        ResultItem::Person(person) => match &person.department {
            Some(department) => format!("{} [{department}]", person.name),
            None => person.name.clone(),
        },
    }
}

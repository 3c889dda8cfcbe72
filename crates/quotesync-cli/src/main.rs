//! quotesync CLI
//!
//! Wires the core engine to a SQLite-backed durable store and an HTTP remote.
//! The session store is in-memory, so last-viewed state lives exactly as long
//! as one invocation (`watch` being the long-lived case).

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use quotesync_core::{
    ALL_CATEGORIES, CategoryView, HttpRemote, KeyValueStore, MemoryStore, Quote, QuoteDraft,
    QuoteEvent, QuoteStore, SqliteStore, SyncConfig, SyncOutcome, SyncScheduler,
};

/// quotesync - local-first quotes with last-write-wins remote sync
#[derive(Parser)]
#[command(name = "quotesync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage a local quote collection and keep it reconciled with a remote")]
struct Cli {
    /// Custom data directory for the SQLite store
    #[arg(long, global = true, env = "QUOTESYNC_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Remote collection endpoint (GET the collection, POST new quotes)
    #[arg(
        long,
        global = true,
        env = "QUOTESYNC_API_URL",
        default_value = "https://jsonplaceholder.typicode.com/posts"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a quote to the local collection
    Add {
        /// Quote text
        text: String,
        /// Category label
        category: String,
        /// Also offer the new quote to the remote
        #[arg(long)]
        push: bool,
    },

    /// List quotes, filtered by the selected category
    List {
        /// Select (and persist) a category filter; omit to reuse the last one
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a random quote
    Show,

    /// List the categories present in the collection
    Categories,

    /// Import quotes from a JSON file (array of quote objects)
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Export the collection to a JSON file
    Export {
        /// Output path
        file: PathBuf,
    },

    /// Run one reconciliation cycle against the remote
    Sync,

    /// Keep syncing on an interval until interrupted
    Watch {
        /// Seconds between sync attempts
        #[arg(long, env = "QUOTESYNC_SYNC_INTERVAL_SECS", default_value = "5")]
        interval_secs: u64,
    },
}

fn print_quote(quote: &Quote) {
    println!("{}: {}", quote.category.bold(), quote.text);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so exported JSON on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(io::stderr)
        .with_target(false)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();

    let db_path = match &cli.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating data directory {}", dir.display()))?;
            Some(dir.join("quotesync.db"))
        }
        None => None,
    };

    let durable: Arc<dyn KeyValueStore> =
        Arc::new(SqliteStore::new(db_path).context("opening quote database")?);
    let store = Arc::new(QuoteStore::new(
        Arc::clone(&durable),
        Arc::new(MemoryStore::new()),
    ));
    store.load();

    match cli.command {
        Commands::Add {
            text,
            category,
            push,
        } => {
            let quote = store.add(QuoteDraft::new(text, category))?;
            println!(
                "{} {}",
                "added".green(),
                quote.id.map(|id| id.to_string()).unwrap_or_default()
            );
            if push {
                let scheduler = SyncScheduler::new(store, HttpRemote::new(cli.api_url));
                scheduler.push_quote(&quote).await;
            }
        }

        Commands::List { category } => {
            let view = CategoryView::new(Arc::clone(&durable));
            let quotes = match category {
                Some(wanted) => {
                    view.select(&wanted).context("persisting category filter")?;
                    store.filter(&wanted)
                }
                None => view.apply(&store.snapshot()),
            };
            if quotes.is_empty() {
                println!("no quotes in category '{}'", view.selected());
            }
            for quote in &quotes {
                print_quote(quote);
            }
        }

        Commands::Show => match store.random_quote() {
            Some(quote) => print_quote(&quote),
            None => println!("no quotes available, add one first"),
        },

        Commands::Categories => {
            println!("{}", ALL_CATEGORIES);
            for category in store.categories() {
                println!("{category}");
            }
        }

        Commands::Import { file } => {
            let payload = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let count = store.import_json(&payload)?;
            println!("{} {} quotes", "imported".green(), count);
        }

        Commands::Export { file } => {
            let encoded = store.export_json()?;
            std::fs::write(&file, encoded)
                .with_context(|| format!("writing {}", file.display()))?;
            println!("{} {} quotes to {}", "exported".green(), store.len(), file.display());
        }

        Commands::Sync => {
            let scheduler = SyncScheduler::new(Arc::clone(&store), HttpRemote::new(cli.api_url));
            match scheduler.sync_once().await {
                SyncOutcome::Completed { total } => {
                    println!("{}: {} quotes", "synced".green(), total);
                }
                SyncOutcome::NoRemoteData => println!("remote is empty, nothing merged"),
                SyncOutcome::Failed => println!("{}: remote unreachable", "sync failed".red()),
                SyncOutcome::AlreadyRunning => println!("a sync is already in flight"),
            }
        }

        Commands::Watch { interval_secs } => {
            let scheduler = Arc::new(SyncScheduler::with_config(
                Arc::clone(&store),
                HttpRemote::new(cli.api_url),
                SyncConfig::with_interval(Duration::from_secs(interval_secs)),
            ));

            // Print change notifications as they happen
            let mut events = store.subscribe();
            tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    if let QuoteEvent::Synced { total, .. } = event {
                        println!("{}: {} quotes", "synced".green(), total);
                    }
                }
            });

            info!(interval_secs, "starting sync loop");
            scheduler.run().await;
        }
    }

    Ok(())
}

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sluice")]
#[command(about = "Classify syndicated items and publish them as RSS and OPML", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/sluice/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the configured path)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Track a feed endpoint
    Subscribe {
        /// URL of the feed
        url: String,
        /// Display name (defaults to the URL)
        #[arg(short, long)]
        title: Option<String>,
        /// Source platform used for OPML grouping
        #[arg(short, long)]
        platform: Option<String>,
    },
    /// Stop tracking a feed endpoint
    Unsubscribe {
        /// URL of the feed
        url: String,
    },
    /// Import items from a JSON array
    Import {
        /// Path to the JSON file
        path: PathBuf,
    },
    /// Assign categories to items
    Classify {
        /// Reclassify every item, not just unclassified ones
        #[arg(long)]
        all: bool,
        /// Items per batch
        #[arg(short, long)]
        batch_size: Option<usize>,
        /// Use keyword matching even when an API key is available
        #[arg(long)]
        keyword: bool,
    },
    /// Write the master feed, per-category feeds and the OPML list
    Generate {
        /// Output directory for feeds
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        /// OPML output path
        #[arg(long)]
        opml: Option<PathBuf>,
    },
    /// Classify pending items, then generate every document
    Run {
        /// Output directory for feeds
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// List items or subscriptions
    List {
        /// Show subscriptions instead of items
        #[arg(long)]
        subscriptions: bool,
    },
}

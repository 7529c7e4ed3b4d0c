use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sluice::app::AppContext;
use sluice::cli::{commands, Cli, Commands};
use sluice::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let ctx = AppContext::new(config, cli.db)?;

    match cli.command {
        Commands::Subscribe {
            url,
            title,
            platform,
        } => {
            commands::subscribe(&ctx, &url, title, platform)?;
        }
        Commands::Unsubscribe { url } => {
            commands::unsubscribe(&ctx, &url)?;
        }
        Commands::Import { path } => {
            commands::import_items(&ctx, &path)?;
        }
        Commands::Classify {
            all,
            batch_size,
            keyword,
        } => {
            commands::classify(&ctx, all, batch_size, keyword).await?;
        }
        Commands::Generate { output_dir, opml } => {
            commands::generate(&ctx, output_dir, opml)?;
        }
        Commands::Run { output_dir } => {
            commands::run(&ctx, output_dir).await?;
        }
        Commands::List { subscriptions } => {
            if subscriptions {
                commands::list_subscriptions(&ctx)?;
            } else {
                commands::list_items(&ctx)?;
            }
        }
    }

    Ok(())
}

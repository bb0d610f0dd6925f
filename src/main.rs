//! farecast - Main Entry Point

use clap::Parser;
use farecast::cli::{cmd_cache_clear, cmd_cache_list, cmd_prepare, resolve_config, CacheAction, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farecast=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(cli.config.as_deref(), cli.cache.as_deref())?;

    match cli.command {
        Commands::Prepare { data, nrows, prefix, precision, norm } => {
            cmd_prepare(config, data.as_deref(), nrows, prefix.as_deref(), precision, norm.as_deref())?;
        }
        Commands::Cache { action: CacheAction::List } => {
            cmd_cache_list(&config)?;
        }
        Commands::Cache { action: CacheAction::Clear } => {
            cmd_cache_clear(&config)?;
        }
    }

    Ok(())
}

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nexus_core::{Bot, ConfigLoader};
use nexus_registry::BotRegistry;
use nexus_relay::{Bus, RelayService};
use nexus_web_api::ApiServer;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "nexus")]
#[command(about = "Dashboard and command relay for a fleet of trading bots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay and its web API
    Serve {
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
        /// Override the listen address (host:port)
        #[arg(long)]
        addr: Option<String>,
    },
    /// Seed the fleet from a JSON file of bots (no-op on a non-empty registry)
    SeedBots {
        /// JSON file containing an array of bot documents
        #[arg(short, long)]
        file: String,
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config, addr } => {
            let config = ConfigLoader::load_from(&config)?;
            let registry =
                BotRegistry::connect(&config.database.url, config.database.max_connections)
                    .await
                    .context("Failed to open registry database")?;
            let relay = Arc::new(RelayService::new(
                Arc::new(registry),
                Bus::new(config.relay.channel_capacity),
            ));

            let addr = addr.unwrap_or_else(|| config.server.bind_addr());
            ApiServer::new(relay).serve(&addr).await
        }
        Commands::SeedBots { file, config } => {
            let config = ConfigLoader::load_from(&config)?;
            let registry =
                BotRegistry::connect(&config.database.url, config.database.max_connections)
                    .await
                    .context("Failed to open registry database")?;

            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {file}"))?;
            let bots: Vec<Bot> =
                serde_json::from_str(&raw).context("Bot seed file must be a JSON array of bots")?;

            let inserted = registry.seed_if_empty(&bots).await?;
            if inserted == 0 {
                tracing::info!("Registry already initialized, nothing to seed");
            } else {
                tracing::info!("Seeded {} bots from {}", inserted, file);
            }
            Ok(())
        }
    }
}

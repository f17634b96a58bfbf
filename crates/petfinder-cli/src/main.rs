mod pets;
mod proxy;

use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "petfinder-cli")]
#[command(about = "PetFinder command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one load cycle and print the active pet list
    Pets {
        /// Species filter: dog or cat (omit for all)
        #[arg(long = "type")]
        species: Option<String>,
    },
    /// Serve an origin through the offline cache worker
    Proxy {
        /// Origin whose pages and assets are cached, e.g. `http://127.0.0.1:3000/`
        #[arg(long)]
        origin: String,
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: SocketAddr,
        /// Overrides `PETFINDER_CACHE_NAME`
        #[arg(long)]
        cache_name: Option<String>,
        /// Fail startup if any static asset cannot be precached
        #[arg(long)]
        strict: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = petfinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Pets { species } => pets::run_pets(&config, species.as_deref()).await?,
        Commands::Proxy {
            origin,
            bind,
            cache_name,
            strict,
        } => {
            let options = proxy::ProxyOptions {
                origin,
                bind,
                cache_name: cache_name.unwrap_or_else(|| config.cache_name.clone()),
                strict: strict || config.offline_strict_install,
            };
            proxy::run_proxy(&config, options).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;

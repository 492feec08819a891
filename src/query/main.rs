//! Query server for network coverage lookups.
//!
//! Loads the enriched dataset once, then answers
//! `GET /get_network_coverage?address=...` by geocoding the address with
//! the adresse API and aggregating the coverage of its city.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use netcover::geocoding::{AdresseClient, DEFAULT_BASE_URL};
use netcover::service::{router, CoverageService};
use netcover::CoverageDataset;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Network coverage query server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// Enriched network coverage dataset
    #[arg(long, default_value = "data/result/enriched_network_coverage.csv")]
    dataset: PathBuf,

    /// Adresse API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Timeout for address searches, in seconds (none by default)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Netcover Query Server");

    let dataset = Arc::new(CoverageDataset::load(&args.dataset)?);

    info!("Using adresse API at {}", args.api_url);
    let geocoder = AdresseClient::new(&args.api_url, args.timeout_secs.map(Duration::from_secs))?;

    let service = Arc::new(CoverageService::new(dataset, geocoder));
    let app = router(service);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

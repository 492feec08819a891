//! Offline enrichment job.
//!
//! Reprojects the raw Lambert 93 site file, reverse geocodes every site
//! to a city code, maps operator codes to names, and writes the dataset
//! loaded by the query server.

mod config;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use netcover::geocoding::{AdresseClient, DEFAULT_BASE_URL};
use netcover::pipeline::{EnrichmentPipeline, PipelinePaths};

use crate::config::Config;

const DEFAULT_RAW_SITES: &str =
    "data/raw/2018_01_Sites_mobiles_2G_3G_4G_France_metropolitaine_L93.csv";
const DEFAULT_OPERATORS: &str = "data/external/mobile_network_code.csv";
const DEFAULT_OUTPUT: &str = "data/result/enriched_network_coverage.csv";

#[derive(Parser, Debug)]
#[command(name = "enrich")]
#[command(about = "Build the enriched network coverage dataset")]
struct Args {
    /// Optional TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Raw site file (`;` separated, may be gzipped)
    #[arg(long)]
    raw_sites: Option<PathBuf>,

    /// Mobile network code reference file
    #[arg(long)]
    operators: Option<PathBuf>,

    /// Enriched dataset output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Adresse API base URL
    #[arg(long)]
    api_url: Option<String>,

    /// Timeout for the reverse geocoding upload, in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    let paths = PipelinePaths {
        raw_sites: args
            .raw_sites
            .or(config.paths.raw_sites)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_RAW_SITES)),
        operators: args
            .operators
            .or(config.paths.operators)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OPERATORS)),
        output: args
            .output
            .or(config.paths.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
    };
    let api_url = args
        .api_url
        .or(config.api.base_url)
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let timeout = args
        .timeout_secs
        .or(config.api.timeout_secs)
        .map(Duration::from_secs);

    info!("Netcover Enrichment Pipeline");
    info!("Raw sites: {}", paths.raw_sites.display());
    info!("Adresse API: {}", api_url);

    let client = AdresseClient::new(&api_url, timeout)?;
    let pipeline = EnrichmentPipeline::new(client, paths.clone());
    let stats = pipeline.run().await?;

    info!(
        "Enriched {} sites into {} ({} without city code, {} unknown operators)",
        stats.sites,
        paths.output.display(),
        stats.unresolved_citycodes,
        stats.unknown_operators
    );

    Ok(())
}

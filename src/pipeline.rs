//! Offline enrichment of raw mobile site data.
//!
//! Reads the Lambert 93 site file, attaches GPS coordinates, city codes
//! and operator names, and writes the dataset served by `query`.

use anyhow::{ensure, Context, Result};
use csv::ReaderBuilder;
use flate2::read::GzDecoder;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::geocoding::AdresseClient;
use crate::models::{CityCode, EnrichedRecord, SiteRecord, Technology};
use crate::operators::OperatorDirectory;
use crate::projection::Lambert93Projector;

/// Column names of the enriched dataset, in file order
pub const ENRICHED_HEADER: [&str; 10] = [
    "Operateur",
    "x",
    "y",
    "2G",
    "3G",
    "4G",
    "lon",
    "lat",
    "citycode",
    "operator_name",
];

/// Input and output files of one enrichment run
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    /// `;`-separated raw site file, optionally gzipped
    pub raw_sites: PathBuf,
    /// MCC/MNC to operator name reference file
    pub operators: PathBuf,
    /// Enriched dataset to (re)write
    pub output: PathBuf,
}

/// Counters reported at the end of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub sites: usize,
    pub unresolved_citycodes: usize,
    pub unknown_operators: usize,
    /// Sites offering each technology, in `Technology::all()` order
    pub technologies: Vec<(Technology, usize)>,
}

pub struct EnrichmentPipeline {
    client: AdresseClient,
    paths: PipelinePaths,
}

impl EnrichmentPipeline {
    pub fn new(client: AdresseClient, paths: PipelinePaths) -> Self {
        Self { client, paths }
    }

    /// Run every stage in order. Nothing is written unless all succeed.
    pub async fn run(&self) -> Result<PipelineStats> {
        // 1 - Raw sites
        let sites = load_sites(&self.paths.raw_sites)?;

        // 2 - GPS coordinates
        let projector = Lambert93Projector::new()?;
        let lonlat = add_gps_coordinates(&sites, &projector)?;

        // 3 - City codes
        let citycodes = self.add_citycodes(&lonlat).await?;

        // 4 - Operator names
        let directory = OperatorDirectory::load(&self.paths.operators)?;
        let records = join_records(&sites, &lonlat, citycodes, &directory)?;

        // 5 - Export
        write_enriched(&self.paths.output, &records)?;

        let stats = PipelineStats {
            sites: records.len(),
            unresolved_citycodes: records.iter().filter(|r| r.citycode.is_empty()).count(),
            unknown_operators: records.iter().filter(|r| r.operator_name.is_empty()).count(),
            technologies: technology_counts(&records),
        };

        for (technology, count) in &stats.technologies {
            info!("{} sites offer {}", count, technology);
        }

        if stats.unresolved_citycodes > 0 {
            warn!("{} sites have no city code", stats.unresolved_citycodes);
        }
        if stats.unknown_operators > 0 {
            warn!("{} sites have an unknown operator code", stats.unknown_operators);
        }

        Ok(stats)
    }

    async fn add_citycodes(&self, lonlat: &[(f64, f64)]) -> Result<Vec<CityCode>> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?,
        );
        spinner.set_message(format!(
            "Calling {}/reverse/csv/, this might take a few seconds ...",
            self.client.base_url()
        ));
        spinner.enable_steady_tick(Duration::from_millis(120));

        let result = self.client.reverse_citycodes(lonlat).await;
        spinner.finish_and_clear();

        let citycodes = result.context("Reverse geocoding failed")?;
        info!("Resolved city codes for {} sites", citycodes.len());
        Ok(citycodes)
    }
}

/// Load the raw site file (`;` separated, `.gz` decompressed on the fly)
pub fn load_sites(path: &Path) -> Result<Vec<SiteRecord>> {
    info!("Loading raw sites from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open raw site file {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let sites = read_sites(reader)
        .with_context(|| format!("Failed to parse raw site file {}", path.display()))?;

    info!("Loaded {} sites", sites.len());
    Ok(sites)
}

pub fn read_sites<R: Read>(reader: R) -> Result<Vec<SiteRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b';')
        .from_reader(reader);

    let sites = csv_reader
        .deserialize()
        .collect::<Result<Vec<SiteRecord>, _>>()?;
    Ok(sites)
}

/// Reproject every site, aligned with `sites`
pub fn add_gps_coordinates(
    sites: &[SiteRecord],
    projector: &Lambert93Projector,
) -> Result<Vec<(f64, f64)>> {
    let points: Vec<(f64, f64)> = sites.iter().map(|s| (s.x, s.y)).collect();
    let lonlat = projector.to_lonlat_batch(&points)?;

    info!("Reprojected {} sites to WGS84", lonlat.len());
    Ok(lonlat)
}

/// Zip the per-stage columns into enriched rows
pub fn join_records(
    sites: &[SiteRecord],
    lonlat: &[(f64, f64)],
    citycodes: Vec<CityCode>,
    directory: &OperatorDirectory,
) -> Result<Vec<EnrichedRecord>> {
    ensure!(
        sites.len() == lonlat.len() && sites.len() == citycodes.len(),
        "Stage outputs are misaligned: {} sites, {} coordinates, {} city codes",
        sites.len(),
        lonlat.len(),
        citycodes.len()
    );

    let records = sites
        .iter()
        .zip(lonlat)
        .zip(citycodes)
        .map(|((site, &point), citycode)| {
            EnrichedRecord::from_site(site, point, citycode, directory.resolve(site.operator_code))
        })
        .collect();

    Ok(records)
}

/// Number of sites offering each technology
pub fn technology_counts(records: &[EnrichedRecord]) -> Vec<(Technology, usize)> {
    Technology::all()
        .iter()
        .map(|&t| (t, records.iter().filter(|r| r.coverage().get(t)).count()))
        .collect()
}

/// Write the enriched dataset.
///
/// The file is built next to `path` and renamed over it once complete.
/// The header is always written, even with no record.
pub fn write_enriched(path: &Path, records: &[EnrichedRecord]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir).context("Failed to create temporary output file")?;
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(tmp.as_file_mut());
        writer.write_record(ENRICHED_HEADER)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
    }
    tmp.as_file_mut().flush()?;

    tmp.persist(path)
        .with_context(|| format!("Failed to write enriched dataset {}", path.display()))?;

    info!("Wrote {} enriched sites to {}", records.len(), path.display());
    Ok(())
}

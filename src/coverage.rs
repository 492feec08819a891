//! In-memory coverage dataset and per-city aggregation.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::models::site::deserialize_flag;
use crate::models::{CityCode, CityCoverage, EnrichedRecord, TechnologyCoverage};

/// Row of the enriched dataset reduced to what lookups need
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoverageRow {
    pub citycode: CityCode,
    pub operator_name: String,
    #[serde(rename = "2G", deserialize_with = "deserialize_flag")]
    pub has_2g: bool,
    #[serde(rename = "3G", deserialize_with = "deserialize_flag")]
    pub has_3g: bool,
    #[serde(rename = "4G", deserialize_with = "deserialize_flag")]
    pub has_4g: bool,
}

impl CoverageRow {
    pub fn new(citycode: &str, operator_name: &str, coverage: TechnologyCoverage) -> Self {
        Self {
            citycode: CityCode::normalize(citycode),
            operator_name: operator_name.to_string(),
            has_2g: coverage.g2,
            has_3g: coverage.g3,
            has_4g: coverage.g4,
        }
    }

    pub fn coverage(&self) -> TechnologyCoverage {
        TechnologyCoverage::new(self.has_2g, self.has_3g, self.has_4g)
    }
}

impl From<&EnrichedRecord> for CoverageRow {
    fn from(record: &EnrichedRecord) -> Self {
        Self {
            citycode: record.citycode.clone(),
            operator_name: record.operator_name.clone(),
            has_2g: record.has_2g,
            has_3g: record.has_3g,
            has_4g: record.has_4g,
        }
    }
}

/// Read-only coverage table, loaded once and shared by all requests
#[derive(Debug, Clone, Default)]
pub struct CoverageDataset {
    rows: Vec<CoverageRow>,
}

impl CoverageDataset {
    pub fn new(rows: Vec<CoverageRow>) -> Self {
        Self { rows }
    }

    /// Load the enriched dataset CSV produced by the `enrich` job
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading coverage dataset from {}", path.display());

        let file = File::open(path)
            .with_context(|| format!("Failed to open dataset {}", path.display()))?;
        let dataset = Self::from_reader(file)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;

        info!("Loaded {} coverage rows", dataset.len());
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let rows = csv_reader
            .deserialize()
            .collect::<Result<Vec<CoverageRow>, _>>()?;

        Ok(Self::new(rows))
    }

    /// Coverage summary of a city.
    ///
    /// No city code, or a code with no site, gives an empty summary. Sites
    /// whose operator code was never resolved to a name are left out.
    pub fn city_coverage(&self, citycode: Option<&CityCode>) -> CityCoverage {
        let mut summary = CityCoverage::new();

        let Some(citycode) = citycode.filter(|c| !c.is_empty()) else {
            return summary;
        };

        let rows = self
            .rows
            .iter()
            .filter(|r| &r.citycode == citycode && !r.operator_name.is_empty());

        for row in rows {
            summary.add_site(&row.operator_name, row.coverage());
        }

        summary
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<CoverageRow> for CoverageDataset {
    fn from_iter<I: IntoIterator<Item = CoverageRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

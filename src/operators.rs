//! Mobile network operator names, keyed by MCC + MNC.

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Accepted headers for the operator name column. The last one is the
/// mis-decoded UTF-8 found in older exports of the Wikipedia table.
const NAME_COLUMNS: &[&str] = &["Opérateur", "Operateur", "Op√©rateur"];

/// Lookup from operator code (`"<MCC><MNC>"`) to display name
#[derive(Debug, Clone, Default)]
pub struct OperatorDirectory {
    names: HashMap<String, String>,
}

impl OperatorDirectory {
    /// Load the mobile network code reference file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading operator names from {}", path.display());

        let file = File::open(path)
            .with_context(|| format!("Failed to open operator file {}", path.display()))?;
        let directory = Self::from_reader(file)?;

        info!("Loaded {} operator codes", directory.len());
        Ok(directory)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();

        // Find column indices
        let mcc_idx = headers
            .iter()
            .position(|h| h.trim() == "MCC")
            .context("Column 'MCC' not found")?;
        let mnc_idx = headers
            .iter()
            .position(|h| h.trim() == "MNC")
            .context("Column 'MNC' not found")?;
        let name_idx = headers
            .iter()
            .position(|h| NAME_COLUMNS.contains(&h.trim()))
            .context("Column 'Opérateur' not found")?;

        let mut directory = Self::default();
        for result in csv_reader.records() {
            let record = result?;
            let (Some(mcc), Some(mnc), Some(name)) =
                (record.get(mcc_idx), record.get(mnc_idx), record.get(name_idx))
            else {
                continue;
            };

            directory.insert(mcc, mnc, name);
        }

        Ok(directory)
    }

    /// Register an operator; the first name seen for a code is kept
    pub fn insert(&mut self, mcc: &str, mnc: &str, name: &str) {
        let key = operator_key(mcc, mnc);
        if self.names.contains_key(&key) {
            debug!("Duplicate operator code {}, keeping first name", key);
            return;
        }
        self.names.insert(key, name.trim().to_string());
    }

    /// Name for a raw operator code, empty when unknown
    pub fn resolve(&self, operator_code: u32) -> String {
        self.names
            .get(&operator_code.to_string())
            .cloned()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// MCC as-is followed by MNC padded to two digits
pub fn operator_key(mcc: &str, mnc: &str) -> String {
    format!("{}{:0>2}", mcc.trim(), mnc.trim())
}

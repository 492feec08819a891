//! Per-operator radio coverage types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Radio technology generations tracked by the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Technology {
    #[serde(rename = "2G")]
    G2,
    #[serde(rename = "3G")]
    G3,
    #[serde(rename = "4G")]
    G4,
}

impl Technology {
    pub fn all() -> &'static [Technology] {
        &[Technology::G2, Technology::G3, Technology::G4]
    }

    /// Column/key name used in CSV files and JSON responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::G2 => "2G",
            Technology::G3 => "3G",
            Technology::G4 => "4G",
        }
    }
}

impl std::fmt::Display for Technology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Availability of each technology.
///
/// Always carries exactly the three keys `2G`, `3G` and `4G`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyCoverage {
    #[serde(rename = "2G")]
    pub g2: bool,
    #[serde(rename = "3G")]
    pub g3: bool,
    #[serde(rename = "4G")]
    pub g4: bool,
}

impl TechnologyCoverage {
    pub fn new(g2: bool, g3: bool, g4: bool) -> Self {
        Self { g2, g3, g4 }
    }

    pub fn get(&self, technology: Technology) -> bool {
        match technology {
            Technology::G2 => self.g2,
            Technology::G3 => self.g3,
            Technology::G4 => self.g4,
        }
    }

    /// OR each technology flag with `other`
    pub fn merge(&mut self, other: TechnologyCoverage) {
        self.g2 |= other.g2;
        self.g3 |= other.g3;
        self.g4 |= other.g4;
    }
}

/// Coverage summary of a city: operator name -> technology flags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityCoverage(BTreeMap<String, TechnologyCoverage>);

impl CityCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one site of `operator`, merging with the sites already seen
    pub fn add_site(&mut self, operator: &str, coverage: TechnologyCoverage) {
        self.0
            .entry(operator.to_string())
            .and_modify(|c| c.merge(coverage))
            .or_insert(coverage);
    }

    pub fn get(&self, operator: &str) -> Option<&TechnologyCoverage> {
        self.0.get(operator)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn operators(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

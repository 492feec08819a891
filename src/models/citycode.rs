//! INSEE city code.

use serde::{Deserialize, Deserializer, Serialize};

/// Normalized 5-character INSEE code of a French municipality.
///
/// An empty code means "unresolved". A code that reduces to all zeros is
/// never kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CityCode(String);

impl CityCode {
    pub const LEN: usize = 5;

    /// Normalize a raw city code as returned by the adresse API or read
    /// back from a CSV file.
    ///
    /// Handles float renderings (`"75101.0"`), lost leading zeros
    /// (`"1004"` is `"01004"`) and the `0`/blank placeholders used for
    /// coordinates outside any municipality.
    pub fn normalize(raw: &str) -> Self {
        let raw = raw.trim();
        let raw = raw.strip_suffix(".0").unwrap_or(raw);

        if raw.is_empty() {
            return Self::empty();
        }

        let padded = format!("{:0>width$}", raw, width = Self::LEN);
        if padded.chars().all(|c| c == '0') {
            return Self::empty();
        }

        Self(padded)
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CityCode {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl<'de> Deserialize<'de> for CityCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::normalize(raw.as_deref().unwrap_or("")))
    }
}

//! Forward geocoding: address to city code.

use serde::Deserialize;
use tracing::{debug, info};

use super::AdresseClient;
use crate::error::CoverageError;
use crate::models::CityCode;

/// GeoJSON feature collection returned by `/search/`
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// Ranked matches, best first. Absent on some error payloads.
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub properties: FeatureProperties,
}

#[derive(Debug, Deserialize)]
pub struct FeatureProperties {
    pub citycode: CityCode,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// City code of the best match, `None` when nothing matched.
///
/// Lower-ranked features are never considered.
pub fn matching_citycode(response: &SearchResponse) -> Option<CityCode> {
    let best = response.features.as_ref()?.first()?;
    let properties = &best.properties;

    if properties.citycode.is_empty() {
        return None;
    }

    info!(
        "Looking at network coverage for {} (Insee code {})",
        properties.city.as_deref().unwrap_or("unknown city"),
        properties.citycode
    );
    Some(properties.citycode.clone())
}

impl AdresseClient {
    /// Search an address and return the city code of the best match
    pub async fn search_citycode(&self, address: &str) -> Result<Option<CityCode>, CoverageError> {
        let url = self.endpoint_url("/search/");
        debug!("GET {} q={}", url, address);

        let response = self
            .client()
            .get(&url)
            .query(&[("q", address)])
            .send()
            .await?
            .error_for_status()?;

        let body: SearchResponse = response.json().await?;
        Ok(matching_citycode(&body))
    }
}

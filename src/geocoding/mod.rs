//! Clients for the French national address API (api-adresse.data.gouv.fr).

mod client;
mod reverse;
mod search;

use async_trait::async_trait;

use crate::error::CoverageError;
use crate::models::{Address, CityCode};

pub use client::{AdresseClient, DEFAULT_BASE_URL};
pub use reverse::{parse_reverse_csv, write_reverse_csv};
pub use search::{matching_citycode, Feature, FeatureProperties, SearchResponse};

/// Resolves a free-text address to the city code of its best match
#[async_trait]
pub trait AddressGeocoder: Send + Sync {
    /// `Ok(None)` when the address matched nothing
    async fn citycode(&self, address: &Address) -> Result<Option<CityCode>, CoverageError>;

    /// Base URL reported in upstream error messages
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl AddressGeocoder for AdresseClient {
    async fn citycode(&self, address: &Address) -> Result<Option<CityCode>, CoverageError> {
        self.search_citycode(address.as_str()).await
    }

    fn endpoint(&self) -> &str {
        self.base_url()
    }
}

//! Coverage query service and its HTTP routes.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::coverage::CoverageDataset;
use crate::error::{CoverageError, ValidationError};
use crate::geocoding::AddressGeocoder;
use crate::models::{Address, CityCoverage};

pub const COVERAGE_PATH: &str = "/get_network_coverage";

/// Routes advertised by `GET /`
const ROUTES: &[(&str, &str)] = &[
    ("/", "get_all_urls"),
    ("/health", "health"),
    (COVERAGE_PATH, "get_network_coverage"),
];

/// Address geocoding followed by a lookup in the preloaded dataset
pub struct CoverageService<G> {
    dataset: Arc<CoverageDataset>,
    geocoder: G,
}

impl<G: AddressGeocoder> CoverageService<G> {
    pub fn new(dataset: Arc<CoverageDataset>, geocoder: G) -> Self {
        Self { dataset, geocoder }
    }

    /// Network coverage of the city an address belongs to.
    ///
    /// An address matching no city yields an empty summary.
    pub async fn network_coverage(&self, address: &Address) -> Result<CityCoverage, CoverageError> {
        let citycode = self.geocoder.citycode(address).await?;
        debug!("Address '{}' resolved to {:?}", address, citycode);

        Ok(self.dataset.city_coverage(citycode.as_ref()))
    }

    /// Validate a raw `address` parameter, then look it up
    pub async fn lookup(&self, raw: Option<&str>) -> Result<CityCoverage, CoverageError> {
        let raw = raw.ok_or(ValidationError::Missing)?;
        let address = Address::parse(raw)?;
        self.network_coverage(&address).await
    }

    pub fn dataset(&self) -> &CoverageDataset {
        &self.dataset
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }
}

/// Build the HTTP router around a service
pub fn router<G: AddressGeocoder + 'static>(service: Arc<CoverageService<G>>) -> Router {
    Router::new()
        .route("/", get(routes_handler))
        .route("/health", get(health_handler::<G>))
        .route(COVERAGE_PATH, get(coverage_handler::<G>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

#[derive(Deserialize)]
struct CoverageQueryParams {
    /// Free-text address
    address: Option<String>,
}

#[derive(Serialize)]
struct RouteInfo {
    path: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    records: usize,
}

/// Error rendered by the coverage endpoint
pub struct ApiError {
    error: CoverageError,
    endpoint: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.error {
            CoverageError::Validation(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": [e.detail("address")] })),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "detail": format!(
                        "Error fetching {}, got the following exception {}",
                        self.endpoint, other
                    )
                })),
            )
                .into_response(),
        }
    }
}

/// List exposed routes
async fn routes_handler() -> Json<Vec<RouteInfo>> {
    Json(
        ROUTES
            .iter()
            .map(|&(path, name)| RouteInfo { path, name })
            .collect(),
    )
}

/// Health check endpoint
async fn health_handler<G: AddressGeocoder + 'static>(
    State(service): State<Arc<CoverageService<G>>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        records: service.dataset().len(),
    })
}

/// Network coverage of an address
async fn coverage_handler<G: AddressGeocoder + 'static>(
    State(service): State<Arc<CoverageService<G>>>,
    params: Result<Query<CoverageQueryParams>, QueryRejection>,
) -> Result<Json<CityCoverage>, ApiError> {
    let endpoint = || service.geocoder().endpoint().to_string();

    let Query(params) = params.map_err(|rejection| ApiError {
        error: ValidationError::InvalidQuery {
            message: rejection.body_text(),
        }
        .into(),
        endpoint: endpoint(),
    })?;

    service
        .lookup(params.address.as_deref())
        .await
        .map(Json)
        .map_err(|e| {
            if !e.is_validation() {
                error!("Coverage lookup failed: {}", e);
            }
            ApiError {
                error: e,
                endpoint: endpoint(),
            }
        })
}

//! Lambert 93 to WGS84 reprojection using proj4rs (pure Rust).

use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use thiserror::Error;

/// RGF93 / Lambert 93 (EPSG:2154)
const LAMBERT93_PROJ: &str = "+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 +x_0=700000 +y_0=6600000 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";
/// WGS84 geographic (EPSG:4326)
const WGS84_PROJ: &str = "+proj=longlat +ellps=WGS84 +datum=WGS84 +no_defs";

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("invalid projection definition: {0}")]
    Definition(String),
    #[error("cannot reproject ({x}, {y}): {reason}")]
    Transform { x: f64, y: f64, reason: String },
}

/// Converts Lambert 93 metric coordinates to longitude/latitude degrees.
pub struct Lambert93Projector {
    source: Proj,
    target: Proj,
}

impl std::fmt::Debug for Lambert93Projector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lambert93Projector").finish_non_exhaustive()
    }
}

impl Lambert93Projector {
    pub fn new() -> Result<Self, ProjectionError> {
        let source = Proj::from_proj_string(LAMBERT93_PROJ)
            .map_err(|e| ProjectionError::Definition(format!("Lambert 93: {e:?}")))?;
        let target = Proj::from_proj_string(WGS84_PROJ)
            .map_err(|e| ProjectionError::Definition(format!("WGS84: {e:?}")))?;

        Ok(Self { source, target })
    }

    /// Reproject one point, returning `(lon, lat)` in degrees
    pub fn to_lonlat(&self, x: f64, y: f64) -> Result<(f64, f64), ProjectionError> {
        let failed = |reason: String| ProjectionError::Transform { x, y, reason };

        if !x.is_finite() || !y.is_finite() {
            return Err(failed("non-finite input".to_string()));
        }

        let mut point = (x, y, 0.0);
        transform(&self.source, &self.target, &mut point).map_err(|e| failed(format!("{e:?}")))?;

        // proj4rs yields geographic coordinates in radians
        let (lon, lat) = (point.0.to_degrees(), point.1.to_degrees());
        if !lon.is_finite() || !lat.is_finite() {
            return Err(failed("non-finite output".to_string()));
        }

        Ok((lon, lat))
    }

    /// Reproject every point; the output is aligned with the input.
    ///
    /// Fails on the first point that cannot be reprojected.
    pub fn to_lonlat_batch(&self, points: &[(f64, f64)]) -> Result<Vec<(f64, f64)>, ProjectionError> {
        points.iter().map(|&(x, y)| self.to_lonlat(x, y)).collect()
    }
}

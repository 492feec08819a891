//! Batch reverse geocoding: GPS coordinates to city codes.

use reqwest::multipart::{Form, Part};
use tracing::info;

use super::AdresseClient;
use crate::error::CoverageError;
use crate::models::CityCode;

const UPLOAD_FIELD: &str = "data";
const UPLOAD_FILE_NAME: &str = "file_to_reverse.csv";
const CITYCODE_COLUMN: &str = "result_citycode";

/// Serialize coordinates as the `lon,lat` CSV expected by `/reverse/csv/`
pub fn write_reverse_csv(points: &[(f64, f64)]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["lon", "lat"])?;
    for (lon, lat) in points {
        writer.write_record([lon.to_string(), lat.to_string()])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Read the normalized `result_citycode` column of a reverse geocoding
/// result, one entry per row in row order
pub fn parse_reverse_csv(body: &[u8]) -> Result<Vec<CityCode>, CoverageError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body);

    let headers = reader.headers()?.clone();
    let citycode_idx = headers
        .iter()
        .position(|h| h == CITYCODE_COLUMN)
        .ok_or_else(|| {
            CoverageError::UpstreamMalformed(format!("column '{}' not found", CITYCODE_COLUMN))
        })?;

    let mut citycodes = Vec::new();
    for result in reader.records() {
        let record = result?;
        citycodes.push(CityCode::normalize(record.get(citycode_idx).unwrap_or("")));
    }

    Ok(citycodes)
}

impl AdresseClient {
    /// Resolve the city code of every `(lon, lat)` point in one upload.
    ///
    /// Rows are matched by position. The service is trusted to keep the
    /// input order; a row count mismatch is reported as malformed.
    pub async fn reverse_citycodes(
        &self,
        points: &[(f64, f64)],
    ) -> Result<Vec<CityCode>, CoverageError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint_url("/reverse/csv/");
        let body = write_reverse_csv(points)?;
        info!("Uploading {} points ({} bytes) to {}", points.len(), body.len(), url);

        let part = Part::bytes(body)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("text/csv")?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client()
            .post(&url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        let citycodes = parse_reverse_csv(&bytes)?;

        if citycodes.len() != points.len() {
            return Err(CoverageError::UpstreamMalformed(format!(
                "reverse geocoding returned {} rows for {} points",
                citycodes.len(),
                points.len()
            )));
        }

        Ok(citycodes)
    }
}

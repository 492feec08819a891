//! Error types shared by the geocoding adapters and the query service.

use serde::Serialize;
use thiserror::Error;

/// Address rejected before any outbound call is made.
///
/// `kind()` and the `Display` text follow the wording FastAPI/pydantic
/// clients of the previous service already parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field required")]
    Missing,
    #[error("String should have at least {min} characters")]
    TooShort { input: String, min: usize },
    #[error("String should have at most {max} characters")]
    TooLong { input: String, max: usize },
    #[error("String should match pattern '{pattern}'")]
    PatternMismatch { input: String, pattern: &'static str },
    /// Query string that could not be decoded, e.g. a repeated parameter
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::Missing => "missing",
            ValidationError::TooShort { .. } => "string_too_short",
            ValidationError::TooLong { .. } => "string_too_long",
            ValidationError::PatternMismatch { .. } => "string_pattern_mismatch",
            ValidationError::InvalidQuery { .. } => "value_error",
        }
    }

    /// Offending input, `None` when the parameter was absent
    pub fn input(&self) -> Option<&str> {
        match self {
            ValidationError::Missing | ValidationError::InvalidQuery { .. } => None,
            ValidationError::TooShort { input, .. }
            | ValidationError::TooLong { input, .. }
            | ValidationError::PatternMismatch { input, .. } => Some(input),
        }
    }

    /// Build the `detail` entry returned with a 422 response
    pub fn detail(&self, field: &str) -> ValidationDetail {
        let ctx = match self {
            ValidationError::Missing | ValidationError::InvalidQuery { .. } => None,
            ValidationError::TooShort { min, .. } => {
                Some(serde_json::json!({ "min_length": min }))
            }
            ValidationError::TooLong { max, .. } => {
                Some(serde_json::json!({ "max_length": max }))
            }
            ValidationError::PatternMismatch { pattern, .. } => {
                Some(serde_json::json!({ "pattern": pattern }))
            }
        };

        ValidationDetail {
            kind: self.kind(),
            loc: vec!["query".to_string(), field.to_string()],
            msg: self.to_string(),
            input: self.input().map(String::from),
            ctx,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationDetail {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub loc: Vec<String>,
    pub msg: String,
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctx: Option<serde_json::Value>,
}

/// Failure kinds of the coverage lookup.
///
/// Kept distinct internally; the HTTP boundary collapses every variant but
/// `Validation` into a single 500 response.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("malformed upstream response: {0}")]
    UpstreamMalformed(String),
}

impl CoverageError {
    pub fn is_validation(&self) -> bool {
        matches!(self, CoverageError::Validation(_))
    }
}

impl From<reqwest::Error> for CoverageError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            CoverageError::UpstreamMalformed(e.to_string())
        } else {
            CoverageError::UpstreamUnavailable(e.to_string())
        }
    }
}

impl From<csv::Error> for CoverageError {
    fn from(e: csv::Error) -> Self {
        CoverageError::UpstreamMalformed(e.to_string())
    }
}

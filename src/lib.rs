//! Netcover - mobile network coverage lookup for French addresses
//!
//! This library provides the shared types and modules for the `query`
//! and `enrich` binaries.

pub mod coverage;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod operators;
pub mod pipeline;
pub mod projection;
pub mod service;

pub use coverage::CoverageDataset;
pub use error::CoverageError;
pub use models::{Address, CityCode, CityCoverage, Technology, TechnologyCoverage};

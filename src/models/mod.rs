//! Core data models for coverage lookup.

pub mod address;
pub mod citycode;
pub mod coverage;
pub mod site;

pub use address::Address;
pub use citycode::CityCode;
pub use coverage::{CityCoverage, Technology, TechnologyCoverage};
pub use site::{EnrichedRecord, SiteRecord};

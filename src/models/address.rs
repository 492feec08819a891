//! Validated free-text address.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ValidationError;

pub const ADDRESS_MIN_LEN: usize = 3;
pub const ADDRESS_MAX_LEN: usize = 200;
pub const ADDRESS_PATTERN: &str = "^[a-zA-Z0-9 ]*$";

fn address_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ADDRESS_PATTERN).expect("address pattern is valid"))
}

/// Address accepted by the coverage endpoint: 3 to 200 ASCII letters,
/// digits or spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let len = raw.chars().count();

        if len < ADDRESS_MIN_LEN {
            return Err(ValidationError::TooShort {
                input: raw.to_string(),
                min: ADDRESS_MIN_LEN,
            });
        }
        if len > ADDRESS_MAX_LEN {
            return Err(ValidationError::TooLong {
                input: raw.to_string(),
                max: ADDRESS_MAX_LEN,
            });
        }
        if !address_regex().is_match(raw) {
            return Err(ValidationError::PatternMismatch {
                input: raw.to_string(),
                pattern: ADDRESS_PATTERN,
            });
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

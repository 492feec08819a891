//! Mobile site rows, raw and enriched.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::{CityCode, TechnologyCoverage};

/// One transmission site of one operator, as published in Lambert 93.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SiteRecord {
    /// MCC followed by MNC, e.g. 20801
    #[serde(rename = "Operateur")]
    pub operator_code: u32,
    pub x: f64,
    pub y: f64,
    #[serde(rename = "2G", deserialize_with = "deserialize_flag")]
    pub has_2g: bool,
    #[serde(rename = "3G", deserialize_with = "deserialize_flag")]
    pub has_3g: bool,
    #[serde(rename = "4G", deserialize_with = "deserialize_flag")]
    pub has_4g: bool,
}

impl SiteRecord {
    pub fn coverage(&self) -> TechnologyCoverage {
        TechnologyCoverage::new(self.has_2g, self.has_3g, self.has_4g)
    }
}

/// Site row annotated with GPS coordinates, city code and operator name.
///
/// Column order matches the persisted dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    #[serde(rename = "Operateur")]
    pub operator_code: u32,
    pub x: f64,
    pub y: f64,
    #[serde(
        rename = "2G",
        serialize_with = "serialize_flag",
        deserialize_with = "deserialize_flag"
    )]
    pub has_2g: bool,
    #[serde(
        rename = "3G",
        serialize_with = "serialize_flag",
        deserialize_with = "deserialize_flag"
    )]
    pub has_3g: bool,
    #[serde(
        rename = "4G",
        serialize_with = "serialize_flag",
        deserialize_with = "deserialize_flag"
    )]
    pub has_4g: bool,
    pub lon: f64,
    pub lat: f64,
    pub citycode: CityCode,
    pub operator_name: String,
}

impl EnrichedRecord {
    pub fn from_site(
        site: &SiteRecord,
        (lon, lat): (f64, f64),
        citycode: CityCode,
        operator_name: String,
    ) -> Self {
        Self {
            operator_code: site.operator_code,
            x: site.x,
            y: site.y,
            has_2g: site.has_2g,
            has_3g: site.has_3g,
            has_4g: site.has_4g,
            lon,
            lat,
            citycode,
            operator_name,
        }
    }

    pub fn coverage(&self) -> TechnologyCoverage {
        TechnologyCoverage::new(self.has_2g, self.has_3g, self.has_4g)
    }
}

/// Parse a boolean-like CSV cell: `1`/`0`, `1.0`/`0.0`, `true`/`false`
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Some(true),
        "0" | "0.0" | "false" | "" => Some(false),
        _ => None,
    }
}

pub(crate) fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_flag(&raw).ok_or_else(|| de::Error::custom(format!("invalid coverage flag '{}'", raw)))
}

fn serialize_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag("0.0"), Some(false));
        assert_eq!(parse_flag(""), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_read_raw_site() {
        let data = "Operateur;x;y;2G;3G;4G\n20801;102980;6847973;1;1;0\n";
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_reader(data.as_bytes());

        let sites = reader
            .deserialize()
            .collect::<Result<Vec<SiteRecord>, _>>()
            .unwrap();

        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].operator_code, 20801);
        assert_eq!(sites[0].x, 102980.0);
        assert_eq!(sites[0].coverage(), TechnologyCoverage::new(true, true, false));
    }

    #[test]
    fn test_enriched_header_and_flags() {
        let site = SiteRecord {
            operator_code: 20810,
            x: 700000.0,
            y: 6600000.0,
            has_2g: false,
            has_3g: true,
            has_4g: true,
        };
        let record = EnrichedRecord::from_site(
            &site,
            (3.0, 46.5),
            CityCode::normalize("03185"),
            "SFR".to_string(),
        );

        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(&record).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert_eq!(
            out,
            "Operateur,x,y,2G,3G,4G,lon,lat,citycode,operator_name\n\
             20810,700000.0,6600000.0,0,1,1,3.0,46.5,03185,SFR\n"
        );
    }
}

//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netcover::CoverageDataset;

/// Enriched dataset with the four national operators in Paris 20e, plus
/// one site there whose operator code has no name
pub const ENRICHED_FIXTURE: &str = "Operateur,x,y,2G,3G,4G,lon,lat,citycode,operator_name\n\
    20801,655000.0,6863000.0,1,1,1,2.39,48.86,75120,Orange\n\
    20801,655100.0,6863100.0,1,0,1,2.39,48.86,75120,Orange\n\
    20810,655200.0,6863200.0,1,1,0,2.39,48.86,75120,SFR\n\
    20810,655300.0,6863300.0,0,0,1,2.39,48.86,75120,SFR\n\
    20820,655400.0,6863400.0,1,1,1,2.39,48.86,75120,Bouygues Telecom\n\
    20815,655500.0,6863500.0,0,1,1,2.39,48.86,75120,Free mobile\n\
    99999,655600.0,6863600.0,1,1,1,2.39,48.86,75120,\n\
    20815,652000.0,6862000.0,1,1,1,2.35,48.85,75104,Free mobile\n\
    20801,1200000.0,6100000.0,1,1,1,9.0,42.5,,Orange\n";

pub fn dataset() -> CoverageDataset {
    CoverageDataset::from_reader(ENRICHED_FIXTURE.as_bytes()).unwrap()
}

pub fn paris_search_response() -> Value {
    json!({
        "type": "FeatureCollection",
        "version": "draft",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [2.394, 48.8663]},
            "properties": {
                "label": "123 Rue des Pyrénées 75020 Paris",
                "score": 0.88,
                "housenumber": "123",
                "id": "75120_7840_00123",
                "type": "housenumber",
                "name": "123 Rue des Pyrénées",
                "postcode": "75020",
                "citycode": "75120",
                "city": "Paris",
                "district": "Paris 20e Arrondissement",
                "context": "75, Paris, Île-de-France"
            }
        }],
        "attribution": "BAN",
        "licence": "ETALAB-2.0",
        "query": "123 rue des pyrenees paris",
        "limit": 5
    })
}

/// Mount a `/search/` mock answering `body` for query `q`
pub async fn mount_search(server: &MockServer, q: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/search/"))
        .and(query_param("q", q))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

//! HTTP routes of the coverage service.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use netcover::geocoding::{AddressGeocoder, AdresseClient};
use netcover::service::{router, CoverageService};
use netcover::{Address, CityCode, CoverageError};

/// Geocoder double counting its calls
struct StubGeocoder {
    citycode: Option<&'static str>,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl AddressGeocoder for StubGeocoder {
    async fn citycode(&self, _address: &Address) -> Result<Option<CityCode>, CoverageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.citycode.map(CityCode::normalize))
    }

    fn endpoint(&self) -> &str {
        "http://stub"
    }
}

fn stub_app(citycode: Option<&'static str>) -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let geocoder = StubGeocoder {
        citycode,
        calls: Arc::clone(&calls),
    };
    let service = CoverageService::new(Arc::new(common::dataset()), geocoder);
    (router(Arc::new(service)), calls)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_get_network_coverage_no_address() {
    let (app, calls) = stub_app(Some("75120"));
    let (status, body) = get(app, "/get_network_coverage").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{
            "type": "missing",
            "loc": ["query", "address"],
            "msg": "Field required",
            "input": null
        }]})
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_network_coverage_address_too_short() {
    let (app, calls) = stub_app(Some("75120"));
    let (status, body) = get(app, "/get_network_coverage?address=12").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{
            "type": "string_too_short",
            "loc": ["query", "address"],
            "msg": "String should have at least 3 characters",
            "input": "12",
            "ctx": {"min_length": 3}
        }]})
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_network_coverage_address_too_long() {
    let (app, calls) = stub_app(Some("75120"));
    let address = "qwertyuiop".repeat(24);
    let (status, body) = get(app, &format!("/get_network_coverage?address={}", address)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "string_too_long");
    assert_eq!(body["detail"][0]["ctx"]["max_length"], 200);
    assert_eq!(body["detail"][0]["input"], address.as_str());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_network_coverage_address_invalid() {
    let (app, calls) = stub_app(Some("75120"));
    let (status, body) = get(app, "/get_network_coverage?address=123~!").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"detail": [{
            "type": "string_pattern_mismatch",
            "loc": ["query", "address"],
            "msg": "String should match pattern '^[a-zA-Z0-9 ]*$'",
            "input": "123~!",
            "ctx": {"pattern": "^[a-zA-Z0-9 ]*$"}
        }]})
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_network_coverage_no_match_is_empty() {
    let (app, calls) = stub_app(None);
    let (status, body) = get(app, "/get_network_coverage?address=okaido").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_get_network_coverage_valid() {
    let server = MockServer::start().await;
    common::mount_search(
        &server,
        "123 rue des pyrenees paris",
        common::paris_search_response(),
    )
    .await;

    let client = AdresseClient::new(&server.uri(), None).unwrap();
    let service = CoverageService::new(Arc::new(common::dataset()), client);
    let app = router(Arc::new(service));

    let (status, body) = get(app, "/get_network_coverage?address=123+rue+des+pyrenees+paris").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "Bouygues Telecom": {"2G": true, "3G": true, "4G": true},
            "Free mobile": {"2G": false, "3G": true, "4G": true},
            "Orange": {"2G": true, "3G": true, "4G": true},
            "SFR": {"2G": true, "3G": true, "4G": true}
        })
    );
}

#[tokio::test]
async fn test_get_network_coverage_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = AdresseClient::new(&server.uri(), None).unwrap();
    let service = CoverageService::new(Arc::new(common::dataset()), client);
    let app = router(Arc::new(service));

    let (status, body) = get(app, "/get_network_coverage?address=paris").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(
        detail.starts_with(&format!("Error fetching {}, got the following exception", server.uri())),
        "{detail}"
    );
}

#[tokio::test]
async fn test_get_network_coverage_invalid_address_skips_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = AdresseClient::new(&server.uri(), None).unwrap();
    let service = CoverageService::new(Arc::new(common::dataset()), client);
    let app = router(Arc::new(service));

    let (status, _) = get(app, "/get_network_coverage?address=ab").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_get_network_coverage_repeated_address() {
    let (app, calls) = stub_app(Some("75120"));
    let (status, body) = get(app, "/get_network_coverage?address=abc&address=def").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "value_error");
    assert_eq!(body["detail"][0]["loc"], json!(["query", "address"]));
    assert!(body["detail"][0]["msg"]
        .as_str()
        .unwrap()
        .starts_with("Invalid query string"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_get_network_coverage_skips_unnamed_operator() {
    let (app, calls) = stub_app(Some("75120"));
    let (status, body) = get(app, "/get_network_coverage?address=20+avenue+de+segur").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(body.get("").is_none());
    assert_eq!(body.as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn test_route_listing_and_health() {
    let (app, _) = stub_app(None);
    let (status, body) = get(app.clone(), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["path"] == "/get_network_coverage" && r["name"] == "get_network_coverage"));

    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "records": 9}));
}

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use guide_agents::TravelAgent;
use guide_api::{build_router, ApiState};
use guide_core::{Coordinates, PlaceName, PlacesReport, WeatherReport};
use guide_observability::AppMetrics;
use guide_providers::{Geocoder, PlacesProvider, WeatherProvider};
use serde_json::{json, Value};
use tower::ServiceExt;

#[derive(Default)]
struct FixedGeocoder {
    known: Vec<(&'static str, Coordinates)>,
    calls: AtomicUsize,
}

impl Geocoder for FixedGeocoder {
    async fn resolve(&self, place: &PlaceName) -> Option<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.known
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(place.as_str()))
            .map(|(_, at)| *at)
    }
}

#[derive(Default)]
struct FixedWeather {
    report: Option<WeatherReport>,
    calls: AtomicUsize,
}

impl WeatherProvider for FixedWeather {
    async fn fetch(&self, _at: Coordinates) -> Option<WeatherReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.report
    }
}

#[derive(Default)]
struct FixedPlaces {
    names: Vec<&'static str>,
    calls: AtomicUsize,
}

impl PlacesProvider for FixedPlaces {
    async fn fetch(&self, _at: Coordinates, _radius_km: u32, limit: usize) -> PlacesReport {
        self.calls.fetch_add(1, Ordering::SeqCst);
        PlacesReport::new(
            self.names
                .iter()
                .take(limit)
                .map(|name| name.to_string())
                .collect(),
        )
    }
}

struct TestApp {
    router: Router,
    geocoder: Arc<FixedGeocoder>,
    weather: Arc<FixedWeather>,
    places: Arc<FixedPlaces>,
}

fn test_app(weather: Option<WeatherReport>, places: &[&'static str]) -> TestApp {
    let geocoder = Arc::new(FixedGeocoder {
        known: vec![
            ("Paris", Coordinates::new(48.85, 2.35)),
            ("Rome", Coordinates::new(41.9, 12.5)),
        ],
        ..Default::default()
    });
    let weather = Arc::new(FixedWeather {
        report: weather,
        ..Default::default()
    });
    let places = Arc::new(FixedPlaces {
        names: places.to_vec(),
        ..Default::default()
    });

    let metrics = AppMetrics::shared();
    let agent = TravelAgent::new(
        geocoder.clone(),
        weather.clone(),
        places.clone(),
        metrics.clone(),
        Duration::from_secs(2),
    );
    let router = build_router(ApiState {
        agent: Arc::new(agent),
        metrics,
        body_limit_bytes: 16 * 1024,
    });

    TestApp {
        router,
        geocoder,
        weather,
        places,
    }
}

fn mild() -> Option<WeatherReport> {
    Some(WeatherReport {
        temperature: 17.4,
        precipitation_probability: 62.9,
    })
}

async fn post_chat(router: &Router, message: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "message": message }).to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn root_reports_liveness() {
    let app = test_app(mild(), &[]);

    let response = app
        .router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["message"], "Tourism AI API is running");
}

#[tokio::test]
async fn weather_question_gets_weather_sentence() {
    let app = test_app(mild(), &["Louvre"]);

    let (status, body) = post_chat(&app.router, "What's the weather in Paris?").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["reply"],
        "In Paris it's currently 17°C with a chance of 62% to rain."
    );
    assert_eq!(app.places.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn trip_question_lists_places() {
    let app = test_app(mild(), &["Colosseum", "Pantheon"]);

    let (status, body) = post_chat(&app.router, "plan my trip to Rome").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["reply"],
        "In Rome these are the places you can go:\n- Colosseum\n- Pantheon"
    );
    assert_eq!(app.weather.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn message_without_place_is_still_ok() {
    let app = test_app(mild(), &["Louvre"]);

    let (status, body) = post_chat(&app.router, "Tell me about Atlantis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["reply"],
        "Sorry, I couldn't identify the place name in your message. Please mention a place using 'to' or 'in'."
    );
    assert_eq!(app.geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unknown_place_is_still_ok() {
    let app = test_app(mild(), &["Louvre"]);

    let (status, body) = post_chat(&app.router, "weather in Narnia").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Sorry, I don't know if this place exists.");
    assert_eq!(app.weather.calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.places.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn vague_question_combines_weather_and_places() {
    let app = test_app(mild(), &["Louvre", "Orsay"]);

    let (_, body) = post_chat(&app.router, "I'm going to Paris").await;
    assert_eq!(
        body["reply"],
        "In Paris it's currently 17°C with a chance of 62% to rain.\n\n\
         And these are the places you can go:\n- Louvre\n- Orsay"
    );
}

#[tokio::test]
async fn weather_with_no_places_is_weather_alone() {
    let app = test_app(mild(), &[]);

    let (_, body) = post_chat(&app.router, "I'm going to Paris").await;
    assert_eq!(
        body["reply"],
        "In Paris it's currently 17°C with a chance of 62% to rain."
    );
    assert_eq!(app.places.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let app = test_app(mild(), &[]);

    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"text": "weather in Paris"}"#))
        .unwrap();

    let response = app.router.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

fn padded_chat_body(total_len: usize) -> String {
    let head = r#"{"message":"weather in Paris"#;
    let tail = r#""}"#;
    let padding = ",".repeat(total_len - head.len() - tail.len());
    format!("{head}{padding}{tail}")
}

async fn post_raw(router: &Router, body: String) -> StatusCode {
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("content-type", "application/json")
        .header("content-length", body.len())
        .body(Body::from(body))
        .unwrap();

    router.clone().oneshot(request).await.unwrap().status()
}

#[tokio::test]
async fn body_at_the_limit_is_answered() {
    let app = test_app(mild(), &[]);

    let status = post_raw(&app.router, padded_chat_body(16 * 1024)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.weather.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn body_over_the_limit_is_rejected_before_the_agent() {
    let app = test_app(mild(), &[]);

    let status = post_raw(&app.router, padded_chat_body(16 * 1024 + 1)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.geocoder.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn health_counts_requests() {
    let app = test_app(mild(), &[]);
    post_chat(&app.router, "Tell me about Atlantis").await;
    post_chat(&app.router, "weather in Paris").await;

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["metrics"]["requests_total"], 2);
    assert_eq!(parsed["metrics"]["missing_place_total"], 1);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = test_app(mild(), &[]);

    let response = app
        .router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

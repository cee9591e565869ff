mod config;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use guide_agents::TravelAgent;
use guide_core::ChatInput;
use guide_observability::AppMetrics;
use guide_providers::{
    Geocoder, HttpProviders, NominatimGeocoder, OpenMeteoWeather, OverpassPlaces, PlacesProvider,
    ProviderConfig, WeatherProvider,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use config::ApiConfig;

pub type HttpAgent = TravelAgent<NominatimGeocoder, OpenMeteoWeather, OverpassPlaces>;

pub struct ApiState<G, W, P> {
    pub agent: Arc<TravelAgent<G, W, P>>,
    pub metrics: Arc<AppMetrics>,
    pub body_limit_bytes: usize,
}

impl<G, W, P> Clone for ApiState<G, W, P> {
    fn clone(&self) -> Self {
        Self {
            agent: self.agent.clone(),
            metrics: self.metrics.clone(),
            body_limit_bytes: self.body_limit_bytes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: guide_observability::MetricsSnapshot,
}

/// Wires the public OpenStreetMap / Open-Meteo providers into a router.
pub fn build_app(providers: &ProviderConfig, api: &ApiConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();
    let http = HttpProviders::from_config(providers)?;

    let agent: HttpAgent = TravelAgent::new(
        Arc::new(http.geocoder),
        Arc::new(http.weather),
        Arc::new(http.places),
        metrics.clone(),
        providers.call_timeout(),
    );

    Ok(build_router(ApiState {
        agent: Arc::new(agent),
        metrics,
        body_limit_bytes: api.body_limit_bytes,
    }))
}

pub fn build_router<G, W, P>(state: ApiState<G, W, P>) -> Router
where
    G: Geocoder + 'static,
    W: WeatherProvider + 'static,
    P: PlacesProvider + 'static,
{
    Router::new()
        .route("/", get(root))
        .route("/health", get(health::<G, W, P>))
        .route("/chat", post(chat::<G, W, P>))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Later layers wrap earlier ones: the id is set before propagation sees it.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        // Oversized bodies get a 413 without reaching `chat`.
        .layer(RequestBodyLimitLayer::new(state.body_limit_bytes))
        .with_state(state)
}

async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "Tourism AI API is running",
    })
}

async fn health<G, W, P>(State(state): State<ApiState<G, W, P>>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
    };
    (StatusCode::OK, Json(payload))
}

/// Every domain outcome, including "no place found" and provider failures,
/// is a 200 with the explanation in `reply`.
async fn chat<G, W, P>(
    State(state): State<ApiState<G, W, P>>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse
where
    G: Geocoder,
    W: WeatherProvider,
    P: PlacesProvider,
{
    let outcome = state
        .agent
        .handle_chat(ChatInput::new(request.message))
        .await;

    (
        StatusCode::OK,
        Json(ChatResponse {
            reply: outcome.reply,
        }),
    )
}

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use guide_core::{
    classify_intent, compose_reply, extract_place, replies, ChatInput, ChatOutcome, PlaceName,
    ReplyKind,
};
use guide_observability::AppMetrics;
use guide_providers::{Geocoder, PlacesProvider, WeatherProvider};
use tracing::{debug, info, instrument, warn};

/// Search radius handed to the places provider.
pub const PLACES_RADIUS_KM: u32 = 5;
/// Most attractions listed in one reply.
pub const PLACES_LIMIT: usize = 5;

/// Turns one chat message into one reply: extract a place, geocode it,
/// fetch what the message asks for, compose.
///
/// Holds no per-request state; clones share the same providers.
pub struct TravelAgent<G, W, P> {
    geocoder: Arc<G>,
    weather: Arc<W>,
    places: Arc<P>,
    metrics: Arc<AppMetrics>,
    call_timeout: Duration,
}

impl<G, W, P> Clone for TravelAgent<G, W, P> {
    fn clone(&self) -> Self {
        Self {
            geocoder: self.geocoder.clone(),
            weather: self.weather.clone(),
            places: self.places.clone(),
            metrics: self.metrics.clone(),
            call_timeout: self.call_timeout,
        }
    }
}

impl<G, W, P> TravelAgent<G, W, P>
where
    G: Geocoder,
    W: WeatherProvider,
    P: PlacesProvider,
{
    pub fn new(
        geocoder: Arc<G>,
        weather: Arc<W>,
        places: Arc<P>,
        metrics: Arc<AppMetrics>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            geocoder,
            weather,
            places,
            metrics,
            call_timeout,
        }
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    #[instrument(skip(self, input), fields(message_len = input.message.len()))]
    pub async fn handle_chat(&self, input: ChatInput) -> ChatOutcome {
        let started = Instant::now();
        self.metrics.inc_request();

        let outcome = self.answer(&input.message).await;

        self.metrics.observe_latency(started.elapsed());
        info!(
            kind = outcome.kind.as_str(),
            place = outcome.place.as_ref().map(PlaceName::as_str),
            wants_weather = outcome.intent.map(|intent| intent.wants_weather),
            wants_places = outcome.intent.map(|intent| intent.wants_places),
            "chat handled"
        );

        outcome
    }

    async fn answer(&self, message: &str) -> ChatOutcome {
        let Some(place) = extract_place(message) else {
            debug!("no place found in message");
            self.metrics.inc_missing_place();
            return ChatOutcome::missing_place(replies::MISSING_PLACE.to_string());
        };
        debug!(place = %place, "place extracted");

        let resolved = self
            .within_deadline("geocoder", self.geocoder.resolve(&place))
            .await
            .flatten();
        let Some(coordinates) = resolved else {
            self.metrics.inc_unknown_place();
            return ChatOutcome::unknown_place(replies::UNKNOWN_PLACE.to_string(), place);
        };

        let detected = classify_intent(message);
        if detected.is_empty() {
            self.metrics.inc_intent_fallback();
        }
        let intent = detected.or_everything();

        let weather_call = async {
            if !intent.wants_weather {
                return None;
            }
            let report = self
                .within_deadline("weather", self.weather.fetch(coordinates))
                .await
                .flatten();
            if report.is_none() {
                self.metrics.inc_weather_failure();
            }
            report
        };

        let places_call = async {
            if !intent.wants_places {
                return None;
            }
            let report = self
                .within_deadline(
                    "places",
                    self.places.fetch(coordinates, PLACES_RADIUS_KM, PLACES_LIMIT),
                )
                .await
                .unwrap_or_default();
            if report.is_empty() {
                self.metrics.inc_empty_places();
            }
            Some(report)
        };

        let (weather, places) = tokio::join!(weather_call, places_call);

        let kind = if weather.is_none() && places.is_none() {
            self.metrics.inc_nothing_fetched();
            ReplyKind::NothingFetched
        } else {
            ReplyKind::Composed
        };

        ChatOutcome {
            reply: compose_reply(&place, weather.as_ref(), places.as_ref()),
            kind,
            place: Some(place),
            coordinates: Some(coordinates),
            intent: Some(intent),
            weather,
            places,
        }
    }

    async fn within_deadline<T>(
        &self,
        provider: &'static str,
        call: impl Future<Output = T>,
    ) -> Option<T> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    provider,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "provider call timed out"
                );
                None
            }
        }
    }
}

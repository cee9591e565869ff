//! External data collaborators: geocoding, current weather and nearby
//! attractions.
//!
//! The orchestrator only sees the three traits below. Each HTTP client also
//! exposes an inherent method returning `Result<_, ProviderError>`; the trait
//! impls log that error and degrade to "absent" (weather, geocoding) or an
//! empty list (places).

mod config;
mod nominatim;
mod open_meteo;
mod overpass;

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result};
use guide_core::{Coordinates, PlaceName, PlacesReport, ProviderError, WeatherReport};
use reqwest::Client;

pub use config::ProviderConfig;
pub use nominatim::NominatimGeocoder;
pub use open_meteo::OpenMeteoWeather;
pub use overpass::OverpassPlaces;

pub trait Geocoder: Send + Sync {
    /// `None` when the place is unknown or the lookup failed.
    fn resolve(&self, place: &PlaceName) -> impl Future<Output = Option<Coordinates>> + Send;
}

pub trait WeatherProvider: Send + Sync {
    /// `None` on any failure or when the payload lacks current conditions.
    fn fetch(&self, at: Coordinates) -> impl Future<Output = Option<WeatherReport>> + Send;
}

pub trait PlacesProvider: Send + Sync {
    /// Distinct attraction names within `radius_km`, at most `limit` of them.
    /// Failures come back as an empty report.
    fn fetch(
        &self,
        at: Coordinates,
        radius_km: u32,
        limit: usize,
    ) -> impl Future<Output = PlacesReport> + Send;
}

/// The production trio, built from one config.
#[derive(Debug, Clone)]
pub struct HttpProviders {
    pub geocoder: NominatimGeocoder,
    pub weather: OpenMeteoWeather,
    pub places: OverpassPlaces,
}

impl HttpProviders {
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Ok(Self {
            geocoder: NominatimGeocoder::new(
                build_client(&config.user_agent, config.geocoder_timeout)
                    .context("failed to build geocoder HTTP client")?,
                &config.geocoder_url,
                config.geocoder_timeout,
            ),
            weather: OpenMeteoWeather::new(
                build_client(&config.user_agent, config.weather_timeout)
                    .context("failed to build weather HTTP client")?,
                &config.weather_url,
                config.weather_timeout,
            ),
            places: OverpassPlaces::new(
                build_client(&config.user_agent, config.places_timeout)
                    .context("failed to build places HTTP client")?,
                &config.places_url,
                config.places_timeout,
            ),
        })
    }
}

pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout.min(Duration::from_secs(6)))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

fn request_error(provider: &'static str, timeout: Duration, err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout { provider, timeout }
    } else if err.is_decode() {
        ProviderError::decode(provider, err.to_string())
    } else if let Some(status) = err.status() {
        ProviderError::Status {
            provider,
            status: status.as_u16(),
        }
    } else {
        ProviderError::transport(provider, err.to_string())
    }
}

fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

use std::time::Duration;

use guide_core::{Coordinates, ProviderError, WeatherReport};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{request_error, trim_base_url, WeatherProvider};

const PROVIDER: &str = "open-meteo";

/// Open-Meteo forecast API: current temperature plus the first hourly
/// precipitation probability.
#[derive(Debug, Clone)]
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
    hourly: Option<HourlyData>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct HourlyData {
    #[serde(default)]
    precipitation_probability: Option<Vec<Option<f64>>>,
}

impl OpenMeteoWeather {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            timeout,
        }
    }

    pub async fn forecast(&self, at: Coordinates) -> Result<WeatherReport, ProviderError> {
        let latitude = at.latitude.to_string();
        let longitude = at.longitude.to_string();

        let response = self
            .client
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current_weather", "true"),
                ("hourly", "precipitation_probability"),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| request_error(PROVIDER, self.timeout, err))?;

        let forecast = response
            .json::<ForecastResponse>()
            .await
            .map_err(|err| request_error(PROVIDER, self.timeout, err))?;

        let current = forecast.current_weather.ok_or(ProviderError::MissingField {
            provider: PROVIDER,
            field: "current_weather",
        })?;
        let hourly = forecast.hourly.ok_or(ProviderError::MissingField {
            provider: PROVIDER,
            field: "hourly",
        })?;

        // A missing or null first slot reads as no rain expected.
        let precipitation_probability = hourly
            .precipitation_probability
            .and_then(|slots| slots.into_iter().next().flatten())
            .unwrap_or(0.0);

        Ok(WeatherReport {
            temperature: current.temperature,
            precipitation_probability,
        })
    }
}

impl WeatherProvider for OpenMeteoWeather {
    async fn fetch(&self, at: Coordinates) -> Option<WeatherReport> {
        match self.forecast(at).await {
            Ok(report) => {
                debug!(
                    coordinates = %at,
                    temperature = report.temperature,
                    precipitation_probability = report.precipitation_probability,
                    "weather fetched"
                );
                Some(report)
            }
            Err(err) => {
                warn!(provider = PROVIDER, coordinates = %at, error = %err, "weather fetch failed");
                None
            }
        }
    }
}

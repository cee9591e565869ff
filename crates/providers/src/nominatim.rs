use std::time::Duration;

use guide_core::{Coordinates, PlaceName, ProviderError};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{request_error, trim_base_url, Geocoder};

const PROVIDER: &str = "nominatim";

/// OpenStreetMap Nominatim search, best match only.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            timeout,
        }
    }

    pub async fn lookup(&self, query: &str) -> Result<Option<Coordinates>, ProviderError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| request_error(PROVIDER, self.timeout, err))?;

        let hits = response
            .json::<Vec<SearchHit>>()
            .await
            .map_err(|err| request_error(PROVIDER, self.timeout, err))?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        let latitude = parse_degrees(&hit.lat, "lat")?;
        let longitude = parse_degrees(&hit.lon, "lon")?;
        Ok(Some(Coordinates::new(latitude, longitude)))
    }
}

impl Geocoder for NominatimGeocoder {
    async fn resolve(&self, place: &PlaceName) -> Option<Coordinates> {
        match self.lookup(place.as_str()).await {
            Ok(Some(coordinates)) => {
                debug!(place = %place, coordinates = %coordinates, "place resolved");
                Some(coordinates)
            }
            Ok(None) => {
                debug!(place = %place, "no geocoding match");
                None
            }
            Err(err) => {
                warn!(provider = PROVIDER, place = %place, error = %err, "geocoding failed");
                None
            }
        }
    }
}

fn parse_degrees(raw: &str, field: &'static str) -> Result<f64, ProviderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| ProviderError::decode(PROVIDER, format!("{field} `{raw}`: {err}")))
}

use std::collections::HashSet;
use std::time::Duration;

use guide_core::{Coordinates, PlacesReport, ProviderError};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{request_error, trim_base_url, PlacesProvider};

const PROVIDER: &str = "overpass";

/// Overpass API query for OSM nodes and ways tagged `tourism=attraction`.
#[derive(Debug, Clone)]
pub struct OverpassPlaces {
    client: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
struct Element {
    #[serde(default)]
    tags: Option<Tags>,
}

#[derive(Debug, Deserialize)]
struct Tags {
    name: Option<String>,
}

impl OverpassPlaces {
    pub fn new(client: Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: trim_base_url(base_url),
            timeout,
        }
    }

    pub async fn attractions(
        &self,
        at: Coordinates,
        radius_km: u32,
        limit: usize,
    ) -> Result<Vec<String>, ProviderError> {
        let query = attraction_query(at, radius_km);

        let response = self
            .client
            .post(format!("{}/api/interpreter", self.base_url))
            .form(&[("data", query.as_str())])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| request_error(PROVIDER, self.timeout, err))?;

        let payload = response
            .json::<OverpassResponse>()
            .await
            .map_err(|err| request_error(PROVIDER, self.timeout, err))?;

        Ok(distinct_names(payload.elements, limit))
    }
}

impl PlacesProvider for OverpassPlaces {
    async fn fetch(&self, at: Coordinates, radius_km: u32, limit: usize) -> PlacesReport {
        match self.attractions(at, radius_km, limit).await {
            Ok(attractions) => {
                debug!(coordinates = %at, found = attractions.len(), "attractions fetched");
                PlacesReport::new(attractions)
            }
            Err(err) => {
                warn!(provider = PROVIDER, coordinates = %at, error = %err, "attractions fetch failed");
                PlacesReport::default()
            }
        }
    }
}

fn attraction_query(at: Coordinates, radius_km: u32) -> String {
    let radius_m = u64::from(radius_km) * 1000;
    let (lat, lon) = (at.latitude, at.longitude);
    format!(
        "[out:json][timeout:25];\n(\n  node[\"tourism\"=\"attraction\"](around:{radius_m},{lat},{lon});\n  way[\"tourism\"=\"attraction\"](around:{radius_m},{lat},{lon});\n);\nout body;"
    )
}

/// Element order is kept; blank and repeated names are skipped.
fn distinct_names(elements: Vec<Element>, limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    elements
        .into_iter()
        .filter_map(|element| element.tags?.name)
        .filter(|name| !name.trim().is_empty())
        .filter(|name| seen.insert(name.clone()))
        .take(limit)
        .collect()
}

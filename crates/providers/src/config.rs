use std::env;
use std::time::Duration;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_PLACES_URL: &str = "https://overpass-api.de";
pub const DEFAULT_USER_AGENT: &str = "TourismAI/1.0";

/// Endpoints and timeouts for the external providers. Read once at startup
/// and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub geocoder_url: String,
    pub weather_url: String,
    pub places_url: String,
    pub user_agent: String,
    pub geocoder_timeout: Duration,
    pub weather_timeout: Duration,
    pub places_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            weather_url: DEFAULT_WEATHER_URL.to_string(),
            places_url: DEFAULT_PLACES_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geocoder_timeout: Duration::from_secs(10),
            weather_timeout: Duration::from_secs(10),
            places_timeout: Duration::from_secs(30),
        }
    }
}

impl ProviderConfig {
    /// `GUIDE_*` environment overrides on top of the defaults. Values that
    /// are empty or fail to parse keep the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            geocoder_url: env_string("GUIDE_GEOCODER_URL").unwrap_or(defaults.geocoder_url),
            weather_url: env_string("GUIDE_WEATHER_URL").unwrap_or(defaults.weather_url),
            places_url: env_string("GUIDE_PLACES_URL").unwrap_or(defaults.places_url),
            user_agent: env_string("GUIDE_USER_AGENT").unwrap_or(defaults.user_agent),
            geocoder_timeout: env_seconds("GUIDE_GEOCODER_TIMEOUT_SECONDS")
                .unwrap_or(defaults.geocoder_timeout),
            weather_timeout: env_seconds("GUIDE_WEATHER_TIMEOUT_SECONDS")
                .unwrap_or(defaults.weather_timeout),
            places_timeout: env_seconds("GUIDE_PLACES_TIMEOUT_SECONDS")
                .unwrap_or(defaults.places_timeout),
        }
    }

    /// Upper bound for one provider call as seen by the orchestrator: the
    /// slowest HTTP timeout plus a second of slack.
    pub fn call_timeout(&self) -> Duration {
        self.geocoder_timeout
            .max(self.weather_timeout)
            .max(self.places_timeout)
            + Duration::from_secs(1)
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_seconds(key: &str) -> Option<Duration> {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

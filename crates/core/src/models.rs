use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::extract::strip_trailing_stopwords;

/// A destination name pulled out of free text, before geocoding.
///
/// Never empty, never padded with whitespace and never ending in one of the
/// filler words the extractor strips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceName(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0:?} does not name a place")]
pub struct InvalidPlaceName(pub String);

impl PlaceName {
    /// Cleans `raw` the same way the extractor cleans a captured name.
    /// Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let cleaned = strip_trailing_stopwords(raw.trim());
        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for PlaceName {
    type Error = InvalidPlaceName;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(InvalidPlaceName(raw))
    }
}

impl From<PlaceName> for String {
    fn from(place: PlaceName) -> Self {
        place.0
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentFlags {
    pub wants_weather: bool,
    pub wants_places: bool,
}

impl IntentFlags {
    pub const EVERYTHING: Self = Self {
        wants_weather: true,
        wants_places: true,
    };

    pub fn is_empty(self) -> bool {
        !self.wants_weather && !self.wants_places
    }

    /// An underspecified request asks for everything.
    pub fn or_everything(self) -> Self {
        if self.is_empty() {
            Self::EVERYTHING
        } else {
            self
        }
    }
}

/// Current conditions for a coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Percent, for the nearest upcoming hourly slot.
    pub precipitation_probability: f64,
}

/// Named points of interest near a coordinate pair, in provider order.
///
/// An empty list is a valid answer ("nothing found"), distinct from the
/// report not having been requested at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacesReport {
    pub attractions: Vec<String>,
}

impl PlacesReport {
    pub fn new(attractions: Vec<String>) -> Self {
        Self { attractions }
    }

    pub fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInput {
    pub message: String,
}

impl ChatInput {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Which branch of the pipeline produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyKind {
    MissingPlace,
    UnknownPlace,
    Composed,
    NothingFetched,
}

impl ReplyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingPlace => "missing_place",
            Self::UnknownPlace => "unknown_place",
            Self::Composed => "composed",
            Self::NothingFetched => "nothing_fetched",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub reply: String,
    pub kind: ReplyKind,
    pub place: Option<PlaceName>,
    pub coordinates: Option<Coordinates>,
    /// Intent after the fetch-everything fallback was applied.
    pub intent: Option<IntentFlags>,
    pub weather: Option<WeatherReport>,
    pub places: Option<PlacesReport>,
}

impl ChatOutcome {
    pub fn missing_place(reply: String) -> Self {
        Self {
            reply,
            kind: ReplyKind::MissingPlace,
            place: None,
            coordinates: None,
            intent: None,
            weather: None,
            places: None,
        }
    }

    pub fn unknown_place(reply: String, place: PlaceName) -> Self {
        Self {
            reply,
            kind: ReplyKind::UnknownPlace,
            place: Some(place),
            coordinates: None,
            intent: None,
            weather: None,
            places: None,
        }
    }
}

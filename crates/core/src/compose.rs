use crate::models::{PlaceName, PlacesReport, WeatherReport};

/// Fixed replies for requests that never reach composition.
pub mod replies {
    pub const MISSING_PLACE: &str = "Sorry, I couldn't identify the place name in your message. Please mention a place using 'to' or 'in'.";
    pub const UNKNOWN_PLACE: &str = "Sorry, I don't know if this place exists.";
}

/// Merges whatever was fetched for `place` into one reply.
///
/// Weather comes first. A non-empty places list joins it under the shorter
/// "And these are..." header; an empty list never does, so weather plus an
/// empty list is just the weather sentence.
pub fn compose_reply(
    place: &PlaceName,
    weather: Option<&WeatherReport>,
    places: Option<&PlacesReport>,
) -> String {
    let weather_part = weather.map(|report| weather_sentence(place, report));

    match (weather_part, places) {
        (Some(weather), Some(places)) if !places.is_empty() => format!(
            "{weather}\n\nAnd these are the places you can go:\n{}",
            bullet_list(&places.attractions)
        ),
        (Some(weather), _) => weather,
        (None, Some(places)) if places.is_empty() => {
            format!("In {place} no tourist attractions were found nearby.")
        }
        (None, Some(places)) => format!(
            "In {place} these are the places you can go:\n{}",
            bullet_list(&places.attractions)
        ),
        (None, None) => nothing_fetched(place),
    }
}

pub fn nothing_fetched(place: &PlaceName) -> String {
    format!("Sorry, I couldn't fetch information for {place}.")
}

fn weather_sentence(place: &PlaceName, report: &WeatherReport) -> String {
    format!(
        "In {place} it's currently {}°C with a chance of {}% to rain.",
        truncate(report.temperature),
        truncate(report.precipitation_probability)
    )
}

// Rounds toward zero; -0.7 prints as 0, not -0.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

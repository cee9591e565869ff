use crate::models::IntentFlags;

const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature", "temp"];
const PLACES_KEYWORDS: &[&str] = &["places", "visit", "attractions", "plan my trip"];

/// Plain substring matching on the lower-cased text; no word boundaries, so
/// "temptation" still reads as a weather request.
pub fn classify_intent(text: &str) -> IntentFlags {
    let lower = text.to_lowercase();

    IntentFlags {
        wants_weather: contains_any(&lower, WEATHER_KEYWORDS),
        wants_places: contains_any(&lower, PLACES_KEYWORDS),
    }
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}

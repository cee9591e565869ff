use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::PlaceName;

/// Destination patterns, tried in order. The first one that yields a
/// non-empty name wins, even if a later one would read better.
///
/// A name runs to the first comma, or to the end of the text with any
/// closing `.`, `!` or `?` left out.
static PLACE_PATTERNS: Lazy<[Regex; 2]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)\bto\s+([A-Za-z\s]+?)(?:,|[.!?]*\s*$)")
            .expect("valid 'to' place regex"),
        Regex::new(r"(?i)\bin\s+([A-Za-z\s]+?)(?:,|[.!?]*\s*$)")
            .expect("valid 'in' place regex"),
    ]
});

static TRAILING_STOPWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:^|\s+)(?:what|where|when|how|the|a|an)\s*$")
        .expect("valid trailing stopword regex")
});

pub fn extract_place(text: &str) -> Option<PlaceName> {
    PLACE_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(text)?.get(1)?.as_str();
        PlaceName::parse(captured)
    })
}

/// Drops filler words such as "what" or "the" that a capture picks up when
/// the place clause runs into the next one ("in Paris what").
pub(crate) fn strip_trailing_stopwords(input: &str) -> &str {
    let mut rest = input.trim();
    while let Some(found) = TRAILING_STOPWORD.find(rest) {
        rest = rest[..found.start()].trim_end();
    }
    rest
}

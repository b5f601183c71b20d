//! Cuisine → emoji suggestions
//!
//! Used to fill the emoji field when the user leaves it empty.

/// Emoji used when the cuisine is not recognised
pub const DEFAULT_EMOJI: &str = "🍽️";

const EMOJI_MAP: &[(&str, &str)] = &[
    ("pizza", "🍕"),
    ("burger", "🍔"),
    ("sushi", "🍣"),
    ("taco", "🌮"),
    ("pasta", "🍝"),
    ("salad", "🥗"),
    ("coffee", "☕"),
    ("dessert", "🍰"),
    ("steak", "🥩"),
];

/// Suggest an emoji for a cuisine, matching case-insensitively on the trimmed text
pub fn suggest_emoji(cuisine: &str) -> &'static str {
    let key = cuisine.trim().to_lowercase();
    EMOJI_MAP
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, emoji)| *emoji)
        .unwrap_or(DEFAULT_EMOJI)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_cuisines() {
        assert_eq!(suggest_emoji("coffee"), "☕");
        assert_eq!(suggest_emoji("  Pizza "), "🍕");
        assert_eq!(suggest_emoji("SUSHI"), "🍣");
    }

    #[test]
    fn test_unknown_cuisine_uses_default() {
        assert_eq!(suggest_emoji("ethiopian"), DEFAULT_EMOJI);
        assert_eq!(suggest_emoji(""), DEFAULT_EMOJI);
    }
}

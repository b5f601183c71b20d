//! Food suggestion replies
//!
//! A friendly one-line reply to "I'm looking at X", with the cuisine emoji
//! and a nod to whatever the same user looked at last.

use std::collections::HashMap;

use flavormap_common::suggest_emoji;
use rand::seq::SliceRandom;
use rand::Rng;

pub const BOT_NAME: &str = "Foodfinity";

/// Reply openers; `{food}` is replaced with the food item
const PHRASES: &[&str] = &[
    "Great choice!",
    "That sounds absolutely delicious!",
    "What a fantastic, flavorful selection!",
    "Wow! You have a good taste.",
    "Good food, good mood, enjoy!",
    "That's a smart and savory choice.",
    "Enjoy every bite of that {food}!",
    "Savor the flavor.",
    "That looks like a perfect blend of nutrients and taste.",
    "A festival of flavors!",
];

const DESCRIPTORS: &[&str] = &["mouth-watering", "rich", "flavorful", "succulent", "crispy", "velvety"];

/// Foods each user asked about, oldest first
#[derive(Debug, Default)]
pub struct SuggestionHistory {
    by_user: HashMap<String, Vec<String>>,
}

impl SuggestionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lookup; returns the user's previous food, if any, and the new count
    pub fn record(&mut self, user_id: &str, food: &str) -> (Option<String>, usize) {
        let foods = self.by_user.entry(user_id.to_string()).or_default();
        let previous = foods.last().cloned();
        foods.push(food.to_string());
        (previous, foods.len())
    }

    pub fn count(&self, user_id: &str) -> usize {
        self.by_user.get(user_id).map_or(0, Vec::len)
    }
}

/// Compose the reply body for a (lowercased) food item
pub fn compose<R: Rng + ?Sized>(food: &str, previous: Option<&str>, rng: &mut R) -> String {
    let phrase = PHRASES.choose(rng).copied().unwrap_or(PHRASES[0]);
    let descriptor = DESCRIPTORS.choose(rng).copied().unwrap_or(DESCRIPTORS[0]);

    let mut message = format!(
        "{} It looks so {}! {}",
        phrase.replace("{food}", food),
        descriptor,
        suggest_emoji(food)
    );
    if let Some(previous) = previous {
        message.push_str(&format!(" (Better than the {} you looked at earlier! 😉)", previous));
    }
    message
}

//! List reconciliation
//!
//! The list is rebuilt from scratch on every pass: the most recent
//! `LIST_LIMIT` spots of the merged sequence, newest first.

use flavormap_common::{Coordinate, Spot};

use super::escape_html;

/// Maximum number of entries presented
pub const LIST_LIMIT: usize = 50;

/// One row of the list presentation
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub emoji: String,
    pub note: String,
    pub at: Coordinate,
}

impl ListEntry {
    fn from_spot(spot: &Spot) -> Self {
        Self {
            id: spot.id.clone(),
            name: spot.name.clone(),
            cuisine: spot.cuisine.clone(),
            emoji: spot.emoji.clone(),
            note: spot.note.clone(),
            at: spot.coordinate(),
        }
    }

    /// Coordinates rendered as-is, whatever their value
    pub fn coordinates_text(&self) -> String {
        format!("{}, {}", self.at.lat, self.at.lng)
    }

    /// Item markup with every field escaped
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                "<div class=\"item\"><div>",
                "<div class=\"itemTitle\"><strong>{name}</strong><span>{cuisine}</span></div>",
                "<div class=\"itemNote\">{note}</div>",
                "<div class=\"hint\">{coords}</div>",
                "</div><div class=\"badge\" title=\"{emoji}\">{emoji}</div></div>"
            ),
            name = escape_html(&self.name),
            cuisine = escape_html(&self.cuisine),
            note = escape_html(&self.note),
            coords = escape_html(&self.coordinates_text()),
            emoji = escape_html(&self.emoji),
        )
    }
}

/// Bounded, newest-first presentation of the merged set
#[derive(Debug, Default, Clone)]
pub struct ListView {
    entries: Vec<ListEntry>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole presentation
    pub fn rebuild(&mut self, merged: &[Spot]) {
        let start = merged.len().saturating_sub(LIST_LIMIT);
        self.entries = merged[start..]
            .iter()
            .rev()
            .map(ListEntry::from_spot)
            .collect();
    }

    pub fn entries(&self) -> &[ListEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ListEntry> {
        self.entries.get(index)
    }
}

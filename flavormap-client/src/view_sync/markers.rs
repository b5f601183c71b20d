//! Marker reconciliation
//!
//! First write wins for marker identity: once an id has a marker it is never
//! moved, re-created or given new popup content, so repeated passes leave
//! open popups and the current view alone.

use std::collections::HashMap;

use flavormap_common::Spot;
use tracing::debug;

use super::escape_html;
use super::map::{MapSurface, MarkerHandle};

/// Spot id → marker placed for it
#[derive(Debug, Default, Clone)]
pub struct MarkerRegistry {
    by_id: HashMap<String, MarkerHandle>,
}

/// Outcome of one marker reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkerReport {
    pub created: usize,
    pub skipped_invalid: usize,
}

impl MarkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<MarkerHandle> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Place one marker per spot id that has none yet
    pub fn reconcile(&mut self, spots: &[Spot], map: &mut dyn MapSurface) -> MarkerReport {
        let mut report = MarkerReport::default();

        for spot in spots {
            if self.by_id.contains_key(&spot.id) {
                continue;
            }
            if !spot.has_finite_coordinates() {
                debug!(id = %spot.id, "No marker for spot with non-finite coordinates");
                report.skipped_invalid += 1;
                continue;
            }

            let handle = map.place_marker(spot.coordinate(), &popup_html(spot));
            self.by_id.insert(spot.id.clone(), handle);
            report.created += 1;
        }

        report
    }
}

/// Popup markup for a spot, every field escaped
pub fn popup_html(spot: &Spot) -> String {
    format!(
        "<strong>{}</strong><br/>{} {}<br/>{}",
        escape_html(&spot.name),
        escape_html(&spot.cuisine),
        escape_html(&spot.emoji),
        escape_html(&spot.note),
    )
}

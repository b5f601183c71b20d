//! View synchronization
//!
//! Keeps a marker layer and a list layer consistent with the merged spot
//! set. Both halves are idempotent and safe to call repeatedly with
//! overlapping data. The marker registry is owned by the `ViewSync` value
//! and the map surface is passed into each call, so independent views can
//! coexist.

pub mod list;
pub mod map;
pub mod markers;

use flavormap_common::Spot;
use tracing::debug;

pub use list::{ListEntry, ListView, LIST_LIMIT};
pub use map::{HeadlessMap, MapSurface, MarkerHandle, PlacedMarker, DEFAULT_CENTER, DEFAULT_ZOOM};
pub use markers::{MarkerRegistry, MarkerReport};

/// Zoom floor applied when focusing a list entry; never zooms out
pub const FOCUS_MIN_ZOOM: f64 = 15.0;

/// Outcome of one view update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewReport {
    pub markers: MarkerReport,
    pub listed: usize,
}

#[derive(Debug, Default, Clone)]
pub struct ViewSync {
    markers: MarkerRegistry,
    list: ListView,
}

impl ViewSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile markers, then rebuild the list
    pub fn apply(&mut self, merged: &[Spot], map: &mut dyn MapSurface) -> ViewReport {
        let markers = self.markers.reconcile(merged, map);
        self.list.rebuild(merged);

        debug!(
            created = markers.created,
            skipped = markers.skipped_invalid,
            listed = self.list.entries().len(),
            "View updated"
        );

        ViewReport {
            markers,
            listed: self.list.entries().len(),
        }
    }

    /// Focus the map on a list entry and open its popup
    ///
    /// Returns `None` when `index` is out of range.
    pub fn select(&self, index: usize, map: &mut dyn MapSurface) -> Option<&ListEntry> {
        let entry = self.list.get(index)?;

        if entry.at.is_finite() {
            let zoom = map.zoom().max(FOCUS_MIN_ZOOM);
            map.set_view(entry.at, zoom);
        }
        if let Some(handle) = self.markers.get(&entry.id) {
            map.open_popup(handle);
        }

        Some(entry)
    }

    pub fn markers(&self) -> &MarkerRegistry {
        &self.markers
    }

    pub fn list(&self) -> &[ListEntry] {
        self.list.entries()
    }
}

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flavormap_common::Coordinate;

    fn spot(id: &str, lat: f64, lng: f64) -> Spot {
        Spot {
            id: id.to_string(),
            name: id.to_uppercase(),
            cuisine: "sushi".to_string(),
            emoji: "🍣".to_string(),
            note: String::new(),
            lat,
            lng,
            created_at: None,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
        assert_eq!(escape_html("plain ☕"), "plain ☕");
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let mut view = ViewSync::new();
        let mut map = HeadlessMap::new();
        let merged = vec![spot("a", 1.0, 2.0), spot("b", 3.0, 4.0)];

        view.apply(&merged, &mut map);
        let second = view.apply(&merged, &mut map);

        assert_eq!(second.markers.created, 0);
        assert_eq!(second.listed, 2);
        assert_eq!(map.markers().len(), 2);
        assert_eq!(view.markers().len(), 2);
    }

    #[test]
    fn test_invalid_coordinates_listed_but_not_marked() {
        let mut view = ViewSync::new();
        let mut map = HeadlessMap::new();

        let report = view.apply(&[spot("bad", f64::NAN, 0.0), spot("good", 1.0, 1.0)], &mut map);

        assert_eq!(report.markers.created, 1);
        assert_eq!(report.listed, 2);
        assert_eq!(view.list()[1].id, "bad");
    }

    #[test]
    fn test_select_zooms_in_and_opens_popup() {
        let mut view = ViewSync::new();
        let mut map = HeadlessMap::new();
        view.apply(&[spot("a", 10.0, 20.0)], &mut map);

        let entry = view.select(0, &mut map).unwrap();

        assert_eq!(entry.id, "a");
        assert_eq!(map.center(), Coordinate::new(10.0, 20.0));
        assert_eq!(map.zoom(), FOCUS_MIN_ZOOM);
        assert!(map.open_popup_marker().unwrap().popup_html.contains("<strong>A</strong>"));
    }

    #[test]
    fn test_select_never_zooms_out() {
        let mut view = ViewSync::new();
        let mut map = HeadlessMap::new();
        view.apply(&[spot("a", 10.0, 20.0)], &mut map);
        map.set_view(DEFAULT_CENTER, 18.0);

        view.select(0, &mut map);

        assert_eq!(map.zoom(), 18.0);
    }

    #[test]
    fn test_select_without_marker_only_recenters_when_finite() {
        let mut view = ViewSync::new();
        let mut map = HeadlessMap::new();
        view.apply(&[spot("bad", f64::NAN, 0.0)], &mut map);

        assert!(view.select(0, &mut map).is_some());
        assert_eq!(map.center(), DEFAULT_CENTER);
        assert!(map.open_popup_marker().is_none());
    }

    #[test]
    fn test_select_out_of_range() {
        let view = ViewSync::new();
        let mut map = HeadlessMap::new();
        assert!(view.select(3, &mut map).is_none());
    }

    #[test]
    fn test_independent_views_do_not_share_markers() {
        let mut first = ViewSync::new();
        let mut second = ViewSync::new();
        let mut map_a = HeadlessMap::new();
        let mut map_b = HeadlessMap::new();
        let merged = vec![spot("a", 1.0, 2.0)];

        first.apply(&merged, &mut map_a);
        let report = second.apply(&merged, &mut map_b);

        assert_eq!(report.markers.created, 1);
        assert_eq!(map_b.markers().len(), 1);
    }
}

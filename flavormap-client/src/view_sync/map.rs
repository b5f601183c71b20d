//! Map capability used by view synchronization
//!
//! The map library is an external collaborator: all the view layer needs is
//! to place a marker with a popup, open a popup, and read/set the view.

use flavormap_common::Coordinate;

/// Initial map centre (New York City)
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    lat: 40.7128,
    lng: -74.006,
};
pub const DEFAULT_ZOOM: f64 = 13.0;

/// Opaque reference to a marker placed on a map surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(pub u64);

pub trait MapSurface {
    /// Place a marker with popup markup, returning its handle
    fn place_marker(&mut self, at: Coordinate, popup_html: &str) -> MarkerHandle;

    /// Open a marker's popup
    fn open_popup(&mut self, marker: MarkerHandle);

    /// Current zoom level
    fn zoom(&self) -> f64;

    /// Re-centre the map
    fn set_view(&mut self, center: Coordinate, zoom: f64);
}

/// A marker as recorded by [`HeadlessMap`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    pub at: Coordinate,
    pub popup_html: String,
}

/// In-process map surface that records what a real map would display
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    markers: Vec<PlacedMarker>,
    center: Coordinate,
    zoom: f64,
    open_popup: Option<MarkerHandle>,
    next_handle: u64,
}

impl Default for HeadlessMap {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self {
            markers: Vec::new(),
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            open_popup: None,
            next_handle: 1,
        }
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    pub fn marker(&self, handle: MarkerHandle) -> Option<&PlacedMarker> {
        self.markers.iter().find(|m| m.handle == handle)
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Marker whose popup is currently open
    pub fn open_popup_marker(&self) -> Option<&PlacedMarker> {
        self.open_popup.and_then(|handle| self.marker(handle))
    }
}

impl MapSurface for HeadlessMap {
    fn place_marker(&mut self, at: Coordinate, popup_html: &str) -> MarkerHandle {
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;
        self.markers.push(PlacedMarker {
            handle,
            at,
            popup_html: popup_html.to_string(),
        });
        handle
    }

    fn open_popup(&mut self, marker: MarkerHandle) {
        if self.marker(marker).is_some() {
            self.open_popup = Some(marker);
        }
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_view(&mut self, center: Coordinate, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_map_default_view() {
        let map = HeadlessMap::new();
        assert_eq!(map.center(), DEFAULT_CENTER);
        assert_eq!(map.zoom(), DEFAULT_ZOOM);
        assert!(map.markers().is_empty());
        assert!(map.open_popup_marker().is_none());
    }

    #[test]
    fn test_handles_are_distinct() {
        let mut map = HeadlessMap::new();
        let a = map.place_marker(Coordinate::new(1.0, 2.0), "a");
        let b = map.place_marker(Coordinate::new(1.0, 2.0), "b");
        assert_ne!(a, b);
        assert_eq!(map.marker(b).unwrap().popup_html, "b");
    }

    #[test]
    fn test_open_popup_ignores_unknown_handle() {
        let mut map = HeadlessMap::new();
        map.open_popup(MarkerHandle(99));
        assert!(map.open_popup_marker().is_none());
    }
}

//! On-device persistence of spots saved while no backend was reachable
//!
//! All local spots live under one key as a JSON array, in append order.
//! Reading never fails: absent, unreadable or corrupt storage is "no local
//! data", and individual entries that fail coercion are skipped.

use flavormap_common::{Error, Result, Spot};
use serde_json::Value;
use tracing::{debug, warn};

use crate::storage::KeyValueStorage;

/// Namespace key of the local spots entry
pub const LOCAL_STORAGE_KEY: &str = "flavormap:localSpots";

/// Sole owner of locally minted spots
pub struct LocalStore {
    storage: Box<dyn KeyValueStorage>,
}

impl LocalStore {
    pub fn new(storage: Box<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// All persisted local spots in insertion order
    pub fn load(&self) -> Vec<Spot> {
        let raw = match self.storage.get_item(LOCAL_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Local storage unreadable, treating as empty");
                return Vec::new();
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Local storage holds malformed JSON, treating as empty");
                return Vec::new();
            }
        };

        let Value::Array(entries) = parsed else {
            warn!("Local storage entry is not an array, treating as empty");
            return Vec::new();
        };

        let spots: Vec<Spot> = entries
            .iter()
            .filter_map(|entry| match Spot::from_json(entry) {
                Ok(spot) => Some(spot),
                Err(reason) => {
                    warn!(%reason, "Skipping unusable local spot");
                    None
                }
            })
            .collect();

        debug!(count = spots.len(), "Loaded local spots");
        spots
    }

    /// Append one spot and write the whole sequence back
    pub fn append(&mut self, spot: Spot) -> Result<()> {
        if !spot.has_finite_coordinates() {
            return Err(Error::InvalidInput(format!(
                "spot {} has non-finite coordinates",
                spot.id
            )));
        }

        let mut spots = self.load();
        spots.push(spot);

        let encoded = serde_json::to_string(&spots)?;
        self.storage.set_item(LOCAL_STORAGE_KEY, &encoded)?;

        debug!(count = spots.len(), "Persisted local spots");
        Ok(())
    }
}

//! Local id minting
//!
//! Spots saved while no backend is reachable get an id minted on the device:
//! `local_<unix-millis>`, or `local_<millis>-<n>` when the clock has not moved
//! past the previously minted millisecond. Server ids never carry the
//! `local_` tag.

/// Tag carried by every locally minted id
pub const LOCAL_ID_PREFIX: &str = "local_";

/// Mints monotonically distinguishable local ids
#[derive(Debug, Default, Clone)]
pub struct LocalIdMinter {
    last_millis: Option<i64>,
    counter: u32,
}

impl LocalIdMinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint an id for a given clock reading
    pub fn mint_at(&mut self, millis: i64) -> String {
        match self.last_millis {
            Some(last) if millis <= last => {
                // Clock has not advanced: stay on the last millisecond, bump the counter
                self.counter += 1;
                format!("{}{}-{}", LOCAL_ID_PREFIX, last, self.counter)
            }
            _ => {
                self.last_millis = Some(millis);
                self.counter = 0;
                format!("{}{}", LOCAL_ID_PREFIX, millis)
            }
        }
    }

    /// Mint an id for a given clock reading that `is_taken` does not report as used
    pub fn mint_unique_at<F>(&mut self, millis: i64, is_taken: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        let mut id = self.mint_at(millis);
        while is_taken(&id) {
            id = self.mint_at(millis);
        }
        id
    }
}

/// Whether an id was minted on a device rather than assigned by the server
pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}

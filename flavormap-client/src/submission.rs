//! Submission flow: the session's write path
//!
//! ```text
//! idle → submitting → reconciling-remote → idle   (server accepted)
//!                   → reconciling-local  → idle   (write failed, saved on device)
//! ```
//!
//! Coordinate validation happens before any state change or request. When
//! the local fallback runs, the append has completed before reconciliation
//! starts, so no path leaves a submission half-applied. A submission borrows
//! the session mutably, which serializes submissions on one session.

use std::collections::HashSet;

use flavormap_common::time::{now, unix_millis};
use flavormap_common::{suggest_emoji, Spot, SpotDraft};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{SubmitError, TransportError};
use crate::session::{RefreshReport, Session};
use crate::status::StatusMessage;
use crate::view_sync::MapSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Submitting,
    ReconcilingRemote,
    ReconcilingLocal,
}

/// Raw form input as typed by the user
#[derive(Debug, Clone, Default)]
pub struct SpotForm {
    pub name: String,
    pub cuisine: String,
    pub emoji: String,
    pub note: String,
    pub lat: String,
    pub lng: String,
}

impl SpotForm {
    /// Parse coordinates and trim text fields
    ///
    /// An empty emoji is filled from the cuisine.
    pub fn to_draft(&self) -> Result<SpotDraft, SubmitError> {
        let lat = parse_coordinate(&self.lat).ok_or(SubmitError::Validation { field: "lat" })?;
        let lng = parse_coordinate(&self.lng).ok_or(SubmitError::Validation { field: "lng" })?;

        let cuisine = self.cuisine.trim().to_string();
        let emoji = match self.emoji.trim() {
            "" => suggest_emoji(&cuisine).to_string(),
            typed => typed.to_string(),
        };

        Ok(SpotDraft {
            name: self.name.trim().to_string(),
            cuisine,
            emoji,
            note: self.note.trim().to_string(),
            lat,
            lng,
        })
    }
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    let n = raw.trim().parse::<f64>().ok()?;
    n.is_finite().then_some(n)
}

/// How a submission was saved
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Server accepted the spot; `id` is the server-assigned id when the response carried one
    Synced { id: Option<String>, report: RefreshReport },
    /// Server write failed; the spot was persisted on this device
    SavedLocally {
        spot: Spot,
        cause: TransportError,
        report: RefreshReport,
    },
}

impl SubmitOutcome {
    pub fn status(&self) -> StatusMessage {
        match self {
            SubmitOutcome::Synced { .. } => StatusMessage::Synced,
            SubmitOutcome::SavedLocally { cause, report, .. } => StatusMessage::SavedLocally {
                mode: report.mode,
                reason: cause.server_message().map(str::to_string),
            },
        }
    }

    pub fn report(&self) -> &RefreshReport {
        match self {
            SubmitOutcome::Synced { report, .. } | SubmitOutcome::SavedLocally { report, .. } => {
                report
            }
        }
    }
}

impl<M: MapSurface> Session<M> {
    /// Submit one spot from the form
    pub async fn submit(&mut self, form: &SpotForm) -> Result<SubmitOutcome, SubmitError> {
        let draft = form.to_draft()?;

        self.set_state(FlowState::Submitting);
        let result = self.loader.transport().create_spot(&draft).await;

        match result {
            Ok(body) => {
                let id = assigned_id(&body);
                info!(id = ?id, name = %draft.name, "Spot saved to server");

                self.set_state(FlowState::ReconcilingRemote);
                let report = self.refresh().await;
                self.set_state(FlowState::Idle);

                Ok(SubmitOutcome::Synced { id, report })
            }
            Err(cause) => {
                warn!(error = %cause, "Remote write failed, saving spot on this device");

                let spot = self.mint_local_spot(&draft);
                if let Err(e) = self.store.append(spot.clone()) {
                    error!(error = %e, id = %spot.id, "Could not persist spot locally");
                    self.set_state(FlowState::Idle);
                    return Err(SubmitError::LocalSave(e));
                }
                info!(id = %spot.id, name = %spot.name, "Spot saved on this device");

                self.set_state(FlowState::ReconcilingLocal);
                let report = self.refresh().await;
                self.set_state(FlowState::Idle);

                Ok(SubmitOutcome::SavedLocally { spot, cause, report })
            }
        }
    }

    fn mint_local_spot(&mut self, draft: &SpotDraft) -> Spot {
        let existing: HashSet<String> = self.store.load().into_iter().map(|s| s.id).collect();
        let created_at = now();
        let id = self
            .minter
            .mint_unique_at(unix_millis(created_at), |id| existing.contains(id));
        Spot::from_draft(id, draft, Some(created_at))
    }

    fn set_state(&mut self, next: FlowState) {
        debug!(from = ?self.state, to = ?next, "Submission state");
        self.state = next;
    }
}

/// Server id from a `{ "spot": { "id": ... } }` response
fn assigned_id(body: &Value) -> Option<String> {
    body.get("spot")?.get("id")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(lat: &str, lng: &str) -> SpotForm {
        SpotForm {
            name: "  Deli ".to_string(),
            cuisine: " coffee ".to_string(),
            emoji: String::new(),
            note: " late ".to_string(),
            lat: lat.to_string(),
            lng: lng.to_string(),
        }
    }

    #[test]
    fn test_to_draft_parses_and_trims() {
        let draft = form(" 40.72 ", "-74.01").to_draft().unwrap();
        assert_eq!(draft.name, "Deli");
        assert_eq!(draft.cuisine, "coffee");
        assert_eq!(draft.note, "late");
        assert_eq!(draft.lat, 40.72);
        assert_eq!(draft.lng, -74.01);
    }

    #[test]
    fn test_to_draft_fills_emoji_from_cuisine() {
        assert_eq!(form("1", "2").to_draft().unwrap().emoji, "☕");

        let mut typed = form("1", "2");
        typed.emoji = "🥯".to_string();
        assert_eq!(typed.to_draft().unwrap().emoji, "🥯");
    }

    #[test]
    fn test_to_draft_rejects_bad_coordinates() {
        for (lat, lng, field) in [
            ("abc", "1", "lat"),
            ("", "1", "lat"),
            ("1", "NaN", "lng"),
            ("1", "inf", "lng"),
        ] {
            match form(lat, lng).to_draft() {
                Err(SubmitError::Validation { field: f }) => assert_eq!(f, field),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_assigned_id() {
        assert_eq!(assigned_id(&json!({"spot": {"id": "srv42"}})).as_deref(), Some("srv42"));
        assert_eq!(assigned_id(&json!({})), None);
        assert_eq!(assigned_id(&Value::Null), None);
    }
}

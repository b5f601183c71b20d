//! User-facing status text
//!
//! "Synced to server", "saved only on this device" and "failed to save" are
//! always three distinct messages.

use std::fmt;

use crate::source_loader::SourceMode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    /// Remote write accepted
    Synced,
    /// Remote write failed, spot persisted on this device
    SavedLocally {
        /// Mode of the reconciliation pass that followed the save
        mode: SourceMode,
        /// Server's `error` text, when it rejected the write
        reason: Option<String>,
    },
    /// Nothing was saved
    Failed(String),
    /// Coordinate input rejected before any request
    InvalidCoordinates,
    /// Last load was served by the static snapshot
    StaticModeNotice,
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Failed(_) | StatusMessage::InvalidCoordinates)
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMessage::Synced => write!(f, "Saved!"),
            StatusMessage::SavedLocally {
                reason: Some(reason),
                ..
            } => write!(f, "Saved only on this device: {}", reason),
            StatusMessage::SavedLocally {
                mode: SourceMode::Secondary,
                reason: None,
            } => write!(f, "Saved locally (static site)."),
            StatusMessage::SavedLocally {
                mode: SourceMode::Primary,
                reason: None,
            } => write!(f, "Saved only on this device."),
            StatusMessage::Failed(reason) => write!(f, "Failed to save spot: {}", reason),
            StatusMessage::InvalidCoordinates => write!(f, "Lat/Lng must be numbers"),
            StatusMessage::StaticModeNotice => {
                write!(f, "Static site: spots you add are saved only on this device.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved_locally(mode: SourceMode, reason: Option<&str>) -> StatusMessage {
        StatusMessage::SavedLocally {
            mode,
            reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn test_save_states_are_distinct() {
        let synced = StatusMessage::Synced.to_string();
        let local = saved_locally(SourceMode::Secondary, None).to_string();
        let failed = StatusMessage::Failed("disk full".to_string()).to_string();

        assert_ne!(synced, local);
        assert_ne!(local, failed);
        assert_ne!(synced, failed);
        assert_eq!(failed, "Failed to save spot: disk full");
    }

    #[test]
    fn test_saved_locally_text_follows_mode_and_reason() {
        assert_eq!(
            saved_locally(SourceMode::Secondary, None).to_string(),
            "Saved locally (static site)."
        );
        assert_eq!(
            saved_locally(SourceMode::Primary, None).to_string(),
            "Saved only on this device."
        );
        assert_eq!(
            saved_locally(SourceMode::Primary, Some("name is required (max 80 chars)")).to_string(),
            "Saved only on this device: name is required (max 80 chars)"
        );
    }

    #[test]
    fn test_error_flag() {
        assert!(StatusMessage::InvalidCoordinates.is_error());
        assert!(StatusMessage::Failed(String::new()).is_error());
        assert!(!saved_locally(SourceMode::Primary, Some("rejected")).is_error());
        assert!(!StatusMessage::StaticModeNotice.is_error());
    }
}

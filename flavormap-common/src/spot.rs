//! Spot record and write-request types
//!
//! `Spot` is the canonical point-of-interest value. Anything arriving from the
//! network or from on-device storage is duck-typed JSON, so it goes through
//! [`Spot::from_json`] before it is admitted anywhere else: that is the one
//! place where missing text fields are defaulted and non-finite coordinates
//! are rejected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::time::parse_iso;
use crate::{Error, Result};

/// Maximum `name` length accepted by the backend (characters)
pub const MAX_NAME_CHARS: usize = 80;
/// Maximum `cuisine` length accepted by the backend (characters)
pub const MAX_CUISINE_CHARS: usize = 40;
/// Maximum `note` length accepted by the backend (characters)
pub const MAX_NOTE_CHARS: usize = 240;
/// Maximum `emoji` length accepted by the backend (characters)
pub const MAX_EMOJI_CHARS: usize = 4;

/// Geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// One persisted food spot
///
/// Serialized with the wire field names (`createdAt` in camel case, omitted
/// when absent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spot {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    pub emoji: String,
    #[serde(default)]
    pub note: String,
    pub lat: f64,
    pub lng: f64,
    /// Creation time; always set for locally minted spots, optional for server spots
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "crate::time::serialize_iso_opt"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Why a JSON value could not be admitted as a [`Spot`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpotRejection {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("entry has no usable id")]
    MissingId,

    #[error("entry has a missing or non-finite {0}")]
    InvalidCoordinate(&'static str),
}

impl Spot {
    /// Build a spot from an accepted draft
    pub fn from_draft(id: String, draft: &SpotDraft, created_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            cuisine: draft.cuisine.clone(),
            emoji: draft.emoji.clone(),
            note: draft.note.clone(),
            lat: draft.lat,
            lng: draft.lng,
            created_at,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    pub fn has_finite_coordinates(&self) -> bool {
        self.coordinate().is_finite()
    }

    /// Coerce a duck-typed JSON value into a spot
    ///
    /// - `id`: non-empty string, or a number rendered to its decimal text
    /// - text fields: missing/null become empty, other scalars are rendered to text
    /// - `lat`/`lng`: numbers or numeric strings, must be finite
    /// - `createdAt`: RFC 3339, anything else is dropped
    pub fn from_json(value: &Value) -> std::result::Result<Self, SpotRejection> {
        let obj = value.as_object().ok_or(SpotRejection::NotAnObject)?;

        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(SpotRejection::MissingId),
        };

        let lat = coordinate_field(obj.get("lat")).ok_or(SpotRejection::InvalidCoordinate("lat"))?;
        let lng = coordinate_field(obj.get("lng")).ok_or(SpotRejection::InvalidCoordinate("lng"))?;

        let created_at = obj
            .get("createdAt")
            .and_then(Value::as_str)
            .and_then(parse_iso);

        Ok(Self {
            id,
            name: text_field(obj.get("name")),
            cuisine: text_field(obj.get("cuisine")),
            emoji: text_field(obj.get("emoji")),
            note: text_field(obj.get("note")),
            lat,
            lng,
            created_at,
        })
    }
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

fn coordinate_field(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Body of a create request (`POST /api/spots`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotDraft {
    pub name: String,
    pub cuisine: String,
    pub emoji: String,
    #[serde(default)]
    pub note: String,
    pub lat: f64,
    pub lng: f64,
}

impl SpotDraft {
    /// Apply the backend field rules, returning the trimmed draft
    ///
    /// Error messages are shown to the user verbatim by the client.
    pub fn validate(&self) -> Result<SpotDraft> {
        let draft = SpotDraft {
            name: self.name.trim().to_string(),
            cuisine: self.cuisine.trim().to_string(),
            emoji: self.emoji.trim().to_string(),
            note: self.note.trim().to_string(),
            lat: self.lat,
            lng: self.lng,
        };

        if !draft.lat.is_finite() || !draft.lng.is_finite() {
            return Err(Error::InvalidInput("lat/lng must be numbers".to_string()));
        }
        let name_len = draft.name.chars().count();
        if name_len == 0 || name_len > MAX_NAME_CHARS {
            return Err(Error::InvalidInput(format!(
                "name is required (max {} chars)",
                MAX_NAME_CHARS
            )));
        }
        let cuisine_len = draft.cuisine.chars().count();
        if cuisine_len == 0 || cuisine_len > MAX_CUISINE_CHARS {
            return Err(Error::InvalidInput(format!(
                "cuisine is required (max {} chars)",
                MAX_CUISINE_CHARS
            )));
        }
        if draft.note.chars().count() > MAX_NOTE_CHARS {
            return Err(Error::InvalidInput(format!(
                "note too long (max {} chars)",
                MAX_NOTE_CHARS
            )));
        }
        let emoji_len = draft.emoji.chars().count();
        if emoji_len == 0 || emoji_len > MAX_EMOJI_CHARS {
            return Err(Error::InvalidInput("emoji is required".to_string()));
        }

        Ok(draft)
    }
}

//! Spot resource handlers
//!
//! `GET /api/spots` and `POST /api/spots` form the dynamic resource;
//! `GET /data/spots.json` serves the same rows as a bare array, which is the
//! shape of the static snapshot clients fall back to.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use flavormap_common::{time, Spot, SpotDraft};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use super::error::{ApiError, ApiResult};
use crate::{db, AppState};

#[derive(Debug, Serialize)]
pub struct SpotsResponse {
    pub spots: Vec<Spot>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub spot: Spot,
}

/// GET /api/spots
pub async fn list_spots(State(state): State<AppState>) -> ApiResult<Json<SpotsResponse>> {
    let spots = db::list_spots(&state.db).await?;
    Ok(Json(SpotsResponse { spots }))
}

/// GET /data/spots.json
pub async fn snapshot(State(state): State<AppState>) -> ApiResult<Json<Vec<Spot>>> {
    let spots = db::list_spots(&state.db).await?;
    Ok(Json(spots))
}

/// POST /api/spots
///
/// Takes the raw body so malformed JSON gets the `{ "error" }` shape rather
/// than the extractor's plain-text rejection.
pub async fn create_spot(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let draft = parse_draft(&body)?.validate()?;

    let spot = Spot::from_draft(new_server_id(), &draft, Some(time::now()));
    db::insert_spot(&state.db, &spot).await?;

    info!(id = %spot.id, name = %spot.name, "Created spot");
    Ok((StatusCode::CREATED, Json(CreatedResponse { spot })))
}

fn new_server_id() -> String {
    format!("s_{}", uuid::Uuid::new_v4().simple())
}

/// Decode a request body into an unvalidated draft
fn parse_draft(body: &[u8]) -> ApiResult<SpotDraft> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::BadRequest("Expected JSON object".to_string()));
    }
    let value: Value = serde_json::from_slice(body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;
    let Value::Object(obj) = value else {
        return Err(ApiError::BadRequest("Expected JSON object".to_string()));
    };

    let (Some(lat), Some(lng)) = (number_field(&obj, "lat"), number_field(&obj, "lng")) else {
        return Err(ApiError::BadRequest("lat/lng must be numbers".to_string()));
    };

    Ok(SpotDraft {
        name: text_field(&obj, "name"),
        cuisine: text_field(&obj, "cuisine"),
        emoji: text_field(&obj, "emoji"),
        note: text_field(&obj, "note"),
        lat,
        lng,
    })
}

fn text_field(obj: &Map<String, Value>, key: &str) -> String {
    match obj.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

//! POST /foodfinity/suggest

use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ApiError, ApiResult};
use crate::suggest::{compose, BOT_NAME};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub user_id: String,
    pub food_item: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub bot_name: &'static str,
    pub message: String,
    pub history_count: usize,
}

pub async fn suggest(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SuggestResponse>> {
    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON".to_string()))?;
    let request: SuggestRequest = serde_json::from_value(value)
        .map_err(|_| ApiError::BadRequest("user_id and food_item are required".to_string()))?;

    let food = request.food_item.to_lowercase();
    let (previous, history_count) = state
        .suggestions
        .lock()
        .await
        .record(&request.user_id, &food);

    let message = compose(&food, previous.as_deref(), &mut rand::thread_rng());
    debug!(user_id = %request.user_id, food = %food, history_count, "Suggestion");

    Ok(Json(SuggestResponse {
        bot_name: BOT_NAME,
        message,
        history_count,
    }))
}

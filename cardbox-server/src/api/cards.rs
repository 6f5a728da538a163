use axum::{
    body::Body,
    extract::{Path, State},
    http::StatusCode,
};
use cardbox_core::storage::{CardStorage, StoreError};
use cardbox_core::types::{Card, CardInput};
use serde::Serialize;

use super::{api_error, json_reply, store_error, ApiError, ApiReply, MAX_BODY_BYTES};
use crate::state::AppState;

#[derive(Serialize)]
pub struct DeleteResponse {
    ok: bool,
    removed: Card,
}

/// GET /api/cards -- full collection in stored order.
pub async fn list_cards(State(state): State<AppState>) -> Result<ApiReply<Vec<Card>>, ApiError> {
    let cards = state
        .storage
        .read_all()
        .map_err(|e| store_error("cardbox.api.list_cards", "Failed to read cards", e))?;
    Ok(json_reply(StatusCode::OK, cards))
}

/// POST /api/cards -- validate and append a card.
pub async fn create_card(
    State(state): State<AppState>,
    body: Body,
) -> Result<ApiReply<Card>, ApiError> {
    const TARGET: &str = "cardbox.api.create_card";
    let input = read_card_body(TARGET, body).await?;
    let card = state
        .storage
        .create(&input)
        .map_err(|e| store_error(TARGET, "Failed to write cards", e))?;
    Ok(json_reply(StatusCode::CREATED, card))
}

/// GET /api/cards/{card_id} -- the id is everything after the prefix, slashes included.
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<ApiReply<serde_json::Value>, ApiError> {
    const TARGET: &str = "cardbox.api.get_card";
    let card_id = card_id.trim();
    // A blank id segment addresses the collection itself.
    let value = if card_id.is_empty() {
        let cards = state
            .storage
            .read_all()
            .map_err(|e| store_error(TARGET, "Failed to read cards", e))?;
        to_value(TARGET, cards)?
    } else {
        let card = state
            .storage
            .get(card_id)
            .map_err(|e| store_error(TARGET, "Failed to read cards", e))?;
        to_value(TARGET, card)?
    };
    Ok(json_reply(StatusCode::OK, value))
}

/// PUT /api/cards/{card_id} -- replace a card; the path id always wins.
pub async fn update_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
    body: Body,
) -> Result<ApiReply<Card>, ApiError> {
    const TARGET: &str = "cardbox.api.update_card";
    let card_id = card_id.trim();
    if card_id.is_empty() {
        return Err(blank_id_not_allowed());
    }
    let input = match read_card_body(TARGET, body).await {
        Ok(input) => input,
        Err(body_error) => {
            // An unknown id answers 404 regardless of what the body holds.
            return match state.storage.get(card_id) {
                Err(e @ StoreError::NotFound(_)) => {
                    Err(store_error(TARGET, "Failed to read cards", e))
                }
                _ => Err(body_error),
            };
        }
    };
    let card = state
        .storage
        .update(card_id, &input)
        .map_err(|e| store_error(TARGET, "Failed to write cards", e))?;
    Ok(json_reply(StatusCode::OK, card))
}

/// DELETE /api/cards/{card_id}
pub async fn delete_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<ApiReply<DeleteResponse>, ApiError> {
    const TARGET: &str = "cardbox.api.delete_card";
    let card_id = card_id.trim();
    if card_id.is_empty() {
        return Err(blank_id_not_allowed());
    }
    let removed = state
        .storage
        .delete(card_id)
        .map_err(|e| store_error(TARGET, "Failed to write cards", e))?;
    Ok(json_reply(
        StatusCode::OK,
        DeleteResponse { ok: true, removed },
    ))
}

/// Read at most `MAX_BODY_BYTES` and decode a card payload.
/// A blank body decodes to an empty input so validation reports the missing fields.
async fn read_card_body(target: &'static str, body: Body) -> Result<CardInput, ApiError> {
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            target,
            "request body too large or unreadable",
            Some(e.to_string()),
        )
    })?;

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(CardInput::default());
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            target,
            "request body is not valid JSON",
            Some(e.to_string()),
        )
    })
}

fn to_value<T: Serialize>(target: &'static str, value: T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            target,
            "Failed to encode response",
            Some(e.to_string()),
        )
    })
}

fn blank_id_not_allowed() -> ApiError {
    api_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "cardbox.api.method",
        "Method Not Allowed",
        None,
    )
}

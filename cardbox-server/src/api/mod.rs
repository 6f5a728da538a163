use axum::{
    http::{HeaderMap, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use cardbox_core::storage::StoreError;
use serde::Serialize;

mod cards;

use crate::state::AppState;

/// Axum REST API routes.
///
///   GET    /api/cards          -> list all cards
///   POST   /api/cards          -> create a card (id derived from term unless given)
///   GET    /api/cards/{id}     -> read one card (id may contain '/')
///   PUT    /api/cards/{id}     -> replace one card, keeping its id
///   DELETE /api/cards/{id}     -> remove one card
///
/// Any other method on these paths answers 405 with a JSON error body.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/cards",
            get(cards::list_cards)
                .post(cards::create_card)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/cards/",
            get(cards::list_cards)
                .post(cards::create_card)
                .fallback(method_not_allowed),
        )
        .route(
            "/api/cards/{*card_id}",
            get(cards::get_card)
                .put(cards::update_card)
                .delete(cards::delete_card)
                .fallback(method_not_allowed),
        )
}

// ── Shared types and helpers used across sub-modules ────────────────────

/// Request bodies above this size are rejected.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

pub type ApiReply<T> = (StatusCode, HeaderMap, Json<T>);
pub type ApiError = ApiReply<ErrorResponse>;

/// JSON response with the API's fixed content-type and no-cache headers.
pub fn json_reply<T: Serialize>(status: StatusCode, body: T) -> ApiReply<T> {
    (status, json_headers(), Json(body))
}

/// Build and log an error reply.
pub fn api_error(
    status: StatusCode,
    target: &'static str,
    error: impl Into<String>,
    detail: Option<String>,
) -> ApiError {
    let error = error.into();
    match &detail {
        Some(detail) => log_api_issue(status, target, format!("{}: {}", error, detail)),
        None => log_api_issue(status, target, &error),
    }
    json_reply(status, ErrorResponse { error, detail })
}

/// Map a store failure onto the HTTP taxonomy. `storage_message` is the
/// summary shown for file-level failures; the cause goes into `detail`.
pub fn store_error(target: &'static str, storage_message: &str, e: StoreError) -> ApiError {
    match e {
        StoreError::Validation(message) => api_error(StatusCode::BAD_REQUEST, target, message, None),
        StoreError::NotFound(_) => {
            api_error(StatusCode::NOT_FOUND, target, e.to_string(), None)
        }
        StoreError::Io(_) | StoreError::Json(_) => api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            target,
            storage_message,
            Some(e.to_string()),
        ),
    }
}

async fn method_not_allowed() -> ApiError {
    api_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "cardbox.api.method",
        "Method Not Allowed",
        None,
    )
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert_header_safe(&mut headers, "content-type", "application/json; charset=utf-8");
    insert_header_safe(&mut headers, "cache-control", "no-cache");
    headers
}

pub(crate) fn insert_header_safe(headers: &mut HeaderMap, name: &'static str, value: &str) {
    match value.parse() {
        Ok(parsed) => {
            headers.insert(name, parsed);
        }
        Err(e) => {
            log::warn!("Failed to set header {}={} ({})", name, value, e);
        }
    }
}

fn log_api_issue(status: StatusCode, target: &'static str, message: impl AsRef<str>) {
    let message = message.as_ref();
    if status.is_server_error() {
        log::error!(target: target, "{}", message);
    } else {
        log::warn!(target: target, "{}", message);
    }
}

use std::time::SystemTime;

use crate::slug::slugify;
use crate::storage::StoreError;
use crate::types::{Card, CardInput};

/// Prefix for IDs generated when a term yields no slug characters.
pub const FALLBACK_ID_PREFIX: &str = "card-";

/// Normalize `input` into a storable card and check it against `cards`.
///
/// `existing_id` names the record being replaced (empty for creation); that
/// record is excluded from the duplicate-ID check so an update may keep its
/// own ID.
pub fn validate_card(
    input: &CardInput,
    cards: &[Card],
    existing_id: &str,
) -> Result<Card, StoreError> {
    let term = trimmed(&input.term);
    let category = trimmed(&input.category);
    let core = trimmed(&input.core);
    let boundary = trimmed(&input.boundary);
    let signal = trimmed(&input.signal);
    let action = trimmed(&input.action);

    if [&term, &category, &core, &boundary, &signal, &action]
        .iter()
        .any(|field| field.is_empty())
    {
        return Err(StoreError::Validation(
            "term/category/core/boundary/signal/action are required".to_string(),
        ));
    }

    let aliases: Vec<String> = input
        .aliases
        .iter()
        .flatten()
        .flatten()
        .map(|alias| alias.trim())
        .filter(|alias| !alias.is_empty())
        .map(ToOwned::to_owned)
        .collect();

    let mut id = trimmed(&input.id);
    if id.is_empty() {
        id = slugify(&term);
    }
    if id.is_empty() {
        id = fallback_id();
    }

    if cards
        .iter()
        .any(|card| card.id == id && card.id != existing_id)
    {
        return Err(StoreError::Validation(format!("card id already exists: {}", id)));
    }

    Ok(Card {
        id,
        term,
        category,
        core,
        boundary,
        signal,
        action,
        aliases,
    })
}

fn trimmed(field: &Option<String>) -> String {
    field.as_deref().unwrap_or("").trim().to_string()
}

fn fallback_id() -> String {
    let ms = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    format!("{}{}", FALLBACK_ID_PREFIX, ms)
}

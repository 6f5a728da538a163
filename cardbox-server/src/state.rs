/// Shared application state passed to axum handlers.

use std::sync::Arc;
use cardbox_core::storage::local::JsonFileStorage;

use crate::static_files::StaticSite;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<JsonFileStorage>,
    pub site: Arc<StaticSite>,
}

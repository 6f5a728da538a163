/// Cardbox server: config loading, storage init, HTTP API and static pages.
pub mod api;
pub mod config;
mod logging;
pub mod server;
pub mod state;
pub mod static_files;

use crate::config::{Cli, ServerConfig};
use crate::state::AppState;
use crate::static_files::StaticSite;
use cardbox_core::storage::local::JsonFileStorage;
use cardbox_core::storage::CardStorage;
use clap::Parser;
use std::sync::Arc;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = logging::init() {
        eprintln!("failed to initialize logger: {}", e);
    }

    let config = ServerConfig::from_cli(Cli::parse())?;

    let storage = Arc::new(JsonFileStorage::new(config.data_file()));
    if let Err(e) = storage.ensure_initialized() {
        log::error!(
            target: "cardbox.server",
            "Cannot initialize card storage at {}: {}",
            storage.data_file().display(),
            e
        );
        return Err(e.into());
    }
    log::info!(target: "cardbox.server", "Card storage at {}", storage.data_file().display());

    let state = AppState {
        storage,
        site: Arc::new(StaticSite::new(config.root_dir.clone(), config.dist_dir.clone())),
    };

    server::serve(&config, state).await
}

pub mod api;
pub mod cli;
pub mod compare;
pub mod core;
pub mod providers;
pub mod record;
pub mod refresh;
pub mod store;

use crate::api::AppState;
use crate::core::SystemClock;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Serve,
    Refresh,
    Compare { json: bool },
}

/// Wires the fetcher, the store and the clock selected by `config`.
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    let source = providers::EcbProvider::new(&config.source.url);
    let store = store::open_store(config)?;

    Ok(AppState {
        source: Arc::new(source),
        store,
        clock: Arc::new(SystemClock),
        refresh_on_request: config.refresh.on_request,
    })
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("ratewatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let state = build_state(&config)?;

    match command {
        AppCommand::Serve => cli::serve::run(&config, state).await,
        AppCommand::Refresh => cli::refresh::run(&state).await,
        AppCommand::Compare { json } => cli::compare::run(&state, json).await,
    }
}

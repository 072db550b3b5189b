use crate::api::AppState;
use crate::core::Clock;
use crate::refresh::refresh;
use anyhow::{Context, Result};

/// Scrapes and records once, for use from cron or a scheduler.
pub async fn run(state: &AppState) -> Result<()> {
    let count = refresh(
        state.source.as_ref(),
        state.store.as_ref(),
        state.clock.as_ref(),
    )
    .await
    .context("Rate refresh failed")?;

    println!("Recorded {count} exchange rates for {}", state.clock.today());
    Ok(())
}

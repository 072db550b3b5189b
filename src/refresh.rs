use crate::api::AppState;
use crate::core::{AppResult, Clock, RateSource, RateStore};
use crate::record::record;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Scrapes the reference page and records the result. Returns the number of rates seen.
pub async fn refresh(
    source: &dyn RateSource,
    store: &dyn RateStore,
    clock: &dyn Clock,
) -> AppResult<usize> {
    let snapshot = source.scrape().await?;
    let count = snapshot.len();
    record(store, clock, snapshot).await?;
    Ok(count)
}

/// Runs [`refresh`] every `period`, starting immediately. Failures are logged
/// and the next tick tries again.
pub fn spawn_scheduled_refresh(state: AppState, period: Duration) -> JoinHandle<()> {
    info!("Scheduling rate refresh every {:?}", period);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match refresh(
                state.source.as_ref(),
                state.store.as_ref(),
                state.clock.as_ref(),
            )
            .await
            {
                Ok(count) => info!(count, "Scheduled refresh complete"),
                Err(e) => error!(error = %e, "Scheduled refresh failed"),
            }
        }
    })
}

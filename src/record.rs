use crate::core::{AppResult, Clock, ExchangeRateEntry, ExchangeRateSnapshot, RateStore};
use tracing::{debug, info};

/// Writes every rate of `snapshot` as an entry dated today.
///
/// All entries go out in one batch; an empty snapshot writes nothing.
pub async fn record(
    store: &dyn RateStore,
    clock: &dyn Clock,
    snapshot: ExchangeRateSnapshot,
) -> AppResult<()> {
    if snapshot.is_empty() {
        debug!("Empty snapshot, nothing to record");
        return Ok(());
    }

    let today = clock.today();
    let entries: Vec<ExchangeRateEntry> = snapshot
        .into_iter()
        .map(|(currency, rate)| ExchangeRateEntry::new(today, currency, rate))
        .collect();
    let count = entries.len();

    store.put_batch(entries).await?;
    info!(date = %today, count, "Recorded exchange rates");
    Ok(())
}

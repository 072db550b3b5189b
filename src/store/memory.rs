use crate::core::{AppResult, ExchangeRateEntry, RateStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory rate table. Entries live as long as the process.
#[derive(Clone, Default)]
pub struct MemoryRateStore {
    inner: Arc<Mutex<BTreeMap<(NaiveDate, String), String>>>,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateStore for MemoryRateStore {
    async fn put_batch(&self, entries: Vec<ExchangeRateEntry>) -> AppResult<()> {
        let mut table = self.inner.lock().await;
        debug!("Store PUT batch of {} entries", entries.len());
        for entry in entries {
            table.insert((entry.date, entry.currency), entry.rate);
        }
        Ok(())
    }

    async fn scan_date(&self, date: NaiveDate) -> AppResult<Vec<ExchangeRateEntry>> {
        let table = self.inner.lock().await;
        let entries: Vec<ExchangeRateEntry> = table
            .iter()
            .filter(|((entry_date, _), _)| *entry_date == date)
            .map(|((entry_date, currency), rate)| {
                ExchangeRateEntry::new(*entry_date, currency.clone(), rate.clone())
            })
            .collect();
        debug!("Store SCAN for {}: {} entries", date, entries.len());
        Ok(entries)
    }
}

use crate::core::{AppError, AppResult, ExchangeRateEntry, RateStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;
use tracing::{debug, warn};

const PARTITION_NAME: &str = "exchange_rates";

/// Rate table persisted in a fjall partition.
///
/// Keys are `YYYY-MM-DD#CODE`, so all entries of one date are contiguous and
/// a date lookup is a prefix scan. Values are the JSON-encoded entry.
pub struct DiskRateStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskRateStore {
    pub fn open(db_path: &Path) -> Result<Self> {
        std::fs::create_dir_all(db_path)?;

        let keyspace = Config::new(db_path.join("fjall_db")).open()?;
        let partition = keyspace.open_partition(PARTITION_NAME, PartitionCreateOptions::default())?;
        debug!("Opened rate store at {}", db_path.display());
        Ok(Self {
            keyspace,
            partition,
        })
    }

    fn entry_key(date: NaiveDate, currency: &str) -> String {
        format!("{}#{}", date.format("%Y-%m-%d"), currency)
    }
}

#[async_trait]
impl RateStore for DiskRateStore {
    async fn put_batch(&self, entries: Vec<ExchangeRateEntry>) -> AppResult<()> {
        let mut batch = self.keyspace.batch();
        let mut queued = 0usize;

        for entry in &entries {
            match serde_json::to_vec(entry) {
                Ok(value) => {
                    batch.insert(
                        &self.partition,
                        Self::entry_key(entry.date, &entry.currency),
                        value,
                    );
                    queued += 1;
                }
                Err(e) => warn!(
                    currency = %entry.currency,
                    "Skipping entry that could not be encoded: {}", e
                ),
            }
        }

        if queued == 0 {
            return Ok(());
        }

        batch
            .commit()
            .map_err(|e| AppError::StorageWrite(e.to_string()))?;
        debug!("Store PUT batch of {} entries", queued);
        Ok(())
    }

    async fn scan_date(&self, date: NaiveDate) -> AppResult<Vec<ExchangeRateEntry>> {
        let prefix = format!("{}#", date.format("%Y-%m-%d"));
        let mut entries = Vec::new();

        for item in self.partition.prefix(&prefix) {
            let (key, value) = item.map_err(|e| AppError::StorageRead(e.to_string()))?;
            match serde_json::from_slice::<ExchangeRateEntry>(&value) {
                Ok(entry) if entry.date == date => entries.push(entry),
                Ok(_) => {}
                Err(e) => warn!(
                    key = %String::from_utf8_lossy(&key),
                    "Skipping undecodable entry: {}", e
                ),
            }
        }

        debug!("Store SCAN for {}: {} entries", date, entries.len());
        Ok(entries)
    }
}

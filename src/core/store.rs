//! Storage abstraction for exchange rate entries

use crate::core::error::AppResult;
use crate::core::rates::ExchangeRateEntry;
use async_trait::async_trait;
use chrono::NaiveDate;

/// A table of [`ExchangeRateEntry`] keyed by `(date, currency)`.
///
/// Writing an entry whose key already exists replaces the stored one.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Upserts all entries in one batch.
    async fn put_batch(&self, entries: Vec<ExchangeRateEntry>) -> AppResult<()>;

    /// Returns every entry whose date equals `date`.
    async fn scan_date(&self, date: NaiveDate) -> AppResult<Vec<ExchangeRateEntry>>;
}

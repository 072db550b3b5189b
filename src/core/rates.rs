//! Exchange rate types and the fetcher abstraction

use crate::core::error::AppResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Currency code → rate text, as scraped from one page fetch.
pub type ExchangeRateSnapshot = HashMap<String, String>;

/// Currency code → comparison, as served on the read route.
pub type ComparisonReport = BTreeMap<String, ComparisonRecord>;

/// One persisted rate. Identity is `(date, currency)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRateEntry {
    pub date: NaiveDate,
    pub currency: String,
    /// Units of `currency` per one euro, kept exactly as published.
    #[serde(rename = "exchange_rate")]
    pub rate: String,
}

impl ExchangeRateEntry {
    pub fn new(date: NaiveDate, currency: impl Into<String>, rate: impl Into<String>) -> Self {
        Self {
            date,
            currency: currency.into(),
            rate: rate.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRecord {
    #[serde(rename = "current-exchange-rate")]
    pub current_rate: Decimal,
    #[serde(rename = "yesterday-exchange-rate")]
    pub previous_rate: Option<Decimal>,
    pub change: Option<Decimal>,
}

impl ComparisonRecord {
    pub fn new(current_rate: Decimal, previous_rate: Option<Decimal>) -> Self {
        Self {
            current_rate,
            previous_rate,
            change: previous_rate.map(|previous| current_rate - previous),
        }
    }
}

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn scrape(&self) -> AppResult<ExchangeRateSnapshot>;
}

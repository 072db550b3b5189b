use crate::core::{AppError, AppResult, Clock, ComparisonRecord, ComparisonReport, RateStore};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

/// Builds the day-over-day comparison for every currency stored today.
///
/// Currencies without a rate yesterday are kept with `previous_rate` and
/// `change` left empty. Currencies only stored yesterday are not reported.
pub async fn compare(store: &dyn RateStore, clock: &dyn Clock) -> AppResult<ComparisonReport> {
    let today = clock.today();
    let yesterday = today
        .pred_opt()
        .ok_or_else(|| AppError::Internal(format!("No calendar day before {today}")))?;

    let today_entries = store.scan_date(today).await?;
    let yesterday_entries = store.scan_date(yesterday).await?;
    debug!(
        %today,
        %yesterday,
        today_count = today_entries.len(),
        yesterday_count = yesterday_entries.len(),
        "Loaded entries for comparison"
    );

    let mut report = ComparisonReport::new();
    for entry in &today_entries {
        let Some(current_rate) = parse_rate(&entry.rate) else {
            warn!(currency = %entry.currency, rate = %entry.rate, "Skipping unparseable rate");
            continue;
        };

        let previous_rate = yesterday_entries
            .iter()
            .find(|previous| previous.currency == entry.currency)
            .and_then(|previous| parse_rate(&previous.rate));

        report.insert(
            entry.currency.clone(),
            ComparisonRecord::new(current_rate, previous_rate),
        );
    }

    Ok(report)
}

fn parse_rate(rate: &str) -> Option<Decimal> {
    Decimal::from_str(rate.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExchangeRateEntry, FixedClock};
    use crate::store::MemoryRateStore;
    use chrono::NaiveDate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn yesterday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
    }

    async fn seeded_store(
        today_rates: &[(&str, &str)],
        yesterday_rates: &[(&str, &str)],
    ) -> MemoryRateStore {
        let store = MemoryRateStore::new();
        let mut entries = Vec::new();
        for (currency, rate) in today_rates {
            entries.push(ExchangeRateEntry::new(today(), *currency, *rate));
        }
        for (currency, rate) in yesterday_rates {
            entries.push(ExchangeRateEntry::new(yesterday(), *currency, *rate));
        }
        store.put_batch(entries).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_compare_with_and_without_previous_day() {
        let store = seeded_store(&[("USD", "1.10"), ("JPY", "160.00")], &[("USD", "1.08")]).await;

        let report = compare(&store, &FixedClock(today())).await.unwrap();

        assert_eq!(report.len(), 2);
        let usd = &report["USD"];
        assert_eq!(usd.current_rate, dec("1.10"));
        assert_eq!(usd.previous_rate, Some(dec("1.08")));
        assert_eq!(usd.change, Some(dec("0.02")));

        let jpy = &report["JPY"];
        assert_eq!(jpy.current_rate, dec("160.00"));
        assert!(jpy.previous_rate.is_none());
        assert!(jpy.change.is_none());
    }

    #[tokio::test]
    async fn test_compare_json_payload() {
        let store = seeded_store(&[("USD", "1.10"), ("JPY", "160.00")], &[("USD", "1.08")]).await;

        let report = compare(&store, &FixedClock(today())).await.unwrap();
        let value = serde_json::to_value(&report).unwrap();

        let approx = |v: &serde_json::Value, expected: f64| {
            (v.as_f64().unwrap() - expected).abs() < 1e-9
        };
        assert!(approx(&value["USD"]["current-exchange-rate"], 1.10));
        assert!(approx(&value["USD"]["yesterday-exchange-rate"], 1.08));
        assert!(approx(&value["USD"]["change"], 0.02));
        assert!(approx(&value["JPY"]["current-exchange-rate"], 160.0));
        assert!(value["JPY"]["yesterday-exchange-rate"].is_null());
        assert!(value["JPY"]["change"].is_null());
    }

    #[tokio::test]
    async fn test_compare_ignores_currencies_only_stored_yesterday() {
        let store = seeded_store(&[("USD", "1.10")], &[("USD", "1.08"), ("CHF", "0.95")]).await;

        let report = compare(&store, &FixedClock(today())).await.unwrap();

        assert_eq!(report.len(), 1);
        assert!(!report.contains_key("CHF"));
    }

    #[tokio::test]
    async fn test_compare_empty_store() {
        let store = MemoryRateStore::new();

        let report = compare(&store, &FixedClock(today())).await.unwrap();

        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_compare_unparseable_rates() {
        let store = seeded_store(&[("USD", "1.10"), ("XXX", "n/a")], &[("USD", "--")]).await;

        let report = compare(&store, &FixedClock(today())).await.unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report["USD"].current_rate, dec("1.10"));
        assert!(report["USD"].previous_rate.is_none());
        assert!(report["USD"].change.is_none());
    }

    #[tokio::test]
    async fn test_compare_crosses_month_boundary() {
        // 2024-03-01 looks back to the leap day
        let store = seeded_store(&[("GBP", "0.8550")], &[("GBP", "0.8600")]).await;

        let report = compare(&store, &FixedClock(today())).await.unwrap();

        assert_eq!(report["GBP"].change, Some(dec("-0.0050")));
    }

    #[tokio::test]
    async fn test_compare_without_previous_day_is_internal_error() {
        let store = MemoryRateStore::new();

        let err = compare(&store, &FixedClock(NaiveDate::MIN))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Internal(_)));
    }
}

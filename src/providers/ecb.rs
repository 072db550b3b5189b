use crate::core::{AppError, AppResult, ExchangeRateSnapshot, RateSource};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

/// Scrapes the ECB euro reference rate table.
pub struct EcbProvider {
    url: String,
    client: reqwest::Client,
}

impl EcbProvider {
    pub fn new(url: &str) -> Self {
        EcbProvider {
            url: url.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RateSource for EcbProvider {
    #[instrument(name = "EcbScrape", skip(self), fields(url = %self.url))]
    async fn scrape(&self) -> AppResult<ExchangeRateSnapshot> {
        debug!("Requesting reference rates from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("Request error: {e} URL: {}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Transport(format!(
                "Upstream returned {status} for URL: {}",
                self.url
            )));
        }

        let body = response.text().await?;
        let rates = parse_rates(&body);
        debug!("Scraped {} reference rates", rates.len());

        Ok(rates)
    }
}

/// Extracts `currency → rate` pairs from the reference rate page.
///
/// A `tr` contributes only when it holds both a `td.currency` cell and a
/// `span.rate` element with non-blank text. Later rows win for a repeated code.
pub fn parse_rates(html: &str) -> ExchangeRateSnapshot {
    let document = Html::parse_document(html);
    let (Ok(row_selector), Ok(currency_selector), Ok(rate_selector)) = (
        Selector::parse("tr"),
        Selector::parse("td.currency"),
        Selector::parse("span.rate"),
    ) else {
        return ExchangeRateSnapshot::new();
    };

    let mut rates = ExchangeRateSnapshot::new();
    for row in document.select(&row_selector) {
        let currency = first_text(row, &currency_selector);
        let rate = first_text(row, &rate_selector);
        if let (Some(currency), Some(rate)) = (currency, rate) {
            rates.insert(currency, rate);
        }
    }
    rates
}

fn first_text(row: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let text = row.select(selector).next()?.text().collect::<String>();
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const RATES_PAGE: &str = r#"
<html><body>
<table class="forextable">
  <thead><tr><th>Currency</th><th>Spot</th></tr></thead>
  <tbody>
    <tr>
      <td id="USD" class="currency"><a href="./usd.en.html">USD</a></td>
      <td class="alignLeft"><a href="./usd.en.html">US dollar</a></td>
      <td class="spot number"><a href="./usd.en.html"><span class="rate">1.0823</span></a></td>
    </tr>
    <tr>
      <td id="JPY" class="currency"><a href="./jpy.en.html"> JPY </a></td>
      <td class="alignLeft">Japanese yen</td>
      <td class="spot number"><span class="rate">
        160.12
      </span></td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

    async fn create_ecb_mock_server(body: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rates.html"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[test]
    fn test_parse_rates_trims_text() {
        let rates = parse_rates(RATES_PAGE);

        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get("USD").map(String::as_str), Some("1.0823"));
        assert_eq!(rates.get("JPY").map(String::as_str), Some("160.12"));
    }

    #[test]
    fn test_parse_rates_skips_incomplete_rows() {
        let html = r#"<table>
            <tr><td class="currency">USD</td><td><span class="rate">1.08</span></td></tr>
            <tr><td class="currency">GBP</td><td>no rate here</td></tr>
            <tr><td>CHF</td><td><span class="rate">0.95</span></td></tr>
            <tr><td class="currency">   </td><td><span class="rate">2.00</span></td></tr>
            <tr><td class="currency">SEK</td><td><span class="rate">  </span></td></tr>
        </table>"#;

        let rates = parse_rates(html);

        assert_eq!(rates.len(), 1);
        assert_eq!(rates.get("USD").map(String::as_str), Some("1.08"));
    }

    #[test]
    fn test_parse_rates_last_row_wins() {
        let html = r#"<table>
            <tr><td class="currency">USD</td><td><span class="rate">1.01</span></td></tr>
            <tr><td class="currency">USD</td><td><span class="rate">1.02</span></td></tr>
        </table>"#;

        let rates = parse_rates(html);

        assert_eq!(rates.len(), 1);
        assert_eq!(rates.get("USD").map(String::as_str), Some("1.02"));
    }

    #[test]
    fn test_parse_rates_empty_or_unrelated_page() {
        assert!(parse_rates("").is_empty());
        assert!(parse_rates("<html><body><p>Maintenance</p></body></html>").is_empty());
        assert!(parse_rates("<<<not html at all").is_empty());
    }

    #[tokio::test]
    async fn test_successful_scrape() {
        let mock_server = create_ecb_mock_server(RATES_PAGE, 200).await;
        let provider = EcbProvider::new(&format!("{}/rates.html", mock_server.uri()));

        let rates = provider.scrape().await.unwrap();

        assert_eq!(rates.len(), 2);
        assert_eq!(rates.get("USD").map(String::as_str), Some("1.0823"));
    }

    #[tokio::test]
    async fn test_scrape_non_success_status_is_transport_error() {
        let mock_server = create_ecb_mock_server("Server Error", 500).await;
        let provider = EcbProvider::new(&format!("{}/rates.html", mock_server.uri()));

        let result = provider.scrape().await;

        assert!(matches!(result, Err(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn test_scrape_unreachable_host_is_transport_error() {
        let provider = EcbProvider::new("http://127.0.0.1:1/rates.html");

        let result = provider.scrape().await;

        assert!(matches!(result, Err(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn test_scrape_empty_page_yields_empty_snapshot() {
        let mock_server = create_ecb_mock_server("", 200).await;
        let provider = EcbProvider::new(&format!("{}/rates.html", mock_server.uri()));

        let rates = provider.scrape().await.unwrap();

        assert!(rates.is_empty());
    }
}

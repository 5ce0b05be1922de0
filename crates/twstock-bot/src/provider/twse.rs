//! Taiwan Stock Exchange public endpoints
//!
//! - real-time quotes: `mis.twse.com.tw/stock/api/getStockInfo.jsp`
//! - daily rows: `exchangeReport/STOCK_DAY`, one month per request
//! - monthly average close: `exchangeReport/STOCK_DAY_AVG`, one month per request

use super::{DailyRows, FetchRequest, MonthlyFields, RealTimeFields, Snapshot, StockProvider};
use crate::config::BotConfig;
use crate::date_util::{self, AD_FORMAT, DateRange};
use crate::error::{Result, StockError};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const DAILY_ENDPOINT: &str = "exchangeReport/STOCK_DAY";
const MONTHLY_AVG_ENDPOINT: &str = "exchangeReport/STOCK_DAY_AVG";
const QUOTE_ENDPOINT: &str = "stock/api/getStockInfo.jsp";
const DATE_HEADER: &str = "日期";
const RATE_WINDOW: Duration = Duration::from_secs(5);

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Report table shared by STOCK_DAY and STOCK_DAY_AVG
#[derive(Debug, Deserialize)]
struct TableResponse {
    stat: String,
    #[serde(default)]
    fields: Vec<String>,
    #[serde(default)]
    data: Vec<Vec<String>>,
}

impl TableResponse {
    fn is_ok(&self) -> bool {
        self.stat.eq_ignore_ascii_case("OK")
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "msgArray", default)]
    msg_array: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Provider backed by the exchange's public JSON endpoints
#[derive(Debug, Clone)]
pub struct TwseProvider {
    client: Client,
    twse_base_url: String,
    mis_base_url: String,
    rate_limiter: SharedRateLimiter,
}

impl TwseProvider {
    pub fn new(config: &BotConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("twstock-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // The exchange blocks clients that go above ~3 requests per 5 seconds
        let burst = NonZeroU32::new(config.rate_limit_per_5s).ok_or_else(|| {
            StockError::ConfigError("rate_limit_per_5s must be greater than 0".to_string())
        })?;
        let quota = Quota::with_period(RATE_WINDOW / burst.get())
            .ok_or_else(|| StockError::ConfigError("rate limit period is zero".to_string()))?
            .allow_burst(burst);

        Ok(Self {
            client,
            twse_base_url: config.twse_base_url.trim_end_matches('/').to_string(),
            mis_base_url: config.mis_base_url.trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        self.rate_limiter.until_ready().await;
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;
        if !response.status().is_success() {
            return Err(StockError::Provider(format!(
                "HTTP error {} from {url}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn report(&self, endpoint: &str, stock_no: &str, month: &str) -> Result<TableResponse> {
        let url = format!("{}/{endpoint}", self.twse_base_url);
        self.get_json(
            &url,
            &[("response", "json"), ("date", month), ("stockNo", stock_no)],
        )
        .await
    }

    /// Latest quote, looked up on both the listed and the OTC market
    pub async fn real_time(&self, stock_no: &str) -> Result<RealTimeFields> {
        let url = format!("{}/{QUOTE_ENDPOINT}", self.mis_base_url);
        let channels = format!("tse_{stock_no}.tw|otc_{stock_no}.tw");
        let response: QuoteResponse = self
            .get_json(&url, &[("ex_ch", channels.as_str()), ("json", "1"), ("delay", "0")])
            .await?;

        let Some(quote) = response.msg_array.into_iter().next() else {
            tracing::debug!("No real-time quote for {}", stock_no);
            return Ok(RealTimeFields::new());
        };

        Ok(quote
            .into_iter()
            .map(|(key, value)| {
                let value = match value {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect())
    }

    /// Daily rows for every month the range touches, dates as `YYYYMMDD`.
    ///
    /// Rows outside the range are kept; narrowing is the caller's job.
    pub async fn daily(&self, stock_no: &str, range: &DateRange) -> Result<DailyRows> {
        let mut rows = DailyRows::default();

        for month in range.months()? {
            let table = self.report(DAILY_ENDPOINT, stock_no, &month).await?;
            if !table.is_ok() {
                tracing::debug!("STOCK_DAY {} {}: {}", stock_no, month, table.stat);
                continue;
            }
            if rows.fields.is_empty() {
                rows.fields.clone_from(&table.fields);
            }
            rows.data.extend(normalize_dates(&table.fields, table.data));
        }

        Ok(rows)
    }

    /// Average close per month (`YYYYMM` → value) for every month the range touches
    pub async fn monthly_averages(&self, stock_no: &str, range: &DateRange) -> Result<MonthlyFields> {
        let mut averages = MonthlyFields::new();

        for month in range.months()? {
            let table = self.report(MONTHLY_AVG_ENDPOINT, stock_no, &month).await?;
            if !table.is_ok() {
                tracing::debug!("STOCK_DAY_AVG {} {}: {}", stock_no, month, table.stat);
                continue;
            }
            if let Some(average) = monthly_average(&table.data) {
                averages.insert(month.chars().take(6).collect(), average);
            }
        }

        Ok(averages)
    }
}

#[async_trait]
impl StockProvider for TwseProvider {
    async fn fetch(&self, stock_no: &str, request: FetchRequest) -> Result<Snapshot> {
        let real_time = quote_or_skip(
            stock_no,
            self.real_time(stock_no).await,
            request.date_range.is_some(),
        )?;

        let Some(range) = &request.date_range else {
            return Ok(Snapshot {
                real_time,
                ..Snapshot::default()
            });
        };

        let daily = self.daily(stock_no, range).await?;
        let monthly = if request.monthly_averages {
            Some(self.monthly_averages(stock_no, range).await?)
        } else {
            None
        };

        Ok(Snapshot {
            real_time,
            daily: Some(daily),
            monthly,
        })
    }
}

/// A ranged query can still answer from daily rows when the quote endpoint
/// fails; a quote-only query cannot.
fn quote_or_skip(
    stock_no: &str,
    quote: Result<RealTimeFields>,
    ranged: bool,
) -> Result<Option<RealTimeFields>> {
    match quote {
        Ok(fields) => Ok(Some(fields)),
        Err(e) if ranged => {
            tracing::warn!("Real-time quote for {} unavailable, continuing: {}", stock_no, e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Rewrite the ROC date column to `YYYYMMDD`, dropping rows it cannot convert
fn normalize_dates(fields: &[String], data: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let Some(date_idx) = fields.iter().position(|field| field == DATE_HEADER) else {
        return data;
    };

    data.into_iter()
        .filter_map(|mut row| {
            let roc = row.get(date_idx)?;
            match date_util::roc_to_ad(roc.trim(), AD_FORMAT) {
                Ok(ad) => {
                    row[date_idx] = ad;
                    Some(row)
                }
                Err(e) => {
                    tracing::debug!("Skipping row: {}", e);
                    None
                }
            }
        })
        .collect()
}

/// STOCK_DAY_AVG lists daily closes followed by a summary row whose first
/// cell is a label instead of a date.
fn monthly_average(data: &[Vec<String>]) -> Option<String> {
    data.iter()
        .rev()
        .find(|row| {
            row.first()
                .is_some_and(|first| date_util::roc_to_ad(first.trim(), AD_FORMAT).is_err())
        })
        .and_then(|row| row.get(1))
        .map(|value| value.trim().to_string())
}

//! Built-in command handlers

use super::commands::{CommandArgs, CommandEntry, CommandHandler, CommandRegistry};
use super::format;
use crate::config::BotConfig;
use crate::date_util::DateRange;
use crate::error::Result;
use crate::interface::TextMessage;
use crate::provider::{FetchRequest, StockProvider};
use crate::stock::{DailyField, Field, Interval, Stock};
use async_trait::async_trait;
use std::sync::Arc;

/// Registry with every built-in command wired to `provider`
pub fn default_registry(config: &BotConfig, provider: Arc<dyn StockProvider>) -> CommandRegistry {
    CommandRegistry::builder()
        .register("/test", "Check that the bot is alive", "/test", TestHandler)
        .register(
            "/name",
            "Look up a stock's short and full name",
            "/name <stock no>  e.g. /name 2330",
            NameHandler::new(provider.clone()),
        )
        .register(
            "/price",
            "Real-time quote",
            "/price <stock no>  e.g. /price 2330",
            PriceHandler::new(provider.clone()),
        )
        .register(
            "/daily",
            "Daily trading data, current month when no dates are given",
            "/daily <stock no> [<start YYYYMMDD> <end YYYYMMDD>]  e.g. /daily 2330 20250101 20250110",
            DailyHandler::new(provider.clone(), config.daily_batch_size, config.max_range_months),
        )
        .register(
            "/pricetrend",
            "Closing price trend per day or per month",
            "/pricetrend <stock no> [<start YYYYMMDD> <end YYYYMMDD> [day|month]]  e.g. /pricetrend 2330 20250101 20250331 month",
            PriceTrendHandler::new(
                provider.clone(),
                config.series_rows_per_message,
                config.max_range_months,
            ),
        )
        .register(
            "/kline",
            "Daily open/high/low/close candles",
            "/kline <stock no> [<start YYYYMMDD> <end YYYYMMDD>]  e.g. /kline 2330 20250101 20250110",
            KlineHandler::new(provider, config.series_rows_per_message, config.max_range_months),
        )
        .build()
}

async fn load(provider: &dyn StockProvider, stock_no: &str, request: FetchRequest) -> Result<Stock> {
    tracing::debug!("Fetching {} ({:?})", stock_no, request);
    let snapshot = provider.fetch(stock_no, request).await?;
    Stock::from_snapshot(stock_no, snapshot)
}

/// Date range from position 2 onward, refused when wider than `max_months`
fn requested_range(args: &CommandArgs<'_>, max_months: usize) -> Result<DateRange> {
    let range = args.date_range(2)?;
    range.ensure_span(max_months)?;
    Ok(range)
}

fn no_data(stock_no: &str, date_range: Option<&DateRange>) -> Vec<TextMessage> {
    let text = match date_range {
        Some(range) => format!("🔍 No data for {stock_no} between {range}"),
        None => format!("🔍 No data for {stock_no}"),
    };
    vec![TextMessage::new(text)]
}

/// Lists the registered commands
pub struct HelpHandler {
    listing: String,
}

impl HelpHandler {
    pub fn new(entries: &[CommandEntry]) -> Self {
        let mut lines = vec!["📖 Commands".to_string(), "/help  Show all commands".to_string()];
        lines.extend(
            entries
                .iter()
                .filter(|entry| entry.token != "/help")
                .map(|entry| format!("{}  {}\n    {}", entry.token, entry.description, entry.usage)),
        );
        Self {
            listing: lines.join("\n"),
        }
    }
}

#[async_trait]
impl CommandHandler for HelpHandler {
    async fn handle(&self, _text: &str) -> Result<Vec<TextMessage>> {
        Ok(vec![
            TextMessage::new(self.listing.clone()),
            TextMessage::new(
                "💡 Tips\nDates are YYYYMMDD and inclusive.\nWithout dates, data covers the current month.\nCommands are case-insensitive.",
            ),
        ])
    }
}

pub struct TestHandler;

#[async_trait]
impl CommandHandler for TestHandler {
    async fn handle(&self, _text: &str) -> Result<Vec<TextMessage>> {
        Ok(vec![TextMessage::new("✅ Bot is up and running")])
    }
}

pub struct NameHandler {
    provider: Arc<dyn StockProvider>,
}

impl NameHandler {
    pub fn new(provider: Arc<dyn StockProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CommandHandler for NameHandler {
    async fn handle(&self, text: &str) -> Result<Vec<TextMessage>> {
        let args = CommandArgs::parse(text);
        let stock_no = args.stock_no(1)?;
        let stock = load(self.provider.as_ref(), stock_no, FetchRequest::quote()).await?;

        let Some(short_name) = stock.text(Field::ShortName)? else {
            return Ok(no_data(stock_no, None));
        };
        let full_name = stock.text(Field::FullName).ok().flatten();

        let mut reply = format!("🏷️ {stock_no}: {short_name}");
        if let Some(full_name) = full_name.filter(|name| !name.is_empty() && *name != short_name) {
            reply.push_str(&format!("\n{full_name}"));
        }
        Ok(vec![TextMessage::new(reply)])
    }
}

pub struct PriceHandler {
    provider: Arc<dyn StockProvider>,
}

impl PriceHandler {
    pub fn new(provider: Arc<dyn StockProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl CommandHandler for PriceHandler {
    async fn handle(&self, text: &str) -> Result<Vec<TextMessage>> {
        let args = CommandArgs::parse(text);
        let stock_no = args.stock_no(1)?;
        let stock = load(self.provider.as_ref(), stock_no, FetchRequest::quote()).await?;

        if stock.text(Field::Code)?.is_none() {
            return Ok(no_data(stock_no, None));
        }

        // Quotes before the first trade of the day carry "-" for most prices
        let value = |field| {
            stock
                .text(field)
                .ok()
                .flatten()
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| "-".to_string())
        };

        let reply = format!(
            "📈 {stock}\nLast: {}\nOpen: {}  High: {}  Low: {}\nPrev close: {}\nVolume: {}\nAs of {} {}",
            value(Field::LastPrice),
            value(Field::Open),
            value(Field::High),
            value(Field::Low),
            value(Field::PrevClose),
            value(Field::TotalVolume),
            format::date_label(&value(Field::TradeDate)),
            value(Field::TradeTime),
        );
        Ok(vec![TextMessage::new(reply)])
    }
}

/// Header plus the daily records in groups of `batch_size`
pub struct DailyHandler {
    provider: Arc<dyn StockProvider>,
    batch_size: usize,
    max_range_months: usize,
}

impl DailyHandler {
    pub fn new(provider: Arc<dyn StockProvider>, batch_size: usize, max_range_months: usize) -> Self {
        Self {
            provider,
            batch_size,
            max_range_months,
        }
    }
}

#[async_trait]
impl CommandHandler for DailyHandler {
    async fn handle(&self, text: &str) -> Result<Vec<TextMessage>> {
        let args = CommandArgs::parse(text);
        let stock_no = args.stock_no(1)?;
        let range = requested_range(&args, self.max_range_months)?;
        let stock = load(self.provider.as_ref(), stock_no, FetchRequest::daily(range.clone())).await?;

        let mut records = stock.daily_records(Some(&range))?;
        if records.is_empty() {
            return Ok(no_data(stock_no, Some(&range)));
        }
        records.sort_by(|a, b| a.date().cmp(&b.date()));

        let mut replies = vec![TextMessage::new(format!(
            "📊 {stock}\nDaily data {range} ({} trading days)",
            records.len()
        ))];
        replies.extend(
            format::chunked(&records, self.batch_size, "\n\n", format::daily_record)
                .into_iter()
                .map(TextMessage::new),
        );
        Ok(replies)
    }
}

/// Closing price series with a summary header
pub struct PriceTrendHandler {
    provider: Arc<dyn StockProvider>,
    rows_per_message: usize,
    max_range_months: usize,
}

impl PriceTrendHandler {
    pub fn new(provider: Arc<dyn StockProvider>, rows_per_message: usize, max_range_months: usize) -> Self {
        Self {
            provider,
            rows_per_message,
            max_range_months,
        }
    }
}

#[async_trait]
impl CommandHandler for PriceTrendHandler {
    async fn handle(&self, text: &str) -> Result<Vec<TextMessage>> {
        let args = CommandArgs::parse(text);
        let stock_no = args.stock_no(1)?;
        let range = requested_range(&args, self.max_range_months)?;
        let interval = args
            .optional(4)
            .map(str::parse::<Interval>)
            .transpose()?
            .unwrap_or_default();
        let request =
            FetchRequest::daily(range.clone()).with_monthly_averages(interval == Interval::Month);
        let stock = load(self.provider.as_ref(), stock_no, request).await?;

        let Some(points) = stock.daily_field_transform(DailyField::Close, interval, Some(&range))?
        else {
            return Ok(no_data(stock_no, Some(&range)));
        };

        let mut header = format!("📉 {stock}\nClosing price per {interval}, {range}");
        if let Some(summary) = format::series_summary(&points) {
            header.push('\n');
            header.push_str(&summary);
        }

        let mut replies = vec![TextMessage::new(header)];
        replies.extend(
            format::chunked(&points, self.rows_per_message, "\n", format::series_row)
                .into_iter()
                .map(TextMessage::new),
        );
        Ok(replies)
    }
}

pub struct KlineHandler {
    provider: Arc<dyn StockProvider>,
    rows_per_message: usize,
    max_range_months: usize,
}

impl KlineHandler {
    pub fn new(provider: Arc<dyn StockProvider>, rows_per_message: usize, max_range_months: usize) -> Self {
        Self {
            provider,
            rows_per_message,
            max_range_months,
        }
    }
}

#[async_trait]
impl CommandHandler for KlineHandler {
    async fn handle(&self, text: &str) -> Result<Vec<TextMessage>> {
        let args = CommandArgs::parse(text);
        let stock_no = args.stock_no(1)?;
        let range = requested_range(&args, self.max_range_months)?;
        let stock = load(self.provider.as_ref(), stock_no, FetchRequest::daily(range.clone())).await?;

        let Some(candles) = stock.kline(Some(&range))? else {
            return Ok(no_data(stock_no, Some(&range)));
        };

        let mut replies = vec![TextMessage::new(format!(
            "🕯️ {stock}\nK-line {range} ({} days)",
            candles.len()
        ))];
        replies.extend(
            format::chunked(&candles, self.rows_per_message, "\n", format::candle_row)
                .into_iter()
                .map(TextMessage::new),
        );
        Ok(replies)
    }
}

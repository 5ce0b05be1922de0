//! Stock entity and time-series aggregation
//!
//! A [`Stock`] is built for a single query, filled from one provider
//! [`Snapshot`] and dropped once the reply is rendered. The store is keyed by
//! the closed [`Field`] vocabulary; anything the provider sends outside that
//! vocabulary is dropped on the way in.

use crate::date_util::DateRange;
use crate::error::{Result, StockError};
use crate::provider::{DailyRows, MonthlyFields, RealTimeFields, Snapshot};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Queryable fields: real-time quote attributes plus the two series keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Code,
    ShortName,
    FullName,
    Exchange,
    TradeDate,
    TradeTime,
    TimestampMs,
    LastPrice,
    Open,
    High,
    Low,
    PrevClose,
    LimitUp,
    LimitDown,
    TotalVolume,
    TickVolume,
    BidPrices,
    AskPrices,
    BidVolumes,
    AskVolumes,
    DataKey,
    DailyTimeSeries,
    MonthlyAverages,
}

impl Field {
    /// Real-time fields and the provider field code each is copied from
    pub const REAL_TIME: [(Field, &'static str); 21] = [
        (Field::Code, "c"),
        (Field::ShortName, "n"),
        (Field::FullName, "nf"),
        (Field::Exchange, "ex"),
        (Field::TradeDate, "d"),
        (Field::TradeTime, "t"),
        (Field::TimestampMs, "tlong"),
        (Field::LastPrice, "z"),
        (Field::Open, "o"),
        (Field::High, "h"),
        (Field::Low, "l"),
        (Field::PrevClose, "y"),
        (Field::LimitUp, "u"),
        (Field::LimitDown, "w"),
        (Field::TotalVolume, "v"),
        (Field::TickVolume, "tv"),
        (Field::BidPrices, "b"),
        (Field::AskPrices, "a"),
        (Field::BidVolumes, "g"),
        (Field::AskVolumes, "f"),
        (Field::DataKey, "key"),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Code => "code",
            Field::ShortName => "short_name",
            Field::FullName => "full_name",
            Field::Exchange => "exchange",
            Field::TradeDate => "trade_date",
            Field::TradeTime => "trade_time",
            Field::TimestampMs => "timestamp_ms",
            Field::LastPrice => "last_price",
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::PrevClose => "prev_close",
            Field::LimitUp => "limit_up",
            Field::LimitDown => "limit_down",
            Field::TotalVolume => "total_volume",
            Field::TickVolume => "tick_volume",
            Field::BidPrices => "bid_prices",
            Field::AskPrices => "ask_prices",
            Field::BidVolumes => "bid_volumes",
            Field::AskVolumes => "ask_volumes",
            Field::DataKey => "data_key",
            Field::DailyTimeSeries => "daily_time_series",
            Field::MonthlyAverages => "monthly_averages",
        }
    }

    pub fn provider_key(self) -> Option<&'static str> {
        Self::REAL_TIME
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, key)| *key)
    }

    fn all() -> impl Iterator<Item = Field> {
        Self::REAL_TIME
            .into_iter()
            .map(|(field, _)| field)
            .chain([Field::DailyTimeSeries, Field::MonthlyAverages])
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        Field::all()
            .find(|field| field.name() == wanted)
            .ok_or_else(|| StockError::UnknownField(s.to_string()))
    }
}

/// Columns of one trading day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyField {
    Date,
    Open,
    High,
    Low,
    Close,
    TradedValue,
    TradedVolume,
    TradeCount,
    PriceChange,
}

impl DailyField {
    /// Map an exchange column header (or its English name) to a column
    pub fn from_header(header: &str) -> Option<Self> {
        let field = match header.trim() {
            "日期" | "date" => DailyField::Date,
            "開盤價" | "open" => DailyField::Open,
            "最高價" | "high" => DailyField::High,
            "最低價" | "low" => DailyField::Low,
            "收盤價" | "close" => DailyField::Close,
            "成交金額" | "traded_value" => DailyField::TradedValue,
            "成交股數" | "traded_volume" => DailyField::TradedVolume,
            "成交筆數" | "trade_count" => DailyField::TradeCount,
            "漲跌價差" | "price_change" => DailyField::PriceChange,
            _ => return None,
        };
        Some(field)
    }
}

/// One trading day, values kept exactly as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DailyRecord(BTreeMap<DailyField, String>);

impl DailyRecord {
    /// Zip a positional row with its header. Unknown columns are dropped.
    pub fn from_row(fields: &[String], row: &[String]) -> Self {
        Self(
            fields
                .iter()
                .zip(row)
                .filter_map(|(header, value)| {
                    DailyField::from_header(header).map(|field| (field, value.clone()))
                })
                .collect(),
        )
    }

    pub fn get(&self, field: DailyField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn date(&self) -> Option<&str> {
        self.get(DailyField::Date)
    }

    /// Numeric value of a column, tolerating thousands separators
    pub fn number(&self, field: DailyField) -> Option<f64> {
        self.get(field).and_then(parse_number)
    }
}

impl<const N: usize> From<[(DailyField, &str); N]> for DailyRecord {
    fn from(pairs: [(DailyField, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(field, value)| (field, value.to_string()))
                .collect(),
        )
    }
}

/// Average close for one month, as received
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAverage {
    pub month: String,
    pub average_close: String,
}

/// Stored value for one [`Field`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Daily(Vec<DailyRecord>),
    Monthly(Vec<MonthlyAverage>),
}

/// Aggregation granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interval {
    #[default]
    Day,
    Month,
}

impl FromStr for Interval {
    type Err = StockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" | "daily" => Ok(Interval::Day),
            "month" | "m" | "monthly" => Ok(Interval::Month),
            other => Err(StockError::Validation(format!(
                "interval must be day or month, got {other}"
            ))),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interval::Day => f.write_str("day"),
            Interval::Month => f.write_str("month"),
        }
    }
}

/// `(label, value)` pair of a series; the label is a date or a `YYYYMM` month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Open/high/low/close of one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candle {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Category {
    RealTime,
    Daily,
    Monthly,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::RealTime => f.write_str("real-time"),
            Category::Daily => f.write_str("daily"),
            Category::Monthly => f.write_str("monthly"),
        }
    }
}

/// One equity's fetched data
#[derive(Debug, Clone)]
pub struct Stock {
    no: String,
    data: HashMap<Field, FieldValue>,
    populated: HashSet<Category>,
}

impl Stock {
    pub fn new(stock_no: impl Into<String>) -> Result<Self> {
        let no = stock_no.into();
        if no.trim().is_empty() {
            return Err(StockError::InvalidSymbol(
                "stock number must not be empty".to_string(),
            ));
        }
        Ok(Self {
            no,
            data: HashMap::new(),
            populated: HashSet::new(),
        })
    }

    /// Build and fill from a provider snapshot in one step
    pub fn from_snapshot(stock_no: impl Into<String>, snapshot: Snapshot) -> Result<Self> {
        let mut stock = Self::new(stock_no)?;
        stock.apply(snapshot)?;
        Ok(stock)
    }

    pub fn no(&self) -> &str {
        &self.no
    }

    pub fn apply(&mut self, snapshot: Snapshot) -> Result<()> {
        self.set_data(snapshot.daily, snapshot.real_time, snapshot.monthly)
    }

    /// Merge provider data into the store.
    ///
    /// Each category may be filled once. Empty real-time or monthly maps are
    /// treated as absent; a present daily table is stored even when it has no
    /// rows so that "no rows in range" stays distinguishable from "never
    /// fetched".
    pub fn set_data(
        &mut self,
        daily: Option<DailyRows>,
        real_time: Option<RealTimeFields>,
        monthly: Option<MonthlyFields>,
    ) -> Result<()> {
        let real_time = real_time.filter(|fields| !fields.is_empty());
        let monthly = monthly.filter(|fields| !fields.is_empty());

        for (present, category) in [
            (daily.is_some(), Category::Daily),
            (real_time.is_some(), Category::RealTime),
            (monthly.is_some(), Category::Monthly),
        ] {
            if present && self.populated.contains(&category) {
                return Err(StockError::Validation(format!(
                    "{category} data for {} was already set",
                    self.no
                )));
            }
        }

        if let Some(fields) = real_time {
            for (field, key) in Field::REAL_TIME {
                if let Some(value) = fields.get(key) {
                    self.data.insert(field, FieldValue::Text(value.clone()));
                }
            }
            self.populated.insert(Category::RealTime);
        }

        if let Some(rows) = daily {
            let records = rows
                .data
                .iter()
                .map(|row| DailyRecord::from_row(&rows.fields, row))
                .collect();
            self.data
                .insert(Field::DailyTimeSeries, FieldValue::Daily(records));
            self.populated.insert(Category::Daily);
        }

        if let Some(averages) = monthly {
            let averages = averages
                .into_iter()
                .map(|(month, average_close)| MonthlyAverage {
                    month,
                    average_close,
                })
                .collect();
            self.data
                .insert(Field::MonthlyAverages, FieldValue::Monthly(averages));
            self.populated.insert(Category::Monthly);
        }

        Ok(())
    }

    /// Look up a field.
    ///
    /// `Ok(None)` when nothing has been stored yet. A date range only applies
    /// to [`Field::DailyTimeSeries`] and is inclusive on both ends.
    pub fn get(&self, field: Field, date_range: Option<&DateRange>) -> Result<Option<FieldValue>> {
        if self.data.is_empty() {
            return Ok(None);
        }

        let value = self
            .data
            .get(&field)
            .ok_or_else(|| StockError::FieldNotFound(field.to_string()))?;

        match (value, date_range) {
            (FieldValue::Daily(records), Some(range)) => Ok(Some(FieldValue::Daily(
                records
                    .iter()
                    .filter(|record| record.date().is_some_and(|date| range.contains(date)))
                    .cloned()
                    .collect(),
            ))),
            _ => Ok(Some(value.clone())),
        }
    }

    /// Scalar value of a real-time field
    pub fn text(&self, field: Field) -> Result<Option<String>> {
        match self.get(field, None)? {
            Some(FieldValue::Text(value)) => Ok(Some(value)),
            _ => Ok(None),
        }
    }

    /// Daily records in provider order, empty when nothing is stored
    pub fn daily_records(&self, date_range: Option<&DateRange>) -> Result<Vec<DailyRecord>> {
        match self.get(Field::DailyTimeSeries, date_range)? {
            Some(FieldValue::Daily(records)) => Ok(records),
            _ => Ok(Vec::new()),
        }
    }

    /// Extract one numeric column as a series, per day or averaged per month.
    ///
    /// Rows whose value does not parse are skipped. Monthly closing prices
    /// come from the provider's own averages when those were supplied.
    /// Returns `None` when no row produced a value.
    pub fn daily_field_transform(
        &self,
        field: DailyField,
        interval: Interval,
        date_range: Option<&DateRange>,
    ) -> Result<Option<Vec<SeriesPoint>>> {
        if field == DailyField::Close && interval == Interval::Month {
            if let Some(FieldValue::Monthly(averages)) = self.data.get(&Field::MonthlyAverages) {
                let mut points: Vec<SeriesPoint> = averages
                    .iter()
                    .filter_map(|avg| {
                        parse_number(&avg.average_close)
                            .map(|value| SeriesPoint::new(avg.month.clone(), value))
                    })
                    .collect();
                points.sort_by(|a, b| a.label.cmp(&b.label));
                return Ok((!points.is_empty()).then_some(points));
            }
        }

        let records = self.daily_records(date_range)?;
        let mut points: Vec<SeriesPoint> = records
            .iter()
            .filter_map(|record| Some(SeriesPoint::new(record.date()?, record.number(field)?)))
            .collect();

        if points.is_empty() {
            return Ok(None);
        }

        if interval == Interval::Month {
            let mut months: BTreeMap<String, (f64, usize)> = BTreeMap::new();
            for point in &points {
                let month = point.label.chars().take(6).collect::<String>();
                let entry = months.entry(month).or_insert((0.0, 0));
                entry.0 += point.value;
                entry.1 += 1;
            }
            points = months
                .into_iter()
                .map(|(month, (sum, count))| SeriesPoint::new(month, sum / count as f64))
                .collect();
        }

        points.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(Some(points))
    }

    /// Daily candles sorted by date; malformed rows are skipped.
    pub fn kline(&self, date_range: Option<&DateRange>) -> Result<Option<Vec<Candle>>> {
        let mut candles: Vec<Candle> = self
            .daily_records(date_range)?
            .iter()
            .filter_map(|record| {
                Some(Candle {
                    date: record.date()?.to_string(),
                    open: record.number(DailyField::Open)?,
                    high: record.number(DailyField::High)?,
                    low: record.number(DailyField::Low)?,
                    close: record.number(DailyField::Close)?,
                })
            })
            .collect();

        if candles.is_empty() {
            return Ok(None);
        }

        candles.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(Some(candles))
    }
}

impl fmt::Display for Stock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .text(Field::ShortName)
            .ok()
            .flatten()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "(unnamed)".to_string());
        write!(f, "{}: {name}", self.no)
    }
}

/// Parse an exchange number such as `1,234.50`; `None` for `--`, `X0.00`, etc.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["日期", "成交股數", "成交金額", "開盤價", "最高價", "最低價", "收盤價", "漲跌價差", "成交筆數"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn row(date: &str, open: &str, high: &str, low: &str, close: &str) -> Vec<String> {
        [date, "1,000", "100,000", open, high, low, close, "+1.00", "10"]
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn daily_stock(rows: Vec<Vec<String>>) -> Stock {
        let mut stock = Stock::new("2330").unwrap();
        stock
            .set_data(
                Some(DailyRows {
                    fields: headers(),
                    data: rows,
                }),
                None,
                None,
            )
            .unwrap();
        stock
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(start, end).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_id() {
        assert!(matches!(Stock::new(""), Err(StockError::InvalidSymbol(_))));
        assert!(Stock::new("   ").is_err());
        assert_eq!(Stock::new("2330").unwrap().no(), "2330");
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("last_price".parse::<Field>().unwrap(), Field::LastPrice);
        assert_eq!("Daily Time Series".parse::<Field>().unwrap(), Field::DailyTimeSeries);
        assert!(matches!(
            "dividend".parse::<Field>(),
            Err(StockError::UnknownField(name)) if name == "dividend"
        ));
        assert_eq!(Field::LastPrice.provider_key(), Some("z"));
        assert_eq!(Field::MonthlyAverages.provider_key(), None);
    }

    #[test]
    fn test_get_on_empty_store_is_none() {
        let stock = Stock::new("2330").unwrap();
        assert_eq!(stock.get(Field::ShortName, None).unwrap(), None);
        assert_eq!(stock.get(Field::DailyTimeSeries, None).unwrap(), None);
        assert!(stock.daily_records(None).unwrap().is_empty());
        assert_eq!(stock.kline(None).unwrap(), None);
    }

    #[test]
    fn test_real_time_drops_unknown_keys() {
        let mut stock = Stock::new("2330").unwrap();
        let fields: RealTimeFields = [("n", "台積電"), ("z", "1,000.00"), ("zz", "?"), ("ps", "3")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        stock.set_data(None, Some(fields), None).unwrap();

        assert_eq!(stock.text(Field::ShortName).unwrap().as_deref(), Some("台積電"));
        assert_eq!(stock.text(Field::LastPrice).unwrap().as_deref(), Some("1,000.00"));
        assert_eq!(stock.data.len(), 2);
        assert_eq!(stock.to_string(), "2330: 台積電");
    }

    #[test]
    fn test_missing_field_in_populated_store_fails() {
        let mut stock = Stock::new("2330").unwrap();
        let fields: RealTimeFields = [("n".to_string(), "台積電".to_string())].into();
        stock.set_data(None, Some(fields), None).unwrap();

        assert!(matches!(
            stock.get(Field::DailyTimeSeries, None),
            Err(StockError::FieldNotFound(name)) if name == "daily_time_series"
        ));
        assert!(stock.kline(None).is_err());
    }

    #[test]
    fn test_display_without_name() {
        let stock = daily_stock(vec![]);
        assert_eq!(stock.to_string(), "2330: (unnamed)");
    }

    #[test]
    fn test_category_set_once() {
        let mut stock = daily_stock(vec![row("20250102", "1", "2", "1", "2")]);
        let again = stock.set_data(Some(DailyRows::new(headers())), None, None);
        assert!(matches!(again, Err(StockError::Validation(_))));

        // other categories are still open
        let monthly: MonthlyFields = [("202501".to_string(), "1.5".to_string())].into();
        stock.set_data(None, None, Some(monthly)).unwrap();
    }

    #[test]
    fn test_get_daily_preserves_provider_order() {
        let stock = daily_stock(vec![
            row("20250103", "1", "1", "1", "1"),
            row("20250102", "1", "1", "1", "1"),
        ]);
        let Some(FieldValue::Daily(records)) = stock.get(Field::DailyTimeSeries, None).unwrap() else {
            panic!("expected daily records");
        };
        assert_eq!(records[0].date(), Some("20250103"));
        assert_eq!(records[1].date(), Some("20250102"));
    }

    #[test]
    fn test_get_daily_range_is_inclusive() {
        let stock = daily_stock(vec![
            row("20241231", "1", "1", "1", "1"),
            row("20250101", "1", "1", "1", "1"),
            row("20250103", "1", "1", "1", "1"),
            row("20250105", "1", "1", "1", "1"),
            row("20250106", "1", "1", "1", "1"),
        ]);
        let records = stock
            .daily_records(Some(&range("20250101", "20250105")))
            .unwrap();
        let dates: Vec<_> = records.iter().filter_map(DailyRecord::date).collect();
        assert_eq!(dates, vec!["20250101", "20250103", "20250105"]);
    }

    #[test]
    fn test_transform_per_day_sorted() {
        let stock = daily_stock(vec![
            row("20250103", "1", "1", "1", "1,010.5"),
            row("20250102", "1", "1", "1", "1,000"),
            row("20250106", "1", "1", "1", "--"),
        ]);
        let series = stock
            .daily_field_transform(DailyField::Close, Interval::Day, None)
            .unwrap()
            .unwrap();
        assert_eq!(
            series,
            vec![
                SeriesPoint::new("20250102", 1000.0),
                SeriesPoint::new("20250103", 1010.5),
            ]
        );
    }

    #[test]
    fn test_transform_per_month_averages() {
        let stock = daily_stock(vec![
            row("20250203", "1", "1", "1", "30"),
            row("20250102", "1", "1", "1", "10"),
            row("20250103", "1", "1", "1", "20"),
            row("20250204", "1", "1", "1", "x"),
        ]);
        let series = stock
            .daily_field_transform(DailyField::Close, Interval::Month, None)
            .unwrap()
            .unwrap();
        assert_eq!(
            series,
            vec![SeriesPoint::new("202501", 15.0), SeriesPoint::new("202502", 30.0)]
        );
    }

    #[test]
    fn test_transform_other_field_per_month_ignores_averages() {
        let mut stock = daily_stock(vec![
            row("20250102", "10", "1", "1", "1"),
            row("20250103", "20", "1", "1", "1"),
        ]);
        let monthly: MonthlyFields = [("202501".to_string(), "99".to_string())].into();
        stock.set_data(None, None, Some(monthly)).unwrap();

        let open = stock
            .daily_field_transform(DailyField::Open, Interval::Month, None)
            .unwrap()
            .unwrap();
        assert_eq!(open, vec![SeriesPoint::new("202501", 15.0)]);
    }

    #[test]
    fn test_transform_prefers_provider_monthly_close() {
        let mut stock = daily_stock(vec![row("20250102", "1", "1", "1", "10")]);
        let monthly: MonthlyFields = [
            ("202502".to_string(), "1,020.5".to_string()),
            ("202501".to_string(), "1,000".to_string()),
        ]
        .into();
        stock.set_data(None, None, Some(monthly)).unwrap();

        let series = stock
            .daily_field_transform(DailyField::Close, Interval::Month, None)
            .unwrap()
            .unwrap();
        assert_eq!(
            series,
            vec![SeriesPoint::new("202501", 1000.0), SeriesPoint::new("202502", 1020.5)]
        );
    }

    #[test]
    fn test_transform_none_when_nothing_parses() {
        let stock = daily_stock(vec![
            row("20250102", "1", "1", "1", "--"),
            row("20250103", "1", "1", "1", ""),
        ]);
        assert_eq!(
            stock
                .daily_field_transform(DailyField::Close, Interval::Day, None)
                .unwrap(),
            None
        );
        assert_eq!(
            stock
                .daily_field_transform(DailyField::Close, Interval::Month, None)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_transform_respects_range() {
        let stock = daily_stock(vec![
            row("20250102", "1", "1", "1", "10"),
            row("20250110", "1", "1", "1", "20"),
        ]);
        let series = stock
            .daily_field_transform(DailyField::Close, Interval::Day, Some(&range("20250105", "20250131")))
            .unwrap()
            .unwrap();
        assert_eq!(series, vec![SeriesPoint::new("20250110", 20.0)]);
    }

    #[test]
    fn test_kline_skips_malformed_rows() {
        let mut stock = Stock::new("2330").unwrap();
        stock
            .set_data(
                Some(DailyRows {
                    fields: vec!["日期".into(), "開盤價".into(), "最高價".into(), "最低價".into(), "收盤價".into()],
                    data: vec![
                        vec!["20250103".into(), "10".into(), "12".into(), "9".into(), "11".into()],
                        vec!["20250102".into(), "1,000".into(), "1,010".into(), "990".into(), "1,005".into()],
                        vec!["20250106".into(), "--".into(), "12".into(), "9".into(), "11".into()],
                        // short row: close column missing
                        vec!["20250107".into(), "10".into(), "12".into(), "9".into()],
                    ],
                }),
                None,
                None,
            )
            .unwrap();

        let candles = stock.kline(None).unwrap().unwrap();
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].date, "20250102");
        assert_eq!(candles[0].open, 1000.0);
        assert_eq!(candles[0].close, 1005.0);
        assert_eq!(candles[1].date, "20250103");
    }

    #[test]
    fn test_kline_none_when_no_row_survives() {
        let stock = daily_stock(vec![row("20250102", "--", "--", "--", "--")]);
        assert_eq!(stock.kline(None).unwrap(), None);
    }

    #[test]
    fn test_record_from_row_drops_unknown_columns() {
        let fields = vec!["日期".to_string(), "註記".to_string(), "close".to_string()];
        let record = DailyRecord::from_row(
            &fields,
            &["20250102".to_string(), "x".to_string(), "9.5".to_string()],
        );
        assert_eq!(
            record,
            DailyRecord::from([(DailyField::Date, "20250102"), (DailyField::Close, "9.5")])
        );
    }

    #[test]
    fn test_interval_parse() {
        assert_eq!("Month".parse::<Interval>().unwrap(), Interval::Month);
        assert_eq!("d".parse::<Interval>().unwrap(), Interval::Day);
        assert!("week".parse::<Interval>().is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,234.5"), Some(1234.5));
        assert_eq!(parse_number("+5.00"), Some(5.0));
        assert_eq!(parse_number(" -0.50 "), Some(-0.5));
        assert_eq!(parse_number("--"), None);
        assert_eq!(parse_number("X0.00"), None);
        assert_eq!(parse_number("inf"), None);
    }
}

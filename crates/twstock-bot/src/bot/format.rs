//! Text rendering for command replies

use crate::stock::{Candle, DailyField, DailyRecord, SeriesPoint};

/// Columns shown for one trading day, in display order
const DAILY_COLUMNS: [(DailyField, &str); 8] = [
    (DailyField::Open, "Open"),
    (DailyField::High, "High"),
    (DailyField::Low, "Low"),
    (DailyField::Close, "Close"),
    (DailyField::PriceChange, "Change"),
    (DailyField::TradedVolume, "Volume"),
    (DailyField::TradedValue, "Value"),
    (DailyField::TradeCount, "Trades"),
];

/// Two decimals, the way the exchange quotes prices
pub fn price(value: f64) -> String {
    format!("{value:.2}")
}

/// `YYYYMMDD` → `YYYY-MM-DD`, `YYYYMM` → `YYYY-MM`; anything else unchanged
pub fn date_label(label: &str) -> String {
    if !label.is_ascii() {
        return label.to_string();
    }
    match label.len() {
        8 => format!("{}-{}-{}", &label[..4], &label[4..6], &label[6..]),
        6 => format!("{}-{}", &label[..4], &label[4..]),
        _ => label.to_string(),
    }
}

/// One day as a short block, columns the provider did not send are left out
pub fn daily_record(record: &DailyRecord) -> String {
    let mut out = format!("📅 {}", date_label(record.date().unwrap_or("?")));
    for (field, label) in DAILY_COLUMNS {
        if let Some(value) = record.get(field) {
            out.push_str(&format!("\n{label}: {}", value.trim()));
        }
    }
    out
}

pub fn series_row(point: &SeriesPoint) -> String {
    format!("{}  {}", date_label(&point.label), price(point.value))
}

pub fn candle_row(candle: &Candle) -> String {
    format!(
        "{}  O {}  H {}  L {}  C {}",
        date_label(&candle.date),
        price(candle.open),
        price(candle.high),
        price(candle.low),
        price(candle.close)
    )
}

/// First, last, min, max and net change of a non-empty series
pub fn series_summary(points: &[SeriesPoint]) -> Option<String> {
    let first = points.first()?;
    let last = points.last()?;
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), point| {
            (min.min(point.value), max.max(point.value))
        });

    let change = last.value - first.value;
    let percent = if first.value == 0.0 {
        String::new()
    } else {
        format!(" ({:+.2}%)", change / first.value * 100.0)
    };

    Some(format!(
        "First: {}  Last: {}\nMin: {}  Max: {}\nChange: {:+.2}{percent}",
        price(first.value),
        price(last.value),
        price(min),
        price(max),
        change
    ))
}

/// Render items and split them into messages of at most `per_message` items
pub fn chunked<T>(
    items: &[T],
    per_message: usize,
    separator: &str,
    render: impl Fn(&T) -> String,
) -> Vec<String> {
    items
        .chunks(per_message.max(1))
        .map(|chunk| chunk.iter().map(&render).collect::<Vec<_>>().join(separator))
        .collect()
}

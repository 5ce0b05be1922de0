//! Calendar helpers for exchange dates
//!
//! The exchange reports dates in the ROC era (`114/04/15`, year offset 1911)
//! while the rest of the crate works with zero-padded `YYYYMMDD` strings so
//! that plain string comparison orders them correctly.

use crate::error::{Result, StockError};
use chrono::{Datelike, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::fmt::{self, Write};

/// Years between the ROC era and the western calendar
pub const ROC_OFFSET: i32 = 1911;

/// Default `YYYYMMDD` format
pub const AD_FORMAT: &str = "%Y%m%d";

const EXCHANGE_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// Convert an ROC date such as `114/04/15` into a western date string.
pub fn roc_to_ad(roc: &str, output_format: &str) -> Result<String> {
    let parts: Vec<&str> = roc.split('/').collect();
    if parts.len() != 3 {
        return Err(StockError::InvalidDate(format!(
            "cannot convert ROC date {roc}: expected EEE/MM/DD"
        )));
    }

    let invalid =
        |detail: String| StockError::InvalidDate(format!("cannot convert ROC date {roc}: {detail}"));
    let year = parts[0]
        .parse::<i32>()
        .map_err(|e| invalid(e.to_string()))?
        .checked_add(ROC_OFFSET)
        .ok_or_else(|| invalid("year out of range".to_string()))?;
    let month = parts[1]
        .parse::<u32>()
        .map_err(|e| invalid(format!("month {}: {e}", parts[1])))?;
    let day = parts[2]
        .parse::<u32>()
        .map_err(|e| invalid(format!("day {}: {e}", parts[2])))?;

    let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        StockError::InvalidDate(format!("cannot convert ROC date {roc}: no such day"))
    })?;
    format_date(date, output_format)
}

/// Convert a western date string into ROC `EEE/MM/DD`.
pub fn ad_to_roc(ad: &str, input_format: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(ad, input_format)
        .map_err(|e| StockError::InvalidDate(format!("cannot convert date {ad}: {e}")))?;
    Ok(format!(
        "{:03}/{:02}/{:02}",
        date.year() - ROC_OFFSET,
        date.month(),
        date.day()
    ))
}

/// First-of-month dates (`YYYYMM01`) covering `start`'s month through `end`'s
/// month inclusive. Empty when `start` falls in a later month than `end`.
pub fn month_range(start: &str, end: &str) -> Result<Vec<String>> {
    let range_err = |detail: String| {
        StockError::InvalidDate(format!("cannot build month range {start} ~ {end}: {detail}"))
    };

    let mut current = first_of_month(parse_ad(start).map_err(|e| range_err(e.to_string()))?);
    let last = first_of_month(parse_ad(end).map_err(|e| range_err(e.to_string()))?);

    let mut months = Vec::new();
    while current <= last {
        months.push(current.format("%Y%m01").to_string());
        let (year, month) = if current.month() == 12 {
            (current.year() + 1, 1)
        } else {
            (current.year(), current.month() + 1)
        };
        current = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| range_err(format!("month {year}-{month} out of range")))?;
    }

    Ok(months)
}

/// Parse a `YYYYMMDD` string.
pub fn parse_ad(ad: &str) -> Result<NaiveDate> {
    if ad.len() != 8 || !ad.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StockError::InvalidDate(format!(
            "{ad} is not in YYYYMMDD form"
        )));
    }
    NaiveDate::parse_from_str(ad, AD_FORMAT)
        .map_err(|e| StockError::InvalidDate(format!("{ad}: {e}")))
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Current date on the exchange (UTC+8).
pub fn today() -> NaiveDate {
    FixedOffset::east_opt(EXCHANGE_UTC_OFFSET_SECS).map_or_else(
        || Utc::now().date_naive(),
        |tz| Utc::now().with_timezone(&tz).date_naive(),
    )
}

pub fn to_ad(date: NaiveDate) -> String {
    date.format(AD_FORMAT).to_string()
}

/// Inclusive range of `YYYYMMDD` dates.
///
/// Both ends are validated on construction; an inverted range is allowed and
/// simply matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: String,
    end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self> {
        let start = start.into();
        let end = end.into();
        parse_ad(&start)?;
        parse_ad(&end)?;
        Ok(Self { start, end })
    }

    /// From the first of the current month through today
    pub fn month_to_date() -> Self {
        let today = today();
        Self {
            start: to_ad(first_of_month(today)),
            end: to_ad(today),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Zero-padded dates order correctly as plain strings.
    pub fn contains(&self, date: &str) -> bool {
        self.start.as_str() <= date && date <= self.end.as_str()
    }

    /// First-of-month dates this range touches
    pub fn months(&self) -> Result<Vec<String>> {
        month_range(&self.start, &self.end)
    }

    /// Number of calendar months this range touches, zero when end < start
    pub fn month_span(&self) -> Result<usize> {
        let index = |date: NaiveDate| i64::from(date.year()) * 12 + i64::from(date.month0());
        let span = index(parse_ad(&self.end)?) - index(parse_ad(&self.start)?) + 1;
        Ok(usize::try_from(span).unwrap_or(0))
    }

    /// Reject ranges wider than `max_months` before anything is fetched
    pub fn ensure_span(&self, max_months: usize) -> Result<()> {
        let span = self.month_span()?;
        if span > max_months {
            return Err(StockError::Validation(format!(
                "date range {self} spans {span} months, at most {max_months} allowed"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ~ {}", self.start, self.end)
    }
}

fn format_date(date: NaiveDate, output_format: &str) -> Result<String> {
    let mut out = String::new();
    write!(out, "{}", date.format(output_format)).map_err(|_| {
        StockError::InvalidDate(format!("invalid output format {output_format}"))
    })?;
    Ok(out)
}

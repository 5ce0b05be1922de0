//! Data providers
//!
//! A provider turns an equity id (and optionally a date range) into one raw
//! [`Snapshot`]. Values stay untyped strings; interpretation belongs to
//! [`crate::stock::Stock`].

pub mod twse;

use crate::date_util::DateRange;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub use twse::TwseProvider;

/// Real-time quote fields keyed by the provider's own field codes
pub type RealTimeFields = HashMap<String, String>;

/// Monthly average close keyed by month label
pub type MonthlyFields = BTreeMap<String, String>;

/// Daily rows as a header plus positional rows aligned with it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRows {
    pub fields: Vec<String>,
    pub data: Vec<Vec<String>>,
}

impl DailyRows {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            data: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Everything one fetch returned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub real_time: Option<RealTimeFields>,
    pub daily: Option<DailyRows>,
    pub monthly: Option<MonthlyFields>,
}

/// What a caller needs from one fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// Daily rows are fetched for every month this range touches
    pub date_range: Option<DateRange>,
    /// Also fetch the exchange's monthly average close; needs `date_range`
    pub monthly_averages: bool,
}

impl FetchRequest {
    /// Real-time quote only
    pub fn quote() -> Self {
        Self::default()
    }

    /// Real-time quote plus daily rows for `range`
    pub fn daily(range: DateRange) -> Self {
        Self {
            date_range: Some(range),
            monthly_averages: false,
        }
    }

    pub fn with_monthly_averages(mut self, enabled: bool) -> Self {
        self.monthly_averages = enabled;
        self
    }
}

/// Source of raw exchange data.
///
/// Real-time fields are always requested. Daily rows are only requested when
/// a date range is given, monthly averages only when asked for as well; an
/// empty range result is a present-but-empty [`DailyRows`], not an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StockProvider: Send + Sync {
    async fn fetch(&self, stock_no: &str, request: FetchRequest) -> Result<Snapshot>;
}

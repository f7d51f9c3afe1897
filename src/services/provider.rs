// src/services/provider.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::error::FetchResult;

/// Flattened snapshot of everything the provider knows about a ticker,
/// keyed by the provider's own field names (`longName`, `currentPrice`, ...).
#[derive(Debug, Clone, Default)]
pub struct CompanyInfo {
    fields: Map<String, Value>,
}

impl CompanyInfo {
    pub fn new(fields: Map<String, Value>) -> Self {
        CompanyInfo { fields }
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
    }

    pub fn text(&self, key: &str) -> Option<String> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<Value> for CompanyInfo {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(fields) => CompanyInfo { fields },
            _ => CompanyInfo::default(),
        }
    }
}

/// One intraday bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub close: f64,
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current snapshot info for `ticker`.
    async fn company_info(&self, ticker: &str) -> FetchResult<CompanyInfo>;

    /// Bars for the most recent trading session at the finest interval, oldest first.
    async fn intraday_bars(&self, ticker: &str) -> FetchResult<Vec<Bar>>;
}

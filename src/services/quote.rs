// src/services/quote.rs
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, info};

use crate::models::{Field, QuoteRecord};
use super::error::FetchResult;
use super::provider::MarketDataProvider;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render `at` in the reference zone as `YYYY-MM-DD HH:MM:SS`.
pub fn format_in_zone<Z: TimeZone>(at: &DateTime<Z>, tz: &Tz) -> String {
    at.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

/// Percent change from `open` to `current`, rounded to two decimals.
/// A zero open yields 0 rather than a division error.
pub fn percent_change(current: f64, open: f64) -> f64 {
    if open == 0.0 {
        return 0.0;
    }
    let change = (current - open) / open * 100.0;
    (change * 100.0).round() / 100.0
}

/// Build the quote for `ticker`. Any provider failure aborts the whole record.
pub async fn resolve_quote(
    provider: &dyn MarketDataProvider,
    ticker: &str,
    tz: &Tz,
    fetched_at: DateTime<Utc>,
) -> FetchResult<QuoteRecord> {
    let info = provider.company_info(ticker).await?;
    let company_name = Field::from(info.text("longName"));
    let current_price = Field::from(info.number("currentPrice"));

    let bars = provider.intraday_bars(ticker).await?;
    debug!("{} intraday bars for {}", bars.len(), ticker);

    let (open_price, percent_change, last_updated) = match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => {
            let change = match current_price {
                Field::Present(current) => Field::Present(percent_change(current, first.open)),
                Field::Unavailable => Field::Unavailable,
            };
            (
                Field::Present(first.open),
                change,
                Field::Present(format_in_zone(&last.timestamp, tz)),
            )
        }
        _ => (Field::Unavailable, Field::Unavailable, Field::Unavailable),
    };

    let record = QuoteRecord {
        ticker: ticker.to_string(),
        company_name,
        current_price,
        open_price,
        percent_change,
        last_updated,
        fetch_time: format_in_zone(&fetched_at, tz),
    };
    info!("Resolved quote for {}: {:?}", ticker, record);
    Ok(record)
}

// src/services/fundamentals.rs
use log::{info, warn};

use crate::models::{Field, FundamentalsRecord};
use super::error::FetchResult;
use super::provider::{CompanyInfo, MarketDataProvider};
use super::registry::{fetch_short_selling, RegistrySource};

fn ratio(info: &CompanyInfo, key: &str) -> Field<f64> {
    Field::from(info.number(key))
}

/// Build the fundamentals for `ticker`.
///
/// The provider snapshot is required: if it fails the whole request fails.
/// The short-selling lookup is best effort and only ever blanks its own field.
pub async fn merge_fundamentals(
    provider: &dyn MarketDataProvider,
    registry: &dyn RegistrySource,
    ticker: &str,
) -> FetchResult<FundamentalsRecord> {
    let info = provider.company_info(ticker).await?;

    let short_selling = match fetch_short_selling(registry, ticker).await {
        Ok(value) => Field::Present(value),
        Err(e) => {
            warn!("Short-selling lookup for {} failed: {}", ticker, e);
            Field::Unavailable
        }
    };

    let record = FundamentalsRecord {
        ticker: ticker.to_string(),
        market_cap: ratio(&info, "marketCap"),
        enterprise_value: ratio(&info, "enterpriseValue"),
        trailing_pe: ratio(&info, "trailingPE"),
        forward_pe: ratio(&info, "forwardPE"),
        // quoteSummary only carries pegRatio; trailingPegRatio is the key the
        // timeseries endpoint uses and is read when an info map supplies it
        peg_ratio: Field::from(info.number("pegRatio").or_else(|| info.number("trailingPegRatio"))),
        ps_ratio: ratio(&info, "priceToSalesTrailing12Months"),
        pb_ratio: ratio(&info, "priceToBook"),
        enterprise_value_revenue: ratio(&info, "enterpriseToRevenue"),
        enterprise_value_ebitda: ratio(&info, "enterpriseToEbitda"),
        short_selling,
    };
    info!(
        "Merged fundamentals for {} (short selling {}): {:?}",
        ticker,
        if record.short_selling.is_present() { "found" } else { "unavailable" },
        record
    );
    Ok(record)
}

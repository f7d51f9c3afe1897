// src/bin/probe_ticker.rs
use chrono::Utc;
use dotenv::dotenv;
use log::{error, info};

use stock_quote_backend::config::Settings;
use stock_quote_backend::services::fundamentals::merge_fundamentals;
use stock_quote_backend::services::quote::resolve_quote;
use stock_quote_backend::services::registry::ShortSellingRegistry;
use stock_quote_backend::services::yahoo::YahooClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let ticker = std::env::args().nth(1).unwrap_or_else(|| "SBB-B.ST".to_string());
    let settings = Settings::from_env()?;
    let provider = YahooClient::from_settings(&settings);
    let registry = ShortSellingRegistry::from_settings(&settings);

    info!("Probing live services for {}...", ticker);

    match resolve_quote(&provider, &ticker, &settings.reference_tz, Utc::now()).await {
        Ok(quote) => println!("Quote:\n{}", serde_json::to_string_pretty(&quote)?),
        Err(e) => error!("ERROR: quote failed: {}", e),
    }

    match merge_fundamentals(&provider, &registry, &ticker).await {
        Ok(record) => println!("Fundamentals:\n{}", serde_json::to_string_pretty(&record)?),
        Err(e) => error!("ERROR: fundamentals failed: {}", e),
    }

    Ok(())
}

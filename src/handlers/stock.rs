// src/handlers/stock.rs
use chrono::Utc;
use log::{error, info};
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::{decode_ticker, AppState};
use crate::services::quote::resolve_quote;

pub async fn get_stock(ticker: String, state: AppState) -> Result<Json, Rejection> {
    let ticker = decode_ticker(ticker);
    info!("Handling request to get quote for {}", ticker);
    let fetched_at = Utc::now();

    let quote = resolve_quote(state.provider.as_ref(), &ticker, &state.reference_tz, fetched_at)
        .await
        .map_err(|e| {
            error!("Failed to resolve quote for {}: {}", ticker, e);
            warp::reject::custom(ApiError::from(e))
        })?;

    Ok(warp::reply::json(&quote))
}

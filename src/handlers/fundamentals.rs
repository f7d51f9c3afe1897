// src/handlers/fundamentals.rs
use log::{error, info};
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use super::{decode_ticker, AppState};
use crate::services::fundamentals::merge_fundamentals;

pub async fn get_fundamentals(ticker: String, state: AppState) -> Result<Json, Rejection> {
    let ticker = decode_ticker(ticker);
    info!("Handling request to get fundamentals for {}", ticker);

    match merge_fundamentals(state.provider.as_ref(), state.registry.as_ref(), &ticker).await {
        Ok(record) => Ok(warp::reply::json(&record)),
        Err(e) => {
            error!("Failed to fetch fundamentals for {}: {}", ticker, e);
            Err(warp::reject::custom(ApiError::from(e)))
        }
    }
}

// src/handlers/mod.rs
pub mod error;
pub mod stock;
pub mod fundamentals;

use chrono_tz::Tz;
use std::sync::Arc;

use crate::config::Settings;
use crate::services::provider::MarketDataProvider;
use crate::services::registry::{RegistrySource, ShortSellingRegistry};
use crate::services::yahoo::YahooClient;

/// Collaborators shared by every request. Holds no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MarketDataProvider>,
    pub registry: Arc<dyn RegistrySource>,
    pub reference_tz: Tz,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Self {
        AppState {
            provider: Arc::new(YahooClient::from_settings(settings)),
            registry: Arc::new(ShortSellingRegistry::from_settings(settings)),
            reference_tz: settings.reference_tz,
        }
    }
}

/// Tickers arrive percent-encoded in the path (`%5EOMX` for `^OMX`).
pub(crate) fn decode_ticker(raw: String) -> String {
    let decoded = urlencoding::decode(&raw).map(|t| t.into_owned());
    decoded.unwrap_or(raw)
}

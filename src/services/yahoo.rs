// src/services/yahoo.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::config::Settings;
use super::error::{FetchError, FetchResult};
use super::provider::{Bar, CompanyInfo, MarketDataProvider};

pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// quoteSummary modules merged into one info map, in precedence order.
const SUMMARY_MODULES: [&str; 4] = ["price", "summaryDetail", "defaultKeyStatistics", "financialData"];

/// Yahoo Finance client. Holds only endpoints; every call opens its own session.
#[derive(Debug, Clone)]
pub struct YahooClient {
    query_url: String,
    cookie_url: String,
}

impl YahooClient {
    pub fn new(query_url: impl Into<String>, cookie_url: impl Into<String>) -> Self {
        YahooClient {
            query_url: query_url.into().trim_end_matches('/').to_string(),
            cookie_url: cookie_url.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.yahoo_query_url.clone(), settings.yahoo_cookie_url.clone())
    }

    fn session() -> FetchResult<Client> {
        Ok(Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()?)
    }

    fn endpoint(&self, segments: &[&str]) -> FetchResult<Url> {
        let mut url = Url::parse(&self.query_url)
            .map_err(|e| FetchError::Provider(format!("invalid Yahoo base URL {}: {}", self.query_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| FetchError::Provider(format!("Yahoo base URL {} cannot take a path", self.query_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Cookie plus crumb handshake; the cookie stays in `client`'s jar.
    async fn fetch_crumb(&self, client: &Client) -> FetchResult<String> {
        debug!("Requesting Yahoo session cookie from {}", self.cookie_url);
        // fc.yahoo.com answers 404 but still sets the cookie
        client
            .get(&self.cookie_url)
            .header("Referer", "https://finance.yahoo.com/")
            .send()
            .await?;

        let url = self.endpoint(&["v1", "test", "getcrumb"])?;
        let resp = client.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let crumb = body.trim();

        if !status.is_success() || crumb.is_empty() || crumb.contains(' ') || crumb.contains('<') {
            warn!("Yahoo crumb request failed with status {}", status);
            return Err(FetchError::Provider("failed to obtain Yahoo crumb".to_string()));
        }
        Ok(crumb.to_string())
    }
}

#[async_trait]
impl MarketDataProvider for YahooClient {
    async fn company_info(&self, ticker: &str) -> FetchResult<CompanyInfo> {
        let client = Self::session()?;
        let crumb = self.fetch_crumb(&client).await?;

        let mut url = self.endpoint(&["v10", "finance", "quoteSummary", ticker])?;
        url.query_pairs_mut()
            .append_pair("modules", &SUMMARY_MODULES.join(","))
            .append_pair("crumb", &crumb);
        info!("Fetching company info for {} from {}", ticker, url.path());

        let resp = client.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        let info = parse_quote_summary(&body).map_err(|e| match e {
            // Non-JSON error pages are reported by status
            FetchError::Decode(_) if !status.is_success() => FetchError::Status(status.as_u16()),
            other => other,
        })?;
        debug!("Company info for {} has {} fields", ticker, info.len());
        Ok(info)
    }

    async fn intraday_bars(&self, ticker: &str) -> FetchResult<Vec<Bar>> {
        let client = Self::session()?;

        let mut url = self.endpoint(&["v8", "finance", "chart", ticker])?;
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1m");
        info!("Fetching intraday bars for {} from {}", ticker, url.path());

        let resp = client.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        parse_chart(&body).map_err(|e| match e {
            FetchError::Decode(_) if !status.is_success() => FetchError::Status(status.as_u16()),
            other => other,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ProviderError {
    fn into_fetch_error(self) -> FetchError {
        FetchError::Provider(
            self.description
                .or(self.code)
                .unwrap_or_else(|| "unknown provider error".to_string()),
        )
    }
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummary,
}

#[derive(Debug, Deserialize)]
struct QuoteSummary {
    #[serde(default)]
    result: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    error: Option<ProviderError>,
}

pub(crate) fn parse_quote_summary(body: &str) -> FetchResult<CompanyInfo> {
    let response: QuoteSummaryResponse = serde_json::from_str(body)?;
    if let Some(err) = response.quote_summary.error {
        return Err(err.into_fetch_error());
    }

    let modules = response
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::MissingData("quoteSummary returned no result".to_string()))?;

    Ok(CompanyInfo::new(flatten_modules(&modules)))
}

/// Merge the summary modules into one map. `{raw, fmt}` wrappers are reduced to
/// `raw`, empty objects and `maxAge` are dropped, the first module to define a key wins.
fn flatten_modules(modules: &Map<String, Value>) -> Map<String, Value> {
    let mut flat = Map::new();
    for name in SUMMARY_MODULES {
        let Some(Value::Object(module)) = modules.get(name) else {
            continue;
        };
        for (key, value) in module {
            if key == "maxAge" || flat.contains_key(key) {
                continue;
            }
            let value = match value {
                Value::Object(inner) if inner.is_empty() => continue,
                Value::Object(inner) => match inner.get("raw") {
                    Some(raw) => raw.clone(),
                    None => continue,
                },
                Value::Null => continue,
                other => other.clone(),
            };
            flat.insert(key.clone(), value);
        }
    }
    flat
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub(crate) fn parse_chart(body: &str) -> FetchResult<Vec<Bar>> {
    let response: ChartResponse = serde_json::from_str(body)?;
    if let Some(err) = response.chart.error {
        return Err(err.into_fetch_error());
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::MissingData("chart returned no result".to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    // Yahoo pads the session with null bars; keep only complete ones
    let bars = timestamps
        .iter()
        .zip(quote.open.iter().zip(quote.close.iter()))
        .filter_map(|(ts, (open, close))| {
            let timestamp: DateTime<Utc> = DateTime::from_timestamp(*ts, 0)?;
            Some(Bar {
                timestamp,
                open: (*open)?,
                close: (*close)?,
            })
        })
        .collect();
    Ok(bars)
}

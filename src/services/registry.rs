// src/services/registry.rs
use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};

use crate::config::Settings;
use super::error::{FetchError, FetchResult};
use super::identifiers::{is_known, registry_id};
use super::yahoo::USER_AGENT;

/// Source of the registry's issuer page.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn issuer_page(&self, id: &str) -> FetchResult<String>;
}

/// Finansinspektionen's short-selling register over HTTP.
#[derive(Debug, Clone)]
pub struct ShortSellingRegistry {
    url_template: String,
}

impl ShortSellingRegistry {
    pub fn new(url_template: impl Into<String>) -> Self {
        ShortSellingRegistry {
            url_template: url_template.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.registry_url_template.clone())
    }

    pub fn url_for(&self, id: &str) -> String {
        self.url_template.replace("{id}", id)
    }
}

#[async_trait]
impl RegistrySource for ShortSellingRegistry {
    async fn issuer_page(&self, id: &str) -> FetchResult<String> {
        let url = self.url_for(id);
        info!("Fetching short-selling register page: {}", url);

        let client = Client::builder().user_agent(USER_AGENT).build()?;
        let resp = client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(resp.text().await?)
    }
}

/// Look up the short-selling value for `ticker`.
pub async fn fetch_short_selling(source: &dyn RegistrySource, ticker: &str) -> FetchResult<String> {
    let id = registry_id(ticker);
    if !is_known(id) {
        return Err(FetchError::UnknownIdentifier(ticker.to_string()));
    }

    let html = source.issuer_page(id).await?;
    let value = extract_short_selling(&html)?;
    debug!("Short-selling value for {} ({}): {}", ticker, id, value);
    Ok(value)
}

/// Second cell of the second row of the first table on the page.
pub fn extract_short_selling(html: &str) -> FetchResult<String> {
    let document = Html::parse_document(html);
    let table_selector = selector("table")?;
    let row_selector = selector("tr")?;
    let cell_selector = selector("th, td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| FetchError::Parse("no table on page".to_string()))?;

    let rows: Vec<ElementRef> = table.select(&row_selector).collect();
    if rows.len() < 2 {
        return Err(FetchError::Parse(format!("expected at least 2 rows, found {}", rows.len())));
    }

    let cell = rows[1]
        .select(&cell_selector)
        .nth(1)
        .ok_or_else(|| FetchError::Parse("second row has fewer than 2 cells".to_string()))?;

    let text = cell.text().collect::<String>();
    let text = text.trim();
    // A blank cell means the register has no figure; report it as unavailable
    if text.is_empty() {
        return Err(FetchError::MissingData("short-selling cell is empty".to_string()));
    }
    Ok(text.to_string())
}

fn selector(css: &str) -> FetchResult<Selector> {
    Selector::parse(css).map_err(|e| FetchError::Parse(format!("bad selector {}: {:?}", css, e)))
}

// src/config.rs
use anyhow::{Context, Result};
use chrono_tz::Tz;
use log::{info, warn};
use reqwest::Url;
use std::env;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Stockholm;
pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,https://stock-fe.onrender.com";
pub const DEFAULT_YAHOO_QUERY_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
pub const DEFAULT_REGISTRY_URL_TEMPLATE: &str =
    "https://www.fi.se/sv/vara-register/blankningsregistret/emittent/?id={id}";

#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub reference_tz: Tz,
    pub cors_origins: Vec<String>,
    pub yahoo_query_url: String,
    pub yahoo_cookie_url: String,
    pub registry_url_template: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            port: DEFAULT_PORT,
            reference_tz: DEFAULT_TIMEZONE,
            cors_origins: split_origins(DEFAULT_CORS_ORIGINS),
            yahoo_query_url: DEFAULT_YAHOO_QUERY_URL.to_string(),
            yahoo_cookie_url: DEFAULT_YAHOO_COOKIE_URL.to_string(),
            registry_url_template: DEFAULT_REGISTRY_URL_TEMPLATE.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got {:?}", raw))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let reference_tz = match lookup("REFERENCE_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|e| anyhow::anyhow!("REFERENCE_TIMEZONE {:?} is not a known IANA zone: {}", name, e))?,
            None => defaults.reference_tz,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| split_origins(&raw))
            .unwrap_or(defaults.cors_origins);
        for origin in &cors_origins {
            validate_origin(origin)?;
        }

        let registry_url_template = lookup("REGISTRY_URL_TEMPLATE")
            .unwrap_or(defaults.registry_url_template);
        if !registry_url_template.contains("{id}") {
            anyhow::bail!("REGISTRY_URL_TEMPLATE must contain an {{id}} placeholder");
        }

        let settings = Settings {
            port,
            reference_tz,
            cors_origins,
            yahoo_query_url: lookup("YAHOO_QUERY_URL").unwrap_or(defaults.yahoo_query_url),
            yahoo_cookie_url: lookup("YAHOO_COOKIE_URL").unwrap_or(defaults.yahoo_cookie_url),
            registry_url_template,
        };
        info!("Loaded settings: {:?}", settings);
        Ok(settings)
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// warp panics on an origin it cannot parse, so reject those here.
fn validate_origin(origin: &str) -> Result<()> {
    let url = Url::parse(origin)
        .with_context(|| format!("CORS_ORIGINS entry {:?} is not a URL", origin))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        anyhow::bail!("CORS_ORIGINS entry {:?} must be http(s)://host[:port]", origin);
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() || origin.ends_with('/') {
        anyhow::bail!("CORS_ORIGINS entry {:?} must not carry a path", origin);
    }
    Ok(())
}

//! Server configuration read from `BO_*` environment variables.
//!
//! A `.env` file in the working directory is loaded first when present.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use backoffice_core::constants::DEFAULT_PREVIEW_TTL_SECS;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8088";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_EOD_INTERVAL_SECS: u64 = 0;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: String,
    pub cors_allow_origins: Vec<String>,
    pub request_timeout: Duration,
    /// Without a URL the server runs on an in-memory feed with no prices.
    pub price_feed_url: Option<String>,
    pub price_feed_api_key: String,
    pub enforce_market_hours: bool,
    pub preview_ttl_secs: i64,
    /// Zero disables the end-of-day scheduler.
    pub eod_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr = env_or("BO_LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse::<SocketAddr>()
            .context("BO_LISTEN_ADDR must be a socket address such as 0.0.0.0:8088")?;

        let cors_allow_origins = std::env::var("BO_CORS_ALLOW_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let price_feed_url = std::env::var("BO_PRICE_FEED_URL")
            .ok()
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());

        Ok(Self {
            listen_addr,
            data_dir: env_or("BO_DATA_DIR", DEFAULT_DATA_DIR),
            cors_allow_origins,
            request_timeout: Duration::from_millis(parse_env(
                "BO_REQUEST_TIMEOUT_MS",
                DEFAULT_REQUEST_TIMEOUT_MS,
            )?),
            price_feed_url,
            price_feed_api_key: env_or("BO_PRICE_FEED_API_KEY", ""),
            enforce_market_hours: parse_flag("BO_ENFORCE_MARKET_HOURS", true)?,
            preview_ttl_secs: parse_env("BO_PREVIEW_TTL_SECS", DEFAULT_PREVIEW_TTL_SECS)?,
            eod_interval_secs: parse_env("BO_EOD_INTERVAL_SECS", DEFAULT_EOD_INTERVAL_SECS)?,
        })
    }

    /// Defaults suitable for tests: no feed, no scheduler, market hours off.
    pub fn for_data_dir(data_dir: impl Into<String>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            data_dir: data_dir.into(),
            cors_allow_origins: Vec::new(),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            price_feed_url: None,
            price_feed_api_key: String::new(),
            enforce_market_hours: false,
            preview_ttl_secs: DEFAULT_PREVIEW_TTL_SECS,
            eod_interval_secs: 0,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        Err(_) => Ok(default),
    }
}

fn parse_flag(key: &str, default: bool) -> anyhow::Result<bool> {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => anyhow::bail!("{} must be a boolean, got '{}'", key, other),
        },
        Err(_) => Ok(default),
    }
}

//! Infina provider implementation.
//!
//! Fetches BIST stock definitions and latest prices from the Infina API.
//!
//! # API Endpoints
//!
//! - Definitions: `{base}/HisseTanim?api_key={key}`
//! - Prices: `{base}/HisseFiyat?api_key={key}`
//!
//! # Response Format
//!
//! Every response is an envelope with `Sonuc` (success flag), `Hata` (error
//! message) and a list payload (`HisseListesi` or `FiyatListesi`).
//!
//! The price endpoint only serves the latest session, so the requested date
//! is used for logging and error reporting.

use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::MarketDataError;
use crate::models::{ClosingPrice, StockDefinition};
use crate::provider::PriceFeed;

const PROVIDER_ID: &str = "INFINA";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct DefinitionEnvelope {
    #[serde(rename = "Sonuc", default)]
    success: bool,
    #[serde(rename = "Hata", default)]
    error: Option<String>,
    #[serde(rename = "HisseListesi", default)]
    stocks: Vec<DefinitionRow>,
}

#[derive(Debug, Deserialize)]
struct DefinitionRow {
    #[serde(rename = "HISSE_KODU")]
    code: Option<String>,
    #[serde(rename = "HISSE_ADI")]
    name: Option<String>,
    #[serde(rename = "BORSA_KODU")]
    exchange_code: Option<String>,
    #[serde(rename = "SEKTOR_ADI")]
    sector: Option<String>,
    #[serde(rename = "AKTIF")]
    active: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceEnvelope {
    #[serde(rename = "Sonuc", default)]
    success: bool,
    #[serde(rename = "Hata", default)]
    error: Option<String>,
    #[serde(rename = "FiyatListesi", default)]
    prices: Vec<PriceRow>,
}

#[derive(Debug, Deserialize)]
struct PriceRow {
    #[serde(rename = "HISSE_KODU")]
    code: Option<String>,
    #[serde(rename = "FIYAT")]
    price: Option<Decimal>,
    #[serde(rename = "YUZDE_DEGISIM")]
    percent_change: Option<Decimal>,
    #[serde(rename = "HACIM_LOT")]
    volume_lot: Option<Decimal>,
}

/// Infina provider for definitions and closing prices.
///
/// # Example
///
/// ```ignore
/// let feed = InfinaProvider::new("https://api.infina.com.tr/api/v1".into(), "key".into());
/// let prices = feed.fetch_closing_prices(date)?;
/// ```
pub struct InfinaProvider {
    base_url: String,
    api_key: String,
}

impl InfinaProvider {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}?api_key={}", self.base_url, path, self.api_key)
    }

    /// GETs `url` and decodes the body. The client is built per call so that
    /// it is created and dropped on the calling (blocking) thread.
    fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, MarketDataError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        let response = client.get(url).send().map_err(|e| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: PROVIDER_ID.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        })?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        if !response.status().is_success() {
            return Err(MarketDataError::HttpStatus {
                provider: PROVIDER_ID.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| MarketDataError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message: e.to_string(),
        })
    }

    fn envelope_error(success: bool, error: Option<String>) -> Result<(), MarketDataError> {
        if success {
            return Ok(());
        }
        Err(MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: error.unwrap_or_else(|| "request reported failure".to_string()),
        })
    }
}

fn is_active_flag(raw: Option<&str>) -> bool {
    match raw.map(|s| s.trim().to_ascii_uppercase()) {
        None => true,
        Some(v) => matches!(v.as_str(), "1" | "E" | "EVET" | "TRUE" | "Y" | "A"),
    }
}

/// Converts a price row into OHLCV. The open is backed out of the percent
/// change when present; otherwise the close stands in for the missing fields.
fn to_closing_price(row: PriceRow) -> Option<ClosingPrice> {
    let code = row.code.filter(|c| !c.trim().is_empty())?;
    let close = row.price?;

    let open = match row.percent_change {
        Some(pct) => {
            let divisor = Decimal::ONE + pct / Decimal::ONE_HUNDRED;
            if divisor > Decimal::ZERO {
                (close / divisor).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero)
            } else {
                close
            }
        }
        None => close,
    };

    Some(ClosingPrice {
        code: code.trim().to_string(),
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume: row.volume_lot.unwrap_or(Decimal::ZERO),
    })
}

fn decode_definitions(envelope: DefinitionEnvelope) -> Result<Vec<StockDefinition>, MarketDataError> {
    InfinaProvider::envelope_error(envelope.success, envelope.error)?;

    Ok(envelope
        .stocks
        .into_iter()
        .filter_map(|row| {
            let code = row.code.filter(|c| !c.trim().is_empty())?;
            Some(StockDefinition {
                name: row.name.unwrap_or_else(|| code.clone()),
                code: code.trim().to_string(),
                exchange_code: row.exchange_code,
                sector: row.sector,
                is_active: is_active_flag(row.active.as_deref()),
            })
        })
        .collect())
}

fn decode_prices(
    envelope: PriceEnvelope,
    date: NaiveDate,
) -> Result<Vec<ClosingPrice>, MarketDataError> {
    InfinaProvider::envelope_error(envelope.success, envelope.error)?;

    let total = envelope.prices.len();
    let prices: Vec<ClosingPrice> = envelope
        .prices
        .into_iter()
        .filter_map(to_closing_price)
        .filter(|p| match p.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("{}: dropping price row: {}", PROVIDER_ID, e);
                false
            }
        })
        .collect();

    if prices.is_empty() {
        return Err(MarketDataError::NoData(date.to_string()));
    }

    debug!(
        "{}: {} of {} price rows usable for {}",
        PROVIDER_ID,
        prices.len(),
        total,
        date
    );
    Ok(prices)
}

impl PriceFeed for InfinaProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn fetch_definitions(&self) -> Result<Vec<StockDefinition>, MarketDataError> {
        let envelope: DefinitionEnvelope = self.fetch(&self.endpoint("HisseTanim"))?;
        decode_definitions(envelope)
    }

    fn fetch_closing_prices(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<ClosingPrice>, MarketDataError> {
        let envelope: PriceEnvelope = self.fetch(&self.endpoint("HisseFiyat"))?;
        decode_prices(envelope, date)
    }
}

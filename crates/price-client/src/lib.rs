//! # Price client
//!
//! [`PriceTicker`] is the market-data collaborator: a symbol pair in, a USD price out, or nothing.
//! It never raises; a non-200 status, a malformed body or a timeout all read as "unavailable".
//! [`BinancePriceClient`] implements it against the Binance spot `ticker/price` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Binance pair for Toncoin priced in USDT.
pub const TON_SYMBOL: &str = "TONUSDT";
/// Binance pair for Solana priced in USDT.
pub const SOL_SYMBOL: &str = "SOLUSDT";

const BINANCE_API_BASE: &str = "https://api.binance.com";
/// Total request timeout; past it the price is reported unavailable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Source of live prices.
#[async_trait]
pub trait PriceTicker: Send + Sync {
    /// Last price of `symbol` (e.g. `TONUSDT`), or `None` when unavailable.
    async fn get_price(&self, symbol: &str) -> Option<f64>;
}

#[derive(Debug, Clone)]
pub struct BinancePriceClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TickerPrice {
    price: Option<String>,
}

impl BinancePriceClient {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_base_url(BINANCE_API_BASE.to_string())
    }

    /// Builds a client against another base URL (mirrors, test servers).
    pub fn with_base_url(base_url: String) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch(&self, symbol: &str) -> anyhow::Result<Option<f64>> {
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(symbol = %symbol, status = %response.status(), "Price ticker returned error status");
            return Ok(None);
        }
        let ticker: TickerPrice = response.json().await?;
        Ok(ticker
            .price
            .and_then(|p| p.trim().parse::<f64>().ok())
            .filter(|p| p.is_finite()))
    }
}

#[async_trait]
impl PriceTicker for BinancePriceClient {
    async fn get_price(&self, symbol: &str) -> Option<f64> {
        match self.fetch(symbol).await {
            Ok(price) => {
                debug!(symbol = %symbol, price = ?price, "step: price fetched");
                price
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Price ticker request failed");
                None
            }
        }
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use crate::error::{Error, QuoteError, Result};
use crate::price_infra::QuoteSourceConfig;
use crate::price_infra::connectors::QuoteSource;
use crate::types::{Price, Quote, Symbol};

/// Polls a Finnhub-style `GET /quote?symbol=..` endpoint.
pub struct RestQuoteConnector {
    source_id: String,
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl RestQuoteConnector {
    pub fn new(config: &QuoteSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::ConfigError(format!("HTTP client setup failed: {}", e)))?;

        Ok(RestQuoteConnector {
            source_id: config.source_id.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client,
        })
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }
}

#[async_trait]
impl QuoteSource for RestQuoteConnector {
    async fn fetch_latest(&self, symbol: &Symbol) -> std::result::Result<Quote, QuoteError> {
        let mut request = self.client
            .get(format!("{}/quote", self.base_url))
            .query(&[("symbol", symbol.as_str())]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("token", key.as_str())]);
        }

        let response = request.send()
            .await
            .map_err(|e| QuoteError::Unavailable(e.to_string()))?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(QuoteError::RateLimited),
            status if !status.is_success() => {
                return Err(QuoteError::Unavailable(format!("HTTP {}", status)));
            }
            _ => {}
        }

        let body: QuoteResponse = response.json()
            .await
            .map_err(|e| QuoteError::Malformed(e.to_string()))?;

        body.into_quote(symbol)
    }
}

#[derive(Deserialize)]
struct QuoteResponse {
    c: Option<f64>,  // Current price
    t: Option<i64>,  // Quote time, unix seconds
}

impl QuoteResponse {
    fn into_quote(self, symbol: &Symbol) -> std::result::Result<Quote, QuoteError> {
        let (price, time) = match (self.c, self.t) {
            (Some(price), Some(time)) => (price, time),
            _ => return Err(QuoteError::Malformed("missing price or timestamp".to_string())),
        };

        // Unknown symbols come back as an all-zero quote.
        if time == 0 {
            return Err(QuoteError::Unavailable(format!("no quote for {}", symbol)));
        }

        let observed_at = DateTime::<Utc>::from_timestamp(time, 0)
            .ok_or_else(|| QuoteError::Malformed(format!("timestamp out of range: {}", time)))?;
        let price = Price::from_f64(price)
            .map_err(|e| QuoteError::Malformed(e.to_string()))?;

        Ok(Quote { price, observed_at })
    }
}

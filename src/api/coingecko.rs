use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::constants::{COINGECKO_BASE_URL, COINGECKO_CRO_ID, HTTP_TIMEOUT_SECS};
use crate::errors::{BotError, Result};
use crate::utils::RetryPolicy;

#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: f64,
}

/// CoinGecko simple-price client for the native CRO/USD rate
pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl CoinGeckoClient {
    pub fn new() -> Self {
        Self::with_base_url(COINGECKO_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn cro_usd_price(&self) -> Result<f64> {
        let prices = self.retry.run("coingecko_price", || self.request()).await?;

        let price = prices
            .get(COINGECKO_CRO_ID)
            .map(|q| q.usd)
            .ok_or_else(|| BotError::api("CoinGecko response missing CRO price"))?;

        debug!("CRO/USD = {}", price);
        Ok(price)
    }

    async fn request(&self) -> Result<HashMap<String, UsdQuote>> {
        let url = format!("{}/simple/price", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("ids", COINGECKO_CRO_ID), ("vs_currencies", "usd")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BotError::api(format!(
                "CoinGecko request failed: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

impl Default for CoinGeckoClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_reads_cro_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("ids", "crypto-com-chain"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"crypto-com-chain": {"usd": 0.0912}})),
            )
            .mount(&server)
            .await;

        let client = CoinGeckoClient::with_base_url(server.uri());
        assert_eq!(client.cro_usd_price().await.unwrap(), 0.0912);
    }

    #[tokio::test]
    async fn test_missing_entry_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = CoinGeckoClient::with_base_url(server.uri()).with_retry(RetryPolicy {
            attempts: 1,
            backoff: Duration::ZERO,
            attempt_timeout: Duration::from_secs(5),
        });
        assert!(client.cro_usd_price().await.is_err());
    }
}

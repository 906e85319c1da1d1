use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::types::{DexScreenerResponse, TokenInfo};
use super::TokenLookup;
use crate::constants::{DEXSCREENER_BASE_URL, DEXSCREENER_CHAIN_ID, HTTP_TIMEOUT_SECS};
use crate::errors::{BotError, Result};
use crate::utils::{RetryPolicy, Validator};

/// DexScreener client for token metadata and prices
pub struct DexScreenerClient {
    client: Client,
    base_url: String,
    chain_id: String,
    retry: RetryPolicy,
}

impl DexScreenerClient {
    pub fn new() -> Self {
        Self::with_base_url(DEXSCREENER_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            chain_id: DEXSCREENER_CHAIN_ID.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Look up the first Cronos pair whose base token is `address`.
    ///
    /// `Ok(None)` means the aggregator knows no such pair.
    pub async fn fetch_token_info(&self, address: &str) -> Result<Option<TokenInfo>> {
        let address = Validator::validate_contract_address(address)?;
        info!("Fetching token info for {}", address);

        let query = address.as_str();
        let response = self
            .retry
            .run("dexscreener_token", move || self.request(query))
            .await?;

        let pair = response
            .pairs
            .unwrap_or_default()
            .into_iter()
            .find(|p| {
                p.chain_id.eq_ignore_ascii_case(&self.chain_id)
                    && p.base_token.address.eq_ignore_ascii_case(&address)
            });

        match pair {
            Some(pair) => {
                debug!("Using pair {} on {}", pair.pair_address, pair.dex_id);
                Ok(Some(pair.into_token_info()))
            }
            None => {
                info!("No {} pair found for {}", self.chain_id, address);
                Ok(None)
            }
        }
    }

    async fn request(&self, address: &str) -> Result<DexScreenerResponse> {
        let url = format!("{}/latest/dex/tokens/{}", self.base_url, address);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(BotError::api(format!(
                "DexScreener request failed: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| BotError::api(format!("Malformed DexScreener response: {}", e)))
    }
}

impl Default for DexScreenerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenLookup for DexScreenerClient {
    async fn token_info(&self, address: &str) -> Result<Option<TokenInfo>> {
        self.fetch_token_info(address).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "0x2D03bECE6747ADC00E1a131BBA1469C15fD11e03";

    fn fast_retry() -> RetryPolicy {
        RetryPolicy {
            attempts: 3,
            backoff: Duration::from_millis(1),
            attempt_timeout: Duration::from_secs(5),
        }
    }

    fn pair(chain: &str, base: &str, symbol: &str) -> serde_json::Value {
        json!({
            "chainId": chain,
            "dexId": "vvsfinance",
            "url": format!("https://dexscreener.com/{}/0xpair", chain),
            "pairAddress": "0xpair",
            "baseToken": {"address": base, "name": symbol, "symbol": symbol},
            "quoteToken": {"address": "0x5C7F8A570d578ED84E63fdFA7b1eE72dEae1AE23", "name": "Wrapped CRO", "symbol": "WCRO"},
            "priceNative": "0.05",
            "priceUsd": "0.005",
            "priceChange": {"m5": 0, "h1": 1, "h6": 2, "h24": 3}
        })
    }

    #[tokio::test]
    async fn test_takes_first_cronos_pair() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/latest/dex/tokens/{}", TOKEN)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "pairs": [
                    pair("ethereum", TOKEN, "WRONG"),
                    pair("cronos", TOKEN, "VVS"),
                    pair("cronos", TOKEN, "SECOND"),
                ]
            })))
            .mount(&server)
            .await;

        let client = DexScreenerClient::with_base_url(server.uri()).with_retry(fast_retry());
        let info = client.fetch_token_info(TOKEN).await.unwrap().unwrap();
        assert_eq!(info.symbol, "VVS");
        assert_eq!(info.price_usd, 0.005);
        assert_eq!(info.price_change.h24, 3.0);
    }

    #[tokio::test]
    async fn test_no_pairs_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pairs": null})))
            .mount(&server)
            .await;

        let client = DexScreenerClient::with_base_url(server.uri()).with_retry(fast_retry());
        assert!(client.fetch_token_info(TOKEN).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_server_error_retried_then_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let client = DexScreenerClient::with_base_url(server.uri()).with_retry(fast_retry());
        assert!(client.fetch_token_info(TOKEN).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_address_never_hits_network() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = DexScreenerClient::with_base_url(server.uri()).with_retry(fast_retry());
        let result = client.fetch_token_info("not-an-address").await;
        assert!(result.is_err());
    }
}

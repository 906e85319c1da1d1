use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::types::ExplorerResponse;
use crate::constants::{CRONOSCAN_API_URL, HTTP_TIMEOUT_SECS};
use crate::errors::{BotError, Result};
use crate::utils::{RetryPolicy, Validator};

/// CronosScan contract ABI lookup.
///
/// Disabled when no API key is configured; every lookup then reports `None`.
pub struct ContractAbiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl ContractAbiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(CRONOSCAN_API_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Verified ABI as JSON, `None` when the contract is unverified or lookups are disabled
    pub async fn fetch_abi(&self, address: &str) -> Result<Option<Value>> {
        let address = Validator::validate_contract_address(address)?;
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("ABI lookup disabled, no explorer API key");
            return Ok(None);
        };

        let query = address.as_str();
        let response = self
            .retry
            .run("cronoscan_getabi", move || self.request(query, api_key))
            .await?;

        if response.status != "1" {
            debug!("No verified ABI for {}: {}", address, response.message);
            return Ok(None);
        }

        match response.result {
            Value::String(text) => serde_json::from_str(&text).map(Some).map_err(|e| {
                warn!("Explorer returned an unparseable ABI for {}", address);
                BotError::api(format!("Malformed ABI: {}", e))
            }),
            other => Ok(Some(other)),
        }
    }

    pub async fn is_verified(&self, address: &str) -> Result<bool> {
        Ok(self.fetch_abi(address).await?.is_some())
    }

    async fn request(&self, address: &str, api_key: &str) -> Result<ExplorerResponse> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("module", "contract"),
                ("action", "getabi"),
                ("address", address),
                ("apikey", api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BotError::api(format!(
                "Explorer request failed: {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "0x2D03bECE6747ADC00E1a131BBA1469C15fD11e03";

    #[tokio::test]
    async fn test_verified_contract_returns_abi() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("action", "getabi"))
            .and(query_param("apikey", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "1",
                "message": "OK",
                "result": "[{\"type\":\"function\",\"name\":\"symbol\"}]"
            })))
            .mount(&server)
            .await;

        let client = ContractAbiClient::with_base_url(server.uri(), Some("secret".into()));
        let abi = client.fetch_abi(TOKEN).await.unwrap().unwrap();
        assert_eq!(abi[0]["name"], "symbol");
    }

    #[tokio::test]
    async fn test_unverified_contract_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "0",
                "message": "NOTOK",
                "result": "Contract source code not verified"
            })))
            .mount(&server)
            .await;

        let client = ContractAbiClient::with_base_url(server.uri(), Some("secret".into()));
        assert!(!client.is_verified(TOKEN).await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_without_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ContractAbiClient::with_base_url(server.uri(), Some("  ".into()));
        assert!(!client.is_enabled());
        assert!(client.fetch_abi(TOKEN).await.unwrap().is_none());
    }
}

use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::LocalWallet;
use ethers::types::{Address, U256};
use ethers::utils::{format_units, parse_units};
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::contracts::Erc20;
use crate::errors::{BotError, Result};
use crate::utils::RetryPolicy;

pub type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// JSON-RPC access to Cronos over a pool of interchangeable endpoints.
///
/// Each call picks an endpoint at random; reads go through the retry policy
/// so a dead endpoint is usually skipped on the next attempt.
pub struct ChainClient {
    endpoints: Vec<String>,
    chain_id: u64,
    retry: RetryPolicy,
}

impl ChainClient {
    pub fn new(endpoints: Vec<String>, chain_id: u64) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(BotError::Config("No RPC endpoints configured".into()));
        }

        Ok(Self {
            endpoints,
            chain_id,
            retry: RetryPolicy::default(),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn pick_endpoint(&self) -> &str {
        self.endpoints
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(self.endpoints[0].as_str())
    }

    pub fn provider(&self) -> Result<Provider<Http>> {
        let url = self.pick_endpoint();
        debug!("Using RPC endpoint {}", url);

        let provider = Provider::<Http>::try_from(url)
            .map_err(|e| BotError::Config(format!("Invalid RPC URL {}: {}", url, e)))?;
        Ok(provider.interval(Duration::from_millis(1_000)))
    }

    /// Provider bound to a local signer, for state-changing calls
    pub fn signer_client(&self, wallet: LocalWallet) -> Result<Arc<SignerClient>> {
        let provider = self.provider()?;
        Ok(Arc::new(SignerMiddleware::new(provider, wallet)))
    }

    pub async fn native_balance(&self, owner: Address) -> Result<U256> {
        self.retry
            .run("native_balance", move || async move {
                self.provider()?
                    .get_balance(owner, None)
                    .await
                    .map_err(|e| BotError::chain(e.to_string()))
            })
            .await
    }

    pub async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        self.retry
            .run("token_balance", move || async move {
                let contract = Erc20::new(token, Arc::new(self.provider()?));
                contract
                    .balance_of(owner)
                    .call()
                    .await
                    .map_err(|e| BotError::chain(e.to_string()))
            })
            .await
    }

    pub async fn token_decimals(&self, token: Address) -> Result<u8> {
        self.retry
            .run("token_decimals", move || async move {
                let contract = Erc20::new(token, Arc::new(self.provider()?));
                contract
                    .decimals()
                    .call()
                    .await
                    .map_err(|e| BotError::chain(e.to_string()))
            })
            .await
    }

    /// Balance of `token` held by `owner`, in whole tokens
    pub async fn token_balance_units(&self, token: Address, owner: Address) -> Result<(U256, u8, f64)> {
        let (raw, decimals) = futures::try_join!(
            self.token_balance(token, owner),
            self.token_decimals(token)
        )?;
        Ok((raw, decimals, from_base_units(raw, decimals)?))
    }
}

/// Whole-unit decimal amount to integer base units (wei for CRO)
pub fn to_base_units(amount: f64, decimals: u8) -> Result<U256> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(BotError::ValidationError(format!("Invalid amount {}", amount)));
    }

    let text = format!("{:.*}", decimals as usize, amount);
    let parsed = parse_units(text, decimals as u32)
        .map_err(|e| BotError::ValidationError(format!("Cannot convert {}: {}", amount, e)))?;
    Ok(parsed.into())
}

/// Integer base units to a whole-unit float, for display and valuation only
pub fn from_base_units(value: U256, decimals: u8) -> Result<f64> {
    let text = format_units(value, decimals as u32)
        .map_err(|e| BotError::chain(format!("Cannot format {}: {}", value, e)))?;
    text.parse::<f64>()
        .map_err(|e| BotError::chain(format!("Cannot parse {}: {}", text, e)))
}

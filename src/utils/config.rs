use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::constants::{
    CRONOS_MAINNET_CHAIN_ID, CRONOS_SYMBOL, CRONOS_TESTNET_CHAIN_ID, CRONOS_TESTNET_SYMBOL,
    DEFAULT_QUICK_BUY_CRO, DEFAULT_SESSION_TTL_SECS, DEFAULT_SLIPPAGE_BPS, MAINNET_EXPLORER_URL,
    MAINNET_RPC_URLS, MAX_SLIPPAGE_BPS, TESTNET_EXPLORER_URL, TESTNET_RPC_URLS,
    VVS_ROUTER_ADDRESS, WCRO_ADDRESS,
};
use crate::errors::{BotError, Result};
use crate::utils::Validator;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub telegram_bot_token: String,
    pub network: NetworkType,
    pub rpc_urls: Vec<String>,
    pub database_url: String,

    // Optional integrations
    pub dev_account_address: Option<String>,
    pub db_encryption_key: Option<String>,
    pub explorer_api_key: Option<String>,

    // Router
    pub router_address: String,
    pub wcro_address: String,

    // Trading Configuration
    pub slippage_bps: u16,
    pub quick_buy_cro: f64,

    // Sessions
    pub session_ttl_secs: u64,

    // User Authorization
    pub allowed_users: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkType {
    Mainnet,
    Testnet,
}

impl NetworkType {
    pub fn chain_id(&self) -> u64 {
        match self {
            NetworkType::Mainnet => CRONOS_MAINNET_CHAIN_ID,
            NetworkType::Testnet => CRONOS_TESTNET_CHAIN_ID,
        }
    }

    pub fn native_symbol(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => CRONOS_SYMBOL,
            NetworkType::Testnet => CRONOS_TESTNET_SYMBOL,
        }
    }

    pub fn explorer_url(&self) -> &'static str {
        match self {
            NetworkType::Mainnet => MAINNET_EXPLORER_URL,
            NetworkType::Testnet => TESTNET_EXPLORER_URL,
        }
    }

    pub fn default_rpc_urls(&self) -> Vec<String> {
        let urls = match self {
            NetworkType::Mainnet => MAINNET_RPC_URLS,
            NetworkType::Testnet => TESTNET_RPC_URLS,
        };
        urls.iter().map(|u| u.to_string()).collect()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self> {
        let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN")
            .or_else(|_| env::var("TELEGRAM_API_KEY"))
            .map_err(|_| BotError::Config("TELEGRAM_BOT_TOKEN not set".into()))?;

        let network = Self::parse_network(&env::var("NETWORK").unwrap_or_else(|_| "mainnet".to_string()));

        let rpc_urls = Self::parse_list(&env::var("CRONOS_NODE_URL").unwrap_or_default());
        let rpc_urls = if rpc_urls.is_empty() {
            network.default_rpc_urls()
        } else {
            rpc_urls
        };

        Ok(Self {
            telegram_bot_token,
            network,
            rpc_urls,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://cronos_bot.db".to_string()),

            dev_account_address: Self::optional("DEV_ACCOUNT_ADDRESS"),
            db_encryption_key: Self::optional("DB_ENCRYPTION_KEY"),
            explorer_api_key: Self::optional("CRONOS_EXPLORER_API_KEY"),

            router_address: env::var("ROUTER_ADDRESS")
                .unwrap_or_else(|_| VVS_ROUTER_ADDRESS.to_string()),
            wcro_address: env::var("WCRO_ADDRESS")
                .unwrap_or_else(|_| WCRO_ADDRESS.to_string()),

            slippage_bps: env::var("SLIPPAGE_BPS")
                .unwrap_or_else(|_| DEFAULT_SLIPPAGE_BPS.to_string())
                .parse()
                .unwrap_or(DEFAULT_SLIPPAGE_BPS),
            quick_buy_cro: env::var("QUICK_BUY_CRO")
                .unwrap_or_else(|_| DEFAULT_QUICK_BUY_CRO.to_string())
                .parse()
                .unwrap_or(DEFAULT_QUICK_BUY_CRO),

            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .unwrap_or_else(|_| DEFAULT_SESSION_TTL_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_SESSION_TTL_SECS),

            allowed_users: Self::parse_list(&env::var("ALLOWED_USERS").unwrap_or_default()),
        })
    }

    fn optional(key: &str) -> Option<String> {
        env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
    }

    fn parse_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    fn parse_network(network: &str) -> NetworkType {
        match network.to_lowercase().as_str() {
            "testnet" | "t3" => NetworkType::Testnet,
            _ => NetworkType::Mainnet,
        }
    }

    pub fn is_user_allowed(&self, user_id: &str) -> bool {
        self.allowed_users.is_empty() || self.allowed_users.iter().any(|u| u == user_id)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.telegram_bot_token.trim().is_empty() {
            return Err(BotError::Config("Telegram bot token is required".into()));
        }

        if self.rpc_urls.is_empty() {
            return Err(BotError::Config("At least one RPC URL is required".into()));
        }
        for url in &self.rpc_urls {
            Validator::validate_url(url)?;
        }

        if self.slippage_bps == 0 || self.slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(BotError::Config(format!(
                "SLIPPAGE_BPS must be between 1 and {}",
                MAX_SLIPPAGE_BPS
            )));
        }

        if !self.quick_buy_cro.is_finite() || self.quick_buy_cro <= 0.0 {
            return Err(BotError::Config("QUICK_BUY_CRO must be positive".into()));
        }

        if self.session_ttl_secs == 0 {
            return Err(BotError::Config("SESSION_TTL_SECS must be positive".into()));
        }

        Validator::validate_contract_address(&self.router_address)?;
        Validator::validate_contract_address(&self.wcro_address)?;
        if let Some(dev) = &self.dev_account_address {
            Validator::validate_contract_address(dev)?;
        }

        Ok(())
    }
}

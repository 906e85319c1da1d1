use std::sync::Arc;

use crate::api::{CoinGeckoClient, DexScreenerClient, TokenLookup};
use crate::chain::{ChainClient, ContractAbiClient};
use crate::db::Database;
use crate::errors::Result;
use crate::portfolio::PortfolioFetcher;
use crate::session::SessionStore;
use crate::trading::SwapExecutor;
use crate::utils::Config;
use crate::wallet::{WalletManager, WalletSecurity};

/// Everything a handler needs, shared across the dispatcher as one dependency
pub struct BotContext {
    pub config: Arc<Config>,
    pub db: Arc<Database>,
    pub wallets: WalletManager,
    pub sessions: Arc<SessionStore>,
    pub chain: Arc<ChainClient>,
    pub tokens: Arc<dyn TokenLookup>,
    pub abi: ContractAbiClient,
    pub cro_price: CoinGeckoClient,
    pub swaps: SwapExecutor,
    pub portfolio: PortfolioFetcher,
}

impl BotContext {
    pub fn new(config: Arc<Config>, db: Arc<Database>, sessions: Arc<SessionStore>) -> Result<Self> {
        let security = WalletSecurity::new(config.db_encryption_key.as_deref());
        let chain = Arc::new(ChainClient::new(config.rpc_urls.clone(), config.network.chain_id())?);
        let tokens: Arc<dyn TokenLookup> = Arc::new(DexScreenerClient::new());

        let swaps = SwapExecutor::new(
            chain.clone(),
            &config.router_address,
            &config.wcro_address,
            config.dev_account_address.as_deref(),
            config.slippage_bps,
        )?;
        let portfolio = PortfolioFetcher::new(db.clone(), chain.clone(), tokens.clone());

        Ok(Self {
            wallets: WalletManager::new(db.clone(), security),
            abi: ContractAbiClient::new(config.explorer_api_key.clone()),
            cro_price: CoinGeckoClient::new(),
            config,
            db,
            sessions,
            chain,
            tokens,
            swaps,
            portfolio,
        })
    }

    pub fn native_symbol(&self) -> &'static str {
        self.config.network.native_symbol()
    }

    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.config.network.explorer_url(), tx_hash)
    }

    pub fn address_url(&self, address: &str) -> String {
        format!("{}/address/{}", self.config.network.explorer_url(), address)
    }
}

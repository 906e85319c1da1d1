use async_trait::async_trait;
use ethers::types::Address;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::types::{Holding, Portfolio};
use crate::api::{TokenInfo, TokenLookup};
use crate::chain::ChainClient;
use crate::db::Database;
use crate::errors::{Result, WalletError};

/// On-chain token balance in whole units
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn token_balance(&self, token: &str, owner: &str) -> Result<f64>;
}

#[async_trait]
impl BalanceSource for ChainClient {
    async fn token_balance(&self, token: &str, owner: &str) -> Result<f64> {
        let token: Address = parse(token)?;
        let owner: Address = parse(owner)?;
        let (_, _, balance) = self.token_balance_units(token, owner).await?;
        Ok(balance)
    }
}

fn parse(address: &str) -> Result<Address> {
    address
        .parse()
        .map_err(|_| WalletError::InvalidAddress(address.to_string()).into())
}

/// Builds a user's holdings from stored positions, live balances and live prices
pub struct PortfolioFetcher {
    db: Arc<Database>,
    balances: Arc<dyn BalanceSource>,
    prices: Arc<dyn TokenLookup>,
}

impl PortfolioFetcher {
    pub fn new(db: Arc<Database>, balances: Arc<dyn BalanceSource>, prices: Arc<dyn TokenLookup>) -> Self {
        Self { db, balances, prices }
    }

    /// Refresh every open position and persist the new balance and value.
    /// Positions with a zero balance are left out of the result.
    pub async fn fetch_portfolio(&self, telegram_user_id: i64, owner: &str) -> Result<Portfolio> {
        let positions = self.db.get_open_positions(telegram_user_id).await?;
        info!("Refreshing {} positions for user {}", positions.len(), telegram_user_id);

        let mut holdings = Vec::with_capacity(positions.len());
        for position in positions {
            let balance = match self.balances.token_balance(&position.token_address, owner).await {
                Ok(balance) => balance,
                Err(e) => {
                    warn!(
                        "Balance read failed for {}, showing stored balance: {}",
                        position.token_address, e
                    );
                    position.balance
                }
            };
            if balance <= 0.0 {
                debug!("Skipping empty position {}", position.token_address);
                continue;
            }

            let (symbol, price_usd) = match self.prices.token_info(&position.token_address).await {
                Ok(Some(info)) => (info.symbol, info.price_usd),
                Ok(None) => (position.symbol.clone(), 0.0),
                Err(e) => {
                    warn!("Price lookup failed for {}: {}", position.token_address, e);
                    (position.symbol.clone(), 0.0)
                }
            };

            let holding = Holding::new(position.token_address, symbol, balance, price_usd, position.cost_usd);
            self.db
                .upsert_open_position(
                    telegram_user_id,
                    &holding.token_address,
                    &holding.symbol,
                    holding.balance,
                    holding.value_usd,
                    0.0,
                )
                .await?;
            holdings.push(holding);
        }

        Ok(Portfolio::new(holdings))
    }

    /// Book a completed trade: refresh the balance and move the cost basis by `cost_delta_usd`.
    pub async fn record_trade(
        &self,
        telegram_user_id: i64,
        owner: &str,
        token: &TokenInfo,
        cost_delta_usd: f64,
    ) -> Result<()> {
        let balance = self.balances.token_balance(&token.address, owner).await?;
        self.db
            .upsert_open_position(
                telegram_user_id,
                &token.address,
                &token.symbol,
                balance,
                balance * token.price_usd,
                cost_delta_usd,
            )
            .await
    }

    /// Cost basis released by selling `percentage` percent of a position
    pub async fn cost_released(&self, telegram_user_id: i64, token: &str, percentage: f64) -> Result<f64> {
        let cost = self
            .db
            .get_open_position(telegram_user_id, token)
            .await?
            .map(|p| p.cost_usd)
            .unwrap_or(0.0);
        Ok(cost * percentage.clamp(0.0, 100.0) / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PriceChange;
    use crate::errors::BotError;
    use std::collections::HashMap;

    const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const TOKEN_A: &str = "0x2D03bECE6747ADC00E1a131BBA1469C15fD11e03";
    const TOKEN_B: &str = "0x66e428c3f67a68878562e79A0234c1F83c208770";

    struct FixedBalances(HashMap<String, f64>);

    #[async_trait]
    impl BalanceSource for FixedBalances {
        async fn token_balance(&self, token: &str, _owner: &str) -> Result<f64> {
            Ok(self.0.get(&token.to_lowercase()).copied().unwrap_or(0.0))
        }
    }

    struct BrokenToken {
        inner: FixedBalances,
        broken: &'static str,
    }

    #[async_trait]
    impl BalanceSource for BrokenToken {
        async fn token_balance(&self, token: &str, owner: &str) -> Result<f64> {
            if token.eq_ignore_ascii_case(self.broken) {
                return Err(BotError::chain("execution reverted"));
            }
            self.inner.token_balance(token, owner).await
        }
    }

    struct FixedPrices;

    #[async_trait]
    impl TokenLookup for FixedPrices {
        async fn token_info(&self, address: &str) -> Result<Option<TokenInfo>> {
            if address.eq_ignore_ascii_case(TOKEN_B) {
                return Err(BotError::api("down"));
            }
            Ok(Some(token_info(address, 0.5)))
        }
    }

    fn token_info(address: &str, price_usd: f64) -> TokenInfo {
        TokenInfo {
            address: address.to_string(),
            name: "VVS Finance".into(),
            symbol: "VVS".into(),
            price_native: 0.05,
            price_usd,
            market_cap_usd: None,
            liquidity_usd: None,
            pair_url: String::new(),
            dex_id: "vvsfinance".into(),
            price_change: PriceChange::default(),
        }
    }

    async fn fetcher(balances: &[(&str, f64)]) -> (PortfolioFetcher, Arc<Database>) {
        let db = Arc::new(Database::connect("sqlite::memory:").await.unwrap());
        let balances = FixedBalances(
            balances
                .iter()
                .map(|(t, b)| (t.to_lowercase(), *b))
                .collect(),
        );
        let fetcher = PortfolioFetcher::new(db.clone(), Arc::new(balances), Arc::new(FixedPrices));
        (fetcher, db)
    }

    #[tokio::test]
    async fn test_record_and_value_positions() {
        let (fetcher, _db) = fetcher(&[(TOKEN_A, 1_000.0)]).await;
        fetcher
            .record_trade(1, OWNER, &token_info(TOKEN_A, 0.4), 400.0)
            .await
            .unwrap();

        let portfolio = fetcher.fetch_portfolio(1, OWNER).await.unwrap();
        assert_eq!(portfolio.len(), 1);
        let holding = &portfolio.holdings[0];
        assert_eq!(holding.value_usd, 500.0);
        assert_eq!(holding.pnl_usd, 100.0);
        assert_eq!(holding.pnl_percentage, 25.0);
    }

    #[tokio::test]
    async fn test_zero_balances_skipped_and_failed_price_tolerated() {
        let (fetcher, db) = fetcher(&[(TOKEN_B, 3.0)]).await;
        db.upsert_open_position(1, TOKEN_A, "VVS", 10.0, 5.0, 5.0).await.unwrap();
        db.upsert_open_position(1, TOKEN_B, "OLD", 3.0, 3.0, 3.0).await.unwrap();

        let portfolio = fetcher.fetch_portfolio(1, OWNER).await.unwrap();
        assert_eq!(portfolio.len(), 1);
        assert_eq!(portfolio.holdings[0].symbol, "OLD");
        assert_eq!(portfolio.holdings[0].price_usd, 0.0);
    }

    #[tokio::test]
    async fn test_unreadable_balance_keeps_other_holdings() {
        let db = Arc::new(Database::connect("sqlite::memory:").await.unwrap());
        db.upsert_open_position(1, TOKEN_A, "VVS", 10.0, 5.0, 5.0).await.unwrap();
        db.upsert_open_position(1, TOKEN_B, "BAD", 7.0, 0.0, 0.0).await.unwrap();

        let balances = BrokenToken {
            inner: FixedBalances(HashMap::from([(TOKEN_A.to_lowercase(), 20.0)])),
            broken: TOKEN_B,
        };
        let fetcher = PortfolioFetcher::new(db.clone(), Arc::new(balances), Arc::new(FixedPrices));

        let portfolio = fetcher.fetch_portfolio(1, OWNER).await.unwrap();
        assert_eq!(portfolio.len(), 2);

        let good = portfolio.holdings.iter().find(|h| h.token_address.eq_ignore_ascii_case(TOKEN_A)).unwrap();
        assert_eq!(good.balance, 20.0);
        let stale = portfolio.holdings.iter().find(|h| h.token_address.eq_ignore_ascii_case(TOKEN_B)).unwrap();
        assert_eq!(stale.balance, 7.0);
    }

    #[tokio::test]
    async fn test_cost_released_on_partial_sell() {
        let (fetcher, db) = fetcher(&[]).await;
        db.upsert_open_position(1, TOKEN_A, "VVS", 10.0, 5.0, 200.0).await.unwrap();
        assert_eq!(fetcher.cost_released(1, TOKEN_A, 25.0).await.unwrap(), 50.0);
        assert_eq!(fetcher.cost_released(2, TOKEN_A, 25.0).await.unwrap(), 0.0);
    }
}

pub mod coingecko;
pub mod dexscreener;
pub mod types;

use async_trait::async_trait;

use crate::errors::Result;

pub use coingecko::CoinGeckoClient;
pub use dexscreener::DexScreenerClient;
pub use types::{PriceChange, TokenInfo};

/// Source of token metadata and prices, keyed by contract address.
#[async_trait]
pub trait TokenLookup: Send + Sync {
    /// `Ok(None)` when the token has no known trading pair.
    async fn token_info(&self, address: &str) -> Result<Option<TokenInfo>>;
}

pub mod fetcher;
pub mod types;

pub use fetcher::{BalanceSource, PortfolioFetcher};
pub use types::{Holding, Portfolio};

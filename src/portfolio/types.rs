use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One open position valued at the current market price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub token_address: String,
    pub symbol: String,
    pub balance: f64,
    pub price_usd: f64,
    pub value_usd: f64,
    pub cost_usd: f64,
    pub pnl_usd: f64,
    pub pnl_percentage: f64,
    pub last_updated: DateTime<Utc>,
}

impl Holding {
    pub fn new(token_address: String, symbol: String, balance: f64, price_usd: f64, cost_usd: f64) -> Self {
        let value_usd = balance * price_usd;
        let pnl_usd = value_usd - cost_usd;
        let pnl_percentage = if cost_usd > 0.0 {
            pnl_usd / cost_usd * 100.0
        } else {
            0.0
        };

        Self {
            token_address,
            symbol,
            balance,
            price_usd,
            value_usd,
            cost_usd,
            pnl_usd,
            pnl_percentage,
            last_updated: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
    pub total_value_usd: f64,
    pub total_cost_usd: f64,
}

impl Portfolio {
    pub fn new(holdings: Vec<Holding>) -> Self {
        let total_value_usd = holdings.iter().map(|h| h.value_usd).sum();
        let total_cost_usd = holdings.iter().map(|h| h.cost_usd).sum();
        Self {
            holdings,
            total_value_usd,
            total_cost_usd,
        }
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// Holding at `index`, wrapped modulo the number of holdings
    pub fn get_wrapped(&self, index: usize) -> Option<&Holding> {
        if self.holdings.is_empty() {
            return None;
        }
        self.holdings.get(index % self.holdings.len())
    }

    pub fn total_pnl_usd(&self) -> f64 {
        self.total_value_usd - self.total_cost_usd
    }

    pub fn total_pnl_percentage(&self) -> f64 {
        if self.total_cost_usd > 0.0 {
            self.total_pnl_usd() / self.total_cost_usd * 100.0
        } else {
            0.0
        }
    }
}

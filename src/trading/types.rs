use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::constants::BPS_DENOMINATOR;
use crate::errors::{Result, TradingError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A fully priced swap, ready to sign.
///
/// `amount_in` is what goes through the router; `fee_amount` is split off
/// beforehand and sent to the dev account (CRO on buys, tokens on sells).
#[derive(Debug, Clone, PartialEq)]
pub struct SwapPlan {
    pub side: TradeSide,
    pub token: Address,
    pub path: Vec<Address>,
    pub amount_in: U256,
    pub fee_amount: U256,
    pub quoted_out: U256,
    pub amount_out_min: U256,
    pub deadline: U256,
    pub in_decimals: u8,
    pub out_decimals: u8,
}

impl SwapPlan {
    /// A zero minimum accepts any price, which the executor refuses to sign.
    pub fn needs_slippage_protection(&self) -> bool {
        self.amount_out_min.is_zero()
    }

    pub fn gross_amount_in(&self) -> U256 {
        self.amount_in.saturating_add(self.fee_amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeResult {
    pub side: TradeSide,
    pub token_address: String,
    pub tx_hash: String,
    pub fee_tx_hash: Option<String>,
    pub approve_tx_hash: Option<String>,
    /// Whole units spent, fee included
    pub amount_in: f64,
    /// Whole units expected from the router quote
    pub expected_out: f64,
    pub timestamp: DateTime<Utc>,
}

/// Split `bps` basis points off `amount`, returning `(remaining, fee)`.
pub fn split_fee(amount: U256, bps: u64) -> (U256, U256) {
    let fee = amount * U256::from(bps) / U256::from(BPS_DENOMINATOR);
    (amount - fee, fee)
}

/// Router quote reduced by the slippage tolerance.
pub fn min_amount_out(quoted: U256, slippage_bps: u16) -> U256 {
    let keep = BPS_DENOMINATOR.saturating_sub(slippage_bps as u64);
    quoted * U256::from(keep) / U256::from(BPS_DENOMINATOR)
}

/// Share of `balance` for a sell percentage in (0, 100]. 100 always means the full balance.
pub fn percentage_of(balance: U256, percentage: f64) -> Result<U256> {
    if !percentage.is_finite() || percentage <= 0.0 || percentage > 100.0 {
        return Err(TradingError::InvalidPercentage { percentage }.into());
    }

    if percentage >= 100.0 {
        return Ok(balance);
    }

    let bps = (percentage * 100.0).round() as u64;
    if bps == 0 {
        return Err(TradingError::InvalidPercentage { percentage }.into());
    }
    Ok(balance * U256::from(bps) / U256::from(BPS_DENOMINATOR))
}

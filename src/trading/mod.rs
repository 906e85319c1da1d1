mod swaps;
mod types;

pub use swaps::SwapExecutor;
pub use types::{min_amount_out, percentage_of, split_fee, SwapPlan, TradeResult, TradeSide};

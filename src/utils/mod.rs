mod config;
mod validation;
pub mod formatting;
pub mod retry;

pub use config::{Config, NetworkType};
pub use validation::Validator;
pub use formatting::{
    format_market_cap, format_usd, format_cro, format_percentage,
    format_token_amount, trend_marker,
};
pub use retry::RetryPolicy;

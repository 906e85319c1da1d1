use regex::Regex;
use std::sync::LazyLock;

use crate::constants::{MAX_SLIPPAGE_BPS, MIN_SELL_PERCENTAGE};
use crate::errors::{BotError, Result, TradingError, WalletError};

static CONTRACT_ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").expect("static regex"));

pub struct Validator;

impl Validator {
    /// Check the `0x` + 40 hex digits shape. Says nothing about whether a contract exists there.
    pub fn is_contract_address(input: &str) -> bool {
        CONTRACT_ADDRESS_RE.is_match(input)
    }

    pub fn validate_contract_address(input: &str) -> Result<String> {
        let trimmed = input.trim();
        if Self::is_contract_address(trimmed) {
            Ok(trimmed.to_string())
        } else {
            Err(WalletError::InvalidAddress(trimmed.to_string()).into())
        }
    }

    /// Parse a free-text CRO amount. Accepts `1000`, `1,000.5`, `12.5 cro`.
    pub fn parse_amount(input: &str) -> Result<f64> {
        let cleaned: String = input
            .trim()
            .trim_end_matches(|c: char| c.is_alphabetic() || c.is_whitespace())
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();

        let amount: f64 = cleaned.parse().map_err(|_| TradingError::InvalidAmount {
            message: format!("'{}' is not a number", input.trim()),
        })?;

        Self::validate_trade_amount(amount)?;
        Ok(amount)
    }

    pub fn validate_trade_amount(amount: f64) -> Result<()> {
        if amount.is_nan() || amount.is_infinite() {
            return Err(TradingError::InvalidAmount {
                message: "Amount is not a valid number".to_string(),
            }
            .into());
        }

        if amount <= 0.0 {
            return Err(TradingError::InvalidAmount {
                message: "Amount must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Parse a sell percentage such as `50` or `50%`.
    pub fn parse_percentage(input: &str) -> Result<f64> {
        let cleaned = input.trim().trim_end_matches('%').trim();
        let percentage: f64 = cleaned
            .parse()
            .map_err(|_| TradingError::InvalidPercentage { percentage: f64::NAN })?;
        Self::validate_percentage(percentage)?;
        Ok(percentage)
    }

    pub fn validate_percentage(percentage: f64) -> Result<()> {
        if percentage.is_nan() || percentage.is_infinite() {
            return Err(TradingError::InvalidPercentage { percentage }.into());
        }

        if percentage < MIN_SELL_PERCENTAGE || percentage > 100.0 {
            return Err(TradingError::InvalidPercentage { percentage }.into());
        }

        Ok(())
    }

    pub fn validate_slippage(slippage_bps: u16) -> Result<()> {
        if slippage_bps > MAX_SLIPPAGE_BPS {
            return Err(BotError::ValidationError(format!(
                "Slippage cannot exceed {}%",
                MAX_SLIPPAGE_BPS / 100
            )));
        }
        Ok(())
    }

    /// Normalize a pasted mnemonic: lowercase, single spaces, 12/15/18/21/24 words.
    pub fn normalize_mnemonic(input: &str) -> Result<String> {
        let words: Vec<String> = input
            .split_whitespace()
            .map(|w| w.to_lowercase())
            .collect();

        if !matches!(words.len(), 12 | 15 | 18 | 21 | 24) {
            return Err(WalletError::InvalidMnemonic.into());
        }

        if !words.iter().all(|w| w.chars().all(|c| c.is_ascii_lowercase())) {
            return Err(WalletError::InvalidMnemonic.into());
        }

        Ok(words.join(" "))
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(BotError::ValidationError("URL cannot be empty".into()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(BotError::ValidationError(
                "URL must start with http:// or https://".into(),
            ));
        }

        Ok(())
    }
}

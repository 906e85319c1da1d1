use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Chain error: {0}")]
    Chain(String),

    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Trading(#[from] TradingError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BotError {
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    pub fn chain(message: impl Into<String>) -> Self {
        Self::Chain(message.into())
    }

    /// True for failures worth another attempt (transport and upstream errors).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Api(_) | Self::Http(_) | Self::Chain(_))
    }
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid mnemonic phrase")]
    InvalidMnemonic,

    #[error("Invalid private key")]
    InvalidPrivateKey,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Key derivation failed")]
    DerivationFailed,

    #[error("Wallet not found")]
    WalletNotFound,

    #[error("Wallet already exists for this user")]
    WalletAlreadyExists,

    #[error("Stored address does not match the address derived from the mnemonic")]
    AddressMismatch,

    #[error("Failed to seal or unseal wallet secret")]
    Sealing,
}

#[derive(Debug, Error)]
pub enum TradingError {
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Invalid percentage: {percentage}")]
    InvalidPercentage { percentage: f64 },

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: f64, available: f64 },

    #[error("No liquidity route for token {token}")]
    NoRoute { token: String },

    #[error("Swap has no minimum output; slippage protection required")]
    UnprotectedSwap,

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl From<ethers::signers::WalletError> for WalletError {
    fn from(_: ethers::signers::WalletError) -> Self {
        WalletError::InvalidPrivateKey
    }
}

impl From<bip39::Error> for WalletError {
    fn from(_: bip39::Error) -> Self {
        WalletError::InvalidMnemonic
    }
}

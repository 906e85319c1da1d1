use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// Row of the `users` table. `mnemonic` is stored sealed or plaintext, see `wallet::WalletSecurity`.
#[derive(Clone, FromRow)]
pub struct UserWalletRow {
    pub telegram_user_id: i64,
    pub cronos_address: String,
    pub mnemonic: String,
}

impl fmt::Debug for UserWalletRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserWalletRow")
            .field("telegram_user_id", &self.telegram_user_id)
            .field("cronos_address", &self.cronos_address)
            .field("mnemonic", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct OpenPosition {
    pub telegram_user_id: i64,
    pub token_address: String,
    pub symbol: String,
    pub balance: f64,
    pub value_usd: f64,
    pub cost_usd: f64,
    pub last_updated: DateTime<Utc>,
}

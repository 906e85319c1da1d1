use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::Database;
use crate::errors::{Result, WalletError};
use crate::wallet::{WalletCredentials, WalletGenerator, WalletSecurity};

/// Public view of a user's wallet; never carries secrets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletInfo {
    pub telegram_user_id: i64,
    pub address: String,
}

/// Wallet registry: one managed account per Telegram user
pub struct WalletManager {
    db: Arc<Database>,
    security: WalletSecurity,
}

impl WalletManager {
    pub fn new(db: Arc<Database>, security: WalletSecurity) -> Self {
        Self { db, security }
    }

    /// Create and persist a fresh wallet. Refuses when the user already has one.
    pub async fn create_wallet(&self, telegram_user_id: i64) -> Result<WalletCredentials> {
        if self.db.get_user_wallet(telegram_user_id).await?.is_some() {
            return Err(WalletError::WalletAlreadyExists.into());
        }

        let credentials = WalletGenerator::generate_new()?;
        self.store(telegram_user_id, &credentials).await?;

        info!("Created wallet {} for user {}", credentials.address, telegram_user_id);
        Ok(credentials)
    }

    /// Import from a mnemonic, replacing any wallet the user had
    pub async fn import_wallet(&self, telegram_user_id: i64, phrase: &str) -> Result<WalletInfo> {
        let credentials = WalletGenerator::from_mnemonic(phrase)?;
        self.store(telegram_user_id, &credentials).await?;

        info!("Imported wallet {} for user {}", credentials.address, telegram_user_id);
        Ok(WalletInfo {
            telegram_user_id,
            address: credentials.address,
        })
    }

    async fn store(&self, telegram_user_id: i64, credentials: &WalletCredentials) -> Result<()> {
        let phrase = credentials.mnemonic.as_deref().ok_or(WalletError::InvalidMnemonic)?;
        let sealed = self.security.seal(phrase)?;
        self.db
            .upsert_user_wallet(telegram_user_id, &credentials.address, &sealed)
            .await
    }

    pub async fn get_user_wallet(&self, telegram_user_id: i64) -> Result<Option<WalletInfo>> {
        Ok(self
            .db
            .get_user_wallet(telegram_user_id)
            .await?
            .map(|row| WalletInfo {
                telegram_user_id: row.telegram_user_id,
                address: row.cronos_address,
            }))
    }

    /// Re-derive the signing credentials and check them against the stored address.
    ///
    /// Used before revealing a key or signing; a drifted row is refused.
    pub async fn load_credentials(&self, telegram_user_id: i64) -> Result<WalletCredentials> {
        let row = self
            .db
            .get_user_wallet(telegram_user_id)
            .await?
            .ok_or(WalletError::WalletNotFound)?;

        let phrase = self.security.unseal(&row.mnemonic)?;
        let credentials = WalletGenerator::from_mnemonic(&phrase)?;

        if !credentials.address.eq_ignore_ascii_case(&row.cronos_address) {
            warn!(
                "Stored address {} does not match derived address for user {}",
                row.cronos_address, telegram_user_id
            );
            return Err(WalletError::AddressMismatch.into());
        }

        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BotError;

    const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";

    async fn manager(security: WalletSecurity) -> (WalletManager, Arc<Database>) {
        let db = Arc::new(Database::connect("sqlite::memory:").await.unwrap());
        (WalletManager::new(db.clone(), security), db)
    }

    #[tokio::test]
    async fn test_create_then_load() {
        let (manager, _) = manager(WalletSecurity::new(Some("key"))).await;
        let created = manager.create_wallet(1).await.unwrap();
        let loaded = manager.load_credentials(1).await.unwrap();
        assert_eq!(created.address, loaded.address);
        assert_eq!(created.private_key, loaded.private_key);
    }

    #[tokio::test]
    async fn test_create_refuses_second_wallet() {
        let (manager, _) = manager(WalletSecurity::plaintext()).await;
        manager.create_wallet(1).await.unwrap();
        let second = manager.create_wallet(1).await;
        assert!(matches!(
            second,
            Err(BotError::Wallet(WalletError::WalletAlreadyExists))
        ));
    }

    #[tokio::test]
    async fn test_import_stores_sealed_mnemonic() {
        let (manager, db) = manager(WalletSecurity::new(Some("key"))).await;
        let info = manager.import_wallet(9, TEST_MNEMONIC).await.unwrap();
        assert_eq!(info.address, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

        let row = db.get_user_wallet(9).await.unwrap().unwrap();
        assert!(!row.mnemonic.contains("junk"));
    }

    #[tokio::test]
    async fn test_drifted_address_is_refused() {
        let (manager, db) = manager(WalletSecurity::plaintext()).await;
        db.upsert_user_wallet(3, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8", TEST_MNEMONIC)
            .await
            .unwrap();

        let result = manager.load_credentials(3).await;
        assert!(matches!(
            result,
            Err(BotError::Wallet(WalletError::AddressMismatch))
        ));
    }

    #[tokio::test]
    async fn test_missing_wallet() {
        let (manager, _) = manager(WalletSecurity::plaintext()).await;
        assert!(manager.get_user_wallet(5).await.unwrap().is_none());
        assert!(matches!(
            manager.load_credentials(5).await,
            Err(BotError::Wallet(WalletError::WalletNotFound))
        ));
    }
}

use std::sync::Arc;

use cronos_trading_bot::db::Database;
use cronos_trading_bot::errors::{BotError, WalletError};
use cronos_trading_bot::wallet::{WalletGenerator, WalletManager, WalletSecurity};

const TEST_MNEMONIC: &str = "test test test test test test test test test test test junk";
const TEST_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

async fn setup(passphrase: Option<&str>) -> (WalletManager, Arc<Database>) {
    let db = Arc::new(Database::connect("sqlite::memory:").await.unwrap());
    (WalletManager::new(db.clone(), WalletSecurity::new(passphrase)), db)
}

#[test]
fn test_derivation_is_deterministic() {
    let first = WalletGenerator::from_mnemonic(TEST_MNEMONIC).unwrap();
    let second = WalletGenerator::from_mnemonic(TEST_MNEMONIC).unwrap();

    assert_eq!(first.address, TEST_ADDRESS);
    assert_eq!(first, second);
    assert_eq!(first.derivation_path, "m/44'/60'/0'/0/0");
}

#[tokio::test]
async fn test_import_seals_mnemonic_at_rest() {
    let (manager, db) = setup(Some("at-rest-key")).await;
    let info = manager.import_wallet(11, TEST_MNEMONIC).await.unwrap();
    assert_eq!(info.address, TEST_ADDRESS);

    let row = db.get_user_wallet(11).await.unwrap().unwrap();
    assert!(row.mnemonic.starts_with("enc:v1:"));
    assert!(!row.mnemonic.contains("junk"));

    let credentials = manager.load_credentials(11).await.unwrap();
    assert_eq!(credentials.address, TEST_ADDRESS);
}

#[tokio::test]
async fn test_plaintext_rows_remain_readable() {
    let (manager, db) = setup(None).await;
    db.upsert_user_wallet(12, TEST_ADDRESS, TEST_MNEMONIC).await.unwrap();
    assert_eq!(manager.load_credentials(12).await.unwrap().address, TEST_ADDRESS);
}

#[tokio::test]
async fn test_key_reveal_refuses_drifted_row() {
    let (manager, db) = setup(None).await;
    db.upsert_user_wallet(13, "0x70997970C51812dc3A010C7d01b50e0d17dc79C8", TEST_MNEMONIC)
        .await
        .unwrap();

    assert!(matches!(
        manager.load_credentials(13).await,
        Err(BotError::Wallet(WalletError::AddressMismatch))
    ));
}

#[tokio::test]
async fn test_second_create_is_refused() {
    let (manager, _) = setup(Some("k")).await;
    let created = manager.create_wallet(14).await.unwrap();
    assert!(created.mnemonic.is_some());

    assert!(matches!(
        manager.create_wallet(14).await,
        Err(BotError::Wallet(WalletError::WalletAlreadyExists))
    ));
    assert!(manager.get_user_wallet(14).await.unwrap().is_some());
    assert!(manager.get_user_wallet(15).await.unwrap().is_none());
}
